//! Order invariants hold across arbitrary command sequences.

use intellecta_admin_engine::editing::{BlockField, Cmd, Direction, reduce};
use intellecta_admin_engine::{BlockContent, LessonDraft, build_payload};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

fn group_cmd() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        Just(Cmd::AddGroup),
        (0..6usize).prop_map(|group| Cmd::RemoveGroup { group }),
        (0..6usize, direction()).prop_map(|(group, direction)| Cmd::MoveGroup { group, direction }),
    ]
}

fn block_cmd(group: usize) -> impl Strategy<Value = Cmd> {
    prop_oneof![
        Just(Cmd::AddBlock { group }),
        (0..6usize).prop_map(move |block| Cmd::RemoveBlock { group, block }),
        (0..6usize, direction()).prop_map(move |(block, direction)| Cmd::MoveBlock {
            group,
            block,
            direction
        }),
        (0..6usize, "[a-z]{0,8}").prop_map(move |(block, text)| Cmd::UpdateBlock {
            group,
            block,
            field: BlockField::Content(BlockContent::Plain(text)),
        }),
    ]
}

/// Draft with three groups, each holding two blocks
fn seeded() -> LessonDraft {
    let mut draft = LessonDraft::new();
    for group in 0..3 {
        draft = reduce(&draft, Cmd::AddGroup).unwrap();
        for _ in 0..2 {
            draft = reduce(&draft, Cmd::AddBlock { group }).unwrap();
        }
    }
    draft
}

fn assert_orders(draft: &LessonDraft) {
    for (i, group) in draft.content_groups.iter().enumerate() {
        assert_eq!(group.order, i);
        for (j, block) in group.contents.iter().enumerate() {
            assert_eq!(block.order, j);
        }
    }
}

proptest! {
    #[test]
    fn group_orders_match_positions(cmds in prop::collection::vec(group_cmd(), 0..40)) {
        let mut draft = LessonDraft::new();
        for cmd in cmds {
            // Out-of-range commands are rejected and leave the draft as it was
            if let Ok(next) = reduce(&draft, cmd) {
                draft = next;
            }
            assert_orders(&draft);
        }
    }

    #[test]
    fn block_ops_only_touch_their_group(
        group in 0..3usize,
        cmds in prop::collection::vec((0..3usize).prop_flat_map(block_cmd), 0..40)
    ) {
        let seeded = seeded();
        let mut draft = seeded.clone();
        for cmd in cmds {
            let target = match &cmd {
                Cmd::AddBlock { group }
                | Cmd::RemoveBlock { group, .. }
                | Cmd::MoveBlock { group, .. }
                | Cmd::UpdateBlock { group, .. } => *group,
                _ => unreachable!(),
            };
            if target != group {
                continue;
            }
            if let Ok(next) = reduce(&draft, cmd) {
                draft = next;
            }
            assert_orders(&draft);
            for (index, other) in draft.content_groups.iter().enumerate() {
                if index != group {
                    prop_assert_eq!(other, &seeded.content_groups[index]);
                }
            }
        }
    }

    #[test]
    fn payload_orders_match_positions(cmds in prop::collection::vec(group_cmd(), 0..20)) {
        let mut draft = LessonDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            topic: "topic".to_string(),
            ..LessonDraft::default()
        };
        for cmd in cmds {
            if let Ok(next) = reduce(&draft, cmd) {
                draft = next;
            }
        }
        let payload = build_payload(&draft).unwrap();
        for (i, group) in payload.content_groups.iter().enumerate() {
            prop_assert_eq!(group.order, i);
        }
    }
}

#[test]
fn moving_last_of_three_up() {
    let mut draft = LessonDraft::new();
    for (group, title) in ["zero", "one", "two"].into_iter().enumerate() {
        draft = reduce(&draft, Cmd::AddGroup).unwrap();
        draft = reduce(
            &draft,
            Cmd::UpdateGroup {
                group,
                field: intellecta_admin_engine::editing::GroupField::Title(title.to_string()),
            },
        )
        .unwrap();
    }

    let moved = reduce(
        &draft,
        Cmd::MoveGroup {
            group: 2,
            direction: Direction::Up,
        },
    )
    .unwrap();

    let titles: Vec<_> = moved.content_groups.iter().map(|g| g.title.as_str()).collect();
    let orders: Vec<_> = moved.content_groups.iter().map(|g| g.order).collect();
    assert_eq!(titles, vec!["zero", "two", "one"]);
    assert_eq!(orders, vec![0, 1, 2]);
}
