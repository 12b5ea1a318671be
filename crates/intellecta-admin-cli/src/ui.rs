use intellecta_admin_engine::{ContentType, EditorState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Row};

pub fn ui(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if app.picker.banner().is_some() { 3 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    if let Some(banner) = app.picker.banner() {
        let banner = Paragraph::new(banner)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Lookup"));
        f.render_widget(banner, outer[0]);
    }

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer[1]);

    let rows = app.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| ListItem::new(Line::from(Span::styled(app.row_label(*row), row_style(*row)))))
        .collect();
    let outline = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(app.title()))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(outline, panels[0], &mut app.list_state);

    let details = Paragraph::new(detail_lines(app))
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: false });
    f.render_widget(details, panels[1]);

    f.render_widget(Paragraph::new(status_lines(app)), outer[2]);
}

fn row_style(row: Row) -> Style {
    match row {
        Row::Group(_) | Row::Question(_) => Style::default().add_modifier(Modifier::BOLD),
        Row::GroupDescription(_) | Row::Explanation(_) => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

fn detail_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(input) = &app.input {
        let mut lines = vec![
            Line::from(format!("Editing {}", app.row_label(input.row).trim())),
            Line::from(""),
            Line::from(format!("{}_", input.buffer)),
            Line::from(""),
        ];
        if let Row::Block(g, b) = input.row
            && app.editor.draft().content_groups[g].contents[b].kind == ContentType::Link
        {
            lines.push(Line::from("Link blocks take `url | text`"));
        }
        lines.push(Line::from("Enter: Save | Esc: Cancel"));
        return lines;
    }

    let draft = app.editor.draft();
    let mut lines = vec![
        Line::from(format!("Groups: {}", draft.content_groups.len())),
        Line::from(format!("Blocks: {}", draft.block_count())),
        Line::from(format!("Questions: {}", draft.quiz.len())),
    ];
    if let Some(row) = app.selected_row() {
        lines.push(Line::from(""));
        lines.extend(selection_help(row).iter().map(|s| Line::from(*s)));
    }
    lines
}

fn selection_help(row: Row) -> &'static [&'static str] {
    match row {
        Row::Course => &["Enter: Next course"],
        Row::Topic => &["Enter: Next topic in the selected course"],
        Row::Group(_) | Row::GroupDescription(_) => &[
            "Enter: Edit title | D: Edit description",
            "b: Add block | K/J: Move | d: Remove",
        ],
        Row::Block(..) => &[
            "Enter: Edit content | t: Change type",
            "b: Add block | K/J: Move | d: Remove",
        ],
        Row::Answer(..) => &["Enter: Edit option | Space: Mark correct"],
        Row::Question(_) | Row::Explanation(_) => &["Enter: Edit | d: Remove question"],
        Row::Field(_) => &["Enter: Edit"],
    }
}

fn status_lines(app: &App) -> Vec<Line<'static>> {
    let status = match app.editor.state() {
        EditorState::Submitting => Some(Span::styled(
            "Saving...".to_string(),
            Style::default().fg(Color::Yellow),
        )),
        _ => app
            .status
            .as_deref()
            .or(app.editor.error())
            .map(|message| Span::styled(message.to_string(), Style::default().fg(Color::Red))),
    };

    vec![
        Line::from(status.unwrap_or_default()),
        Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("↑/k ↓/j: Select | "),
            Span::raw("g: Group | a: Question | "),
            Span::raw("s: Save"),
        ]),
    ]
}
