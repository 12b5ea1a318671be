use std::path::Path;

use crossterm::event::KeyCode;
use intellecta_admin_engine::editing::{
    BlockField, Cmd, Direction, GroupField, QuestionField, SubmitError,
};
use intellecta_admin_engine::{
    BlockContent, ContentType, Editor, EditorState, LessonDraft, OPTION_COUNT, TopicLookup,
    TopicPicker,
};
use ratatui::widgets::ListState;

use crate::remote::describe_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonField {
    Title,
    Description,
    Order,
}

/// One selectable line of the lesson outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Field(LessonField),
    Course,
    Topic,
    Group(usize),
    GroupDescription(usize),
    Block(usize, usize),
    Question(usize),
    Answer(usize, usize),
    Explanation(usize),
}

impl Row {
    /// Group this row belongs to, if any
    fn group(self) -> Option<usize> {
        match self {
            Row::Group(g) | Row::GroupDescription(g) | Row::Block(g, _) => Some(g),
            _ => None,
        }
    }

    fn question(self) -> Option<usize> {
        match self {
            Row::Question(q) | Row::Answer(q, _) | Row::Explanation(q) => Some(q),
            _ => None,
        }
    }
}

/// Flatten a draft into outline rows
pub fn rows(draft: &LessonDraft) -> Vec<Row> {
    let mut rows = vec![
        Row::Field(LessonField::Title),
        Row::Field(LessonField::Description),
        Row::Field(LessonField::Order),
        Row::Course,
        Row::Topic,
    ];
    for (g, group) in draft.content_groups.iter().enumerate() {
        rows.push(Row::Group(g));
        rows.push(Row::GroupDescription(g));
        rows.extend((0..group.contents.len()).map(|b| Row::Block(g, b)));
    }
    for q in 0..draft.quiz.len() {
        rows.push(Row::Question(q));
        rows.extend((0..OPTION_COUNT).map(|o| Row::Answer(q, o)));
        rows.push(Row::Explanation(q));
    }
    rows
}

/// Side effects the event loop has to run outside the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit,
    CycleCourse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub row: Row,
    pub buffer: String,
}

pub struct App {
    pub editor: Editor,
    pub picker: TopicPicker,
    pub list_state: ListState,
    pub input: Option<Input>,
    pub status: Option<String>,
}

impl App {
    pub fn new(editor: Editor, picker: TopicPicker) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            editor,
            picker,
            list_state,
            input: None,
            status: None,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        rows(self.editor.draft())
    }

    pub fn selected_row(&self) -> Option<Row> {
        let rows = self.rows();
        self.list_state.selected().and_then(|i| rows.get(i).copied())
    }

    pub fn title(&self) -> &'static str {
        if self.editor.is_editing() {
            "Edit Lesson"
        } else {
            "Create Lesson"
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if self.input.is_some() {
            self.handle_input_key(code);
            return Action::None;
        }
        if self.editor.state() == &EditorState::Submitting {
            return Action::None;
        }
        self.status = None;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(-1),
            KeyCode::Enter | KeyCode::Char('e') => return self.activate_selected(),
            KeyCode::Char('D') => {
                if let Some(g) = self.selected_row().and_then(Row::group) {
                    self.start_edit(Row::GroupDescription(g));
                }
            }
            KeyCode::Char('g') => {
                self.apply(Cmd::AddGroup);
                let last = self.editor.draft().content_groups.len().saturating_sub(1);
                self.select_row(Row::Group(last));
            }
            KeyCode::Char('b') => match self.selected_row().and_then(Row::group) {
                Some(group) => {
                    self.apply(Cmd::AddBlock { group });
                    let last = self.editor.draft().content_groups[group]
                        .contents
                        .len()
                        .saturating_sub(1);
                    self.select_row(Row::Block(group, last));
                }
                None => self.status = Some("Select a group to add a block to".to_string()),
            },
            KeyCode::Char('a') => {
                self.apply(Cmd::AddQuestion);
                let last = self.editor.draft().quiz.len().saturating_sub(1);
                self.select_row(Row::Question(last));
            }
            KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('K') => self.move_selected(Direction::Up),
            KeyCode::Char('J') => self.move_selected(Direction::Down),
            KeyCode::Char('t') => {
                if let Some(Row::Block(group, block)) = self.selected_row() {
                    let kind = self.editor.draft().content_groups[group].contents[block].kind;
                    self.apply(Cmd::UpdateBlock {
                        group,
                        block,
                        field: BlockField::Type(kind.next()),
                    });
                }
            }
            KeyCode::Char(' ') => {
                if let Some(Row::Answer(question, option)) = self.selected_row() {
                    self.apply(Cmd::UpdateQuestion {
                        question,
                        field: QuestionField::CorrectAnswer(option),
                    });
                }
            }
            KeyCode::Char('s') => return Action::Submit,
            _ => {}
        }
        Action::None
    }

    /// Move the picker to the next course, dropping a topic that does not belong to it
    pub async fn cycle_course<L>(&mut self, lookup: &L)
    where
        L: TopicLookup + ?Sized,
    {
        self.picker.dismiss_banner();
        self.picker.cycle_course(lookup).await;

        let topic = &self.editor.draft().topic;
        if !self.editor.is_editing() && !topic.is_empty() && self.picker.topic_title(topic).is_none()
        {
            self.apply(Cmd::SetTopic(String::new()));
        }
    }

    /// Report a failed save; the editor keeps its own copy of the message
    pub fn submit_failed(&mut self, error: &SubmitError, token_path: &Path) {
        log::debug!("submission failed: {error}");
        if let SubmitError::Api(api_error) = error {
            self.status = Some(describe_error(api_error, token_path));
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => input.buffer.push(c),
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take()
                    && let Some(cmd) = self.commit(input)
                {
                    self.apply(cmd);
                }
            }
            _ => {}
        }
    }

    fn activate_selected(&mut self) -> Action {
        match self.selected_row() {
            Some(Row::Course) if self.editor.is_editing() => {
                self.status = Some("The course of an existing lesson cannot change".to_string());
            }
            Some(Row::Course) => return Action::CycleCourse,
            Some(Row::Topic) => self.cycle_topic(),
            Some(row) => self.start_edit(row),
            None => {}
        }
        Action::None
    }

    fn cycle_topic(&mut self) {
        if self.editor.is_editing() {
            self.status = Some("The topic of an existing lesson cannot change".to_string());
            return;
        }
        match self.picker.next_topic(&self.editor.draft().topic) {
            Some(topic) => {
                let id = topic.id.clone();
                self.apply(Cmd::SetTopic(id));
            }
            None => self.status = Some("Select a course with topics first".to_string()),
        }
    }

    fn start_edit(&mut self, row: Row) {
        let draft = self.editor.draft();
        let buffer = match row {
            Row::Field(LessonField::Title) => draft.title.clone(),
            Row::Field(LessonField::Description) => draft.description.clone(),
            Row::Field(LessonField::Order) => draft.order.clone(),
            Row::Group(g) => draft.content_groups[g].title.clone(),
            Row::GroupDescription(g) => draft.content_groups[g]
                .description
                .clone()
                .unwrap_or_default(),
            Row::Block(g, b) => match &draft.content_groups[g].contents[b].content {
                BlockContent::Plain(text) => text.clone(),
                BlockContent::Link { url, text } => link_buffer(url, text),
            },
            Row::Question(q) => draft.quiz[q].question.clone(),
            Row::Answer(q, o) => draft.quiz[q].options[o].clone(),
            Row::Explanation(q) => draft.quiz[q].explanation.clone().unwrap_or_default(),
            Row::Course | Row::Topic => return,
        };
        self.input = Some(Input { row, buffer });
    }

    fn commit(&self, input: Input) -> Option<Cmd> {
        let Input { row, buffer } = input;
        let cmd = match row {
            Row::Field(LessonField::Title) => Cmd::SetTitle(buffer),
            Row::Field(LessonField::Description) => Cmd::SetDescription(buffer),
            Row::Field(LessonField::Order) => Cmd::SetOrder(buffer),
            Row::Group(group) => Cmd::UpdateGroup {
                group,
                field: GroupField::Title(buffer),
            },
            Row::GroupDescription(group) => Cmd::UpdateGroup {
                group,
                field: GroupField::Description(buffer),
            },
            Row::Block(group, block) => {
                let kind = self.editor.draft().content_groups[group].contents[block].kind;
                let content = if kind == ContentType::Link {
                    parse_link(&buffer)
                } else {
                    BlockContent::Plain(buffer)
                };
                Cmd::UpdateBlock {
                    group,
                    block,
                    field: BlockField::Content(content),
                }
            }
            Row::Question(question) => Cmd::UpdateQuestion {
                question,
                field: QuestionField::Question(buffer),
            },
            Row::Answer(question, option) => Cmd::UpdateOption {
                question,
                option,
                value: buffer,
            },
            Row::Explanation(question) => Cmd::UpdateQuestion {
                question,
                field: QuestionField::Explanation(buffer),
            },
            Row::Course | Row::Topic => return None,
        };
        Some(cmd)
    }

    fn remove_selected(&mut self) {
        let cmd = match self.selected_row() {
            Some(Row::Group(group) | Row::GroupDescription(group)) => Cmd::RemoveGroup { group },
            Some(Row::Block(group, block)) => Cmd::RemoveBlock { group, block },
            Some(row) => match row.question() {
                Some(question) => Cmd::RemoveQuestion { question },
                None => return,
            },
            None => return,
        };
        self.apply(cmd);
    }

    fn move_selected(&mut self, direction: Direction) {
        let (cmd, target) = match self.selected_row() {
            Some(Row::Group(group)) => (
                Cmd::MoveGroup { group, direction },
                Row::Group(shifted(group, direction)),
            ),
            Some(Row::Block(group, block)) => (
                Cmd::MoveBlock {
                    group,
                    block,
                    direction,
                },
                Row::Block(group, shifted(block, direction)),
            ),
            _ => return,
        };
        if self.apply(cmd) {
            self.select_row(target);
        }
    }

    /// Apply a command, reporting rejections in the status line.
    ///
    /// Returns whether the draft changed.
    fn apply(&mut self, cmd: Cmd) -> bool {
        let changed = match self.editor.apply(cmd) {
            Ok(patch) => patch.changed,
            Err(e) => {
                log::debug!("command rejected: {e}");
                self.status = Some(e.to_string());
                false
            }
        };
        self.clamp_selection();
        changed
    }

    fn select_offset(&mut self, offset: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(offset).min(len - 1);
        self.list_state.select(Some(next));
    }

    fn select_row(&mut self, row: Row) {
        if let Some(index) = self.rows().iter().position(|r| *r == row) {
            self.list_state.select(Some(index));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(current.min(len.saturating_sub(1))));
    }

    /// Text shown for `row` in the outline
    pub fn row_label(&self, row: Row) -> String {
        let draft = self.editor.draft();
        match row {
            Row::Field(LessonField::Title) => format!("Title: {}", draft.title),
            Row::Field(LessonField::Description) => {
                format!("Description: {}", first_line(&draft.description))
            }
            Row::Field(LessonField::Order) => format!("Order: {}", draft.order),
            Row::Course => {
                let course = self
                    .picker
                    .selected_course()
                    .map(|id| self.picker.course_title(id).unwrap_or(id))
                    .unwrap_or("(select a course)");
                format!("Course: {course}")
            }
            Row::Topic => {
                let topic = if draft.topic.is_empty() {
                    "(select a topic)"
                } else {
                    self.picker
                        .topic_title(&draft.topic)
                        .unwrap_or(draft.topic.as_str())
                };
                format!("Topic: {topic}")
            }
            Row::Group(g) => format!("Group {}: {}", g + 1, draft.content_groups[g].title),
            Row::GroupDescription(g) => format!(
                "  description: {}",
                draft.content_groups[g].description.as_deref().unwrap_or("")
            ),
            Row::Block(g, b) => {
                let block = &draft.content_groups[g].contents[b];
                format!(
                    "  Block {} [{}] {}",
                    b + 1,
                    block.kind.label(),
                    block.content.preview()
                )
            }
            Row::Question(q) => format!("Question {}: {}", q + 1, draft.quiz[q].question),
            Row::Answer(q, o) => {
                let question = &draft.quiz[q];
                let mark = if question.correct_answer == o { "(*)" } else { "( )" };
                format!("  {mark} Option {}: {}", o + 1, question.options[o])
            }
            Row::Explanation(q) => format!(
                "  explanation: {}",
                draft.quiz[q].explanation.as_deref().unwrap_or("")
            ),
        }
    }
}

fn shifted(index: usize, direction: Direction) -> usize {
    match direction {
        Direction::Up => index.saturating_sub(1),
        Direction::Down => index + 1,
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Editable form of a link; the separator only appears once there is text
fn link_buffer(url: &str, text: &str) -> String {
    if text.is_empty() {
        url.to_string()
    } else {
        format!("{url} | {text}")
    }
}

/// Parse `url | text` as typed into a link block
pub fn parse_link(input: &str) -> BlockContent {
    match input.split_once('|') {
        Some((url, text)) => BlockContent::link(url.trim(), text.trim()),
        None => BlockContent::link(input.trim(), ""),
    }
}
