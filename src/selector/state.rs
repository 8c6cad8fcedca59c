use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::matcher::{Match, ProfileMatcher};
use super::SelectMode;

/// How a selector session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Candidate indices, in the order they were chosen
    Confirmed(Vec<usize>),
    Cancelled,
}

/// Input-driven state of one selector session.
///
/// Holds the query, the ranked matches for it, the cursor row within those
/// matches and any marked candidates. Rendering reads it; key events drive it.
pub struct SelectorState<'a> {
    candidates: &'a [String],
    mode: SelectMode,
    matcher: ProfileMatcher,
    query: String,
    matches: Vec<Match>,
    cursor: usize,
    marked: Vec<usize>,
}

impl<'a> SelectorState<'a> {
    pub fn new(candidates: &'a [String], mode: SelectMode) -> Self {
        let matcher = ProfileMatcher::new();
        let matches = matcher.filter(candidates, "");
        Self {
            candidates,
            mode,
            matcher,
            query: String::new(),
            matches,
            cursor: 0,
            marked: Vec::new(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        self.candidates
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Row of the focused match, or `None` when nothing matches.
    pub fn cursor_row(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.cursor)
    }

    /// Candidate index under the cursor.
    pub fn focused(&self) -> Option<usize> {
        self.matches.get(self.cursor).map(|m| m.index)
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    /// Applies one key press. Returns `Some` once the session is over.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(Outcome::Cancelled),
            KeyCode::Char('c' | 'd' | 'q') if ctrl => return Some(Outcome::Cancelled),
            KeyCode::Enter => return self.confirm(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Char('p') if ctrl => self.move_up(),
            KeyCode::Char('n') if ctrl => self.move_down(),
            KeyCode::Char('u') if ctrl => self.set_query(String::new()),
            KeyCode::Tab => self.toggle_mark(),
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_some() {
                    self.set_query(query);
                }
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(query);
            }
            _ => {}
        }
        None
    }

    pub fn set_query(&mut self, query: String) {
        self.matches = self.matcher.filter(self.candidates, &query);
        self.query = query;
        self.cursor = 0;
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.matches.len() {
            self.cursor += 1;
        }
    }

    /// Marks or unmarks the focused candidate and steps down. Single mode ignores it.
    pub fn toggle_mark(&mut self) {
        if self.mode == SelectMode::Single {
            return;
        }
        let Some(index) = self.focused() else {
            return;
        };

        if let Some(pos) = self.marked.iter().position(|&m| m == index) {
            self.marked.remove(pos);
        } else {
            self.marked.push(index);
        }
        self.move_down();
    }

    fn confirm(&self) -> Option<Outcome> {
        if self.mode == SelectMode::Multi && !self.marked.is_empty() {
            return Some(Outcome::Confirmed(self.marked.clone()));
        }
        // With an empty match list there is nothing to confirm; keep the session open.
        self.focused().map(|index| Outcome::Confirmed(vec![index]))
    }
}
