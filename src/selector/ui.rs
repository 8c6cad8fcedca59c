use crossterm::cursor::Show;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{self, IsTerminal, Stderr, Write};

use super::matcher::Match;
use super::state::{Outcome, SelectorState};
use super::{SelectError, SelectMode};

const PROMPT: &str = "> ";

/// Runs the selector until the user confirms or cancels.
///
/// Returns the chosen candidate indices, never empty on success.
pub fn select(candidates: &[String], mode: SelectMode) -> Result<Vec<usize>, SelectError> {
    if candidates.is_empty() {
        return Err(SelectError::Empty);
    }
    if !io::stderr().is_terminal() {
        return Err(SelectError::NoTerminal);
    }

    let mut session = TerminalSession::enter()?;
    let mut state = SelectorState::new(candidates, mode);

    loop {
        session.terminal.draw(|frame| render(frame, &state))?;

        if let Event::Key(key) = event::read()? {
            match state.handle_key(key) {
                Some(Outcome::Confirmed(indices)) => {
                    log::debug!("selected candidate(s) {indices:?}");
                    return Ok(indices);
                }
                Some(Outcome::Cancelled) => return Err(SelectError::Cancelled),
                None => {}
            }
        }
    }
}

/// Raw mode plus the alternate screen; both are undone on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stderr>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stderr = io::stderr();
        let terminal = execute!(stderr, EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stderr)));

        match terminal {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore(&mut io::stderr());
                Err(err)
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore(self.terminal.backend_mut());
    }
}

fn restore(out: &mut impl Write) {
    if let Err(err) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {err}");
    }
    if let Err(err) = execute!(out, LeaveAlternateScreen, Show) {
        log::warn!("failed to restore terminal: {err}");
    }
}

fn render(frame: &mut Frame, state: &SelectorState) {
    let [prompt_area, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(frame.area());
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

    let prompt = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
        Span::raw(state.query()),
    ]);
    let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(prompt), prompt_area);

    let cursor_x = prompt_area
        .x
        .saturating_add(prompt_width)
        .min(prompt_area.right().saturating_sub(1));
    frame.set_cursor_position((cursor_x, prompt_area.y));

    render_list(frame, list_area, state);
    render_preview(frame, preview_area, state);
}

fn render_list(frame: &mut Frame, area: ratatui::layout::Rect, state: &SelectorState) {
    let candidates = state.candidates();
    let items: Vec<ListItem> = state
        .matches()
        .iter()
        .map(|m| {
            let marker = if state.is_marked(m.index) { "* " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Magenta))];
            spans.extend(highlight(&candidates[m.index], m));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let hint = match state.mode() {
        SelectMode::Single => " enter: select  esc: cancel ",
        SelectMode::Multi => " tab: mark  enter: select  esc: cancel ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}/{} ", state.matches().len(), candidates.len()))
        .title_bottom(hint);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(PROMPT);

    let mut list_state = ListState::default().with_selected(state.cursor_row());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_preview(frame: &mut Frame, area: ratatui::layout::Rect, state: &SelectorState) {
    let candidates = state.candidates();
    let lines = match state.focused() {
        Some(index) => vec![
            Line::from(Span::styled(
                candidates[index].as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("profile {} of {}", index + 1, candidates.len()),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => Vec::new(),
    };

    let preview = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Preview "))
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, area);
}

fn highlight<'a>(name: &'a str, m: &Match) -> Vec<Span<'a>> {
    let matched = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if m.positions.contains(&i) {
                Span::styled(c.to_string(), matched)
            } else {
                Span::raw(c.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn candidates() -> Vec<String> {
        ["default", "work", "prod"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn draw(state: &SelectorState, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        terminal
    }

    fn screen_text(buffer: &Buffer) -> String {
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn preview_shows_the_focused_profile_and_its_position() {
        let list = candidates();
        let mut state = SelectorState::new(&list, SelectMode::Single);
        state.set_query("w".to_string());

        let terminal = draw(&state, 40, 6);
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains("> w"), "{text}");
        assert!(text.contains(" 1/3 "), "{text}");
        assert!(text.contains(" Preview "), "{text}");
        assert!(text.contains("work"), "{text}");
        assert!(text.contains("profile 2 of 3"), "{text}");
    }

    #[test]
    fn preview_is_empty_when_nothing_matches() {
        let list = candidates();
        let mut state = SelectorState::new(&list, SelectMode::Single);
        state.set_query("zzz".to_string());

        let terminal = draw(&state, 40, 6);
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains(" 0/3 "), "{text}");
        assert!(!text.contains("profile "), "{text}");
    }

    #[test]
    fn all_profiles_are_listed_for_the_empty_query() {
        let list = candidates();
        let state = SelectorState::new(&list, SelectMode::Single);

        let terminal = draw(&state, 60, 8);
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains(" 3/3 "), "{text}");
        for name in &list {
            assert!(text.contains(name.as_str()), "{text}");
        }
        assert!(text.contains("profile 1 of 3"), "{text}");
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let list = candidates();
        let mut state = SelectorState::new(&list, SelectMode::Single);
        state.set_query("w".to_string());

        for (width, height) in [(1, 1), (3, 2), (10, 1), (1, 10)] {
            draw(&state, width, height);
        }
    }

    #[test]
    fn cursor_follows_the_display_width_of_the_query() {
        let list = candidates();
        let mut state = SelectorState::new(&list, SelectMode::Single);
        state.set_query("日本".to_string());

        let mut terminal = draw(&state, 40, 6);
        let cursor = terminal.get_cursor_position().unwrap();

        // "> " plus two double-width characters
        assert_eq!((cursor.x, cursor.y), (6, 0));
    }

    #[test]
    fn matched_characters_are_highlighted() {
        let m = Match {
            index: 0,
            score: 1,
            positions: vec![0, 3],
        };

        let spans = highlight("work", &m);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].style.fg, Some(Color::Yellow));
        assert_eq!(spans[1].style, Style::default());
        assert_eq!(spans[3].style.fg, Some(Color::Yellow));
    }
}
