//! Terminal UI front end built on ratatui and crossterm.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::debug;

use matcalc_core::{Event, Flow, Session, State};

/// Runs the session until the user quits, restoring the terminal afterwards.
pub fn run_tui(session: &mut Session) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let mut terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, session))?;

        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(ev) = map_key(key) else {
            continue;
        };
        if session.handle(ev) == Flow::Quit {
            debug!("quit requested");
            return Ok(());
        }
    }
}

/// Translates a key press into a session event.
pub fn map_key(key: KeyEvent) -> Option<Event> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Event::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Event::Quit),
        KeyCode::Char(c) if !ctrl => Some(Event::Char(c)),
        KeyCode::Backspace | KeyCode::Delete => Some(Event::Backspace),
        KeyCode::Enter => Some(Event::Confirm),
        _ => None,
    }
}

fn state_title(state: State) -> &'static str {
    match state {
        State::CollectA => " Matrix A ",
        State::SelectOpA => " Operation ",
        State::CollectB => " Matrix B ",
        State::SelectOpAB => " Operation (A, B) ",
        State::Result => " Result ",
        State::Error => " Error ",
    }
}

fn draw(f: &mut Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let border = match session.state() {
        State::Error => Style::default().fg(Color::Red),
        State::Result => Style::default().fg(Color::Green),
        _ => Style::default(),
    };
    let body = Paragraph::new(session.render())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(state_title(session.state())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[0]);

    let status = Line::from(vec![
        Span::styled(
            " matcalc ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " enter:confirm  backspace:delete  q/esc/ctrl+c:quit ",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(status), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(key(KeyCode::Char('7'))), Some(Event::Char('7')));
        assert_eq!(map_key(key(KeyCode::Char(';'))), Some(Event::Char(';')));
        assert_eq!(map_key(key(KeyCode::Backspace)), Some(Event::Backspace));
        assert_eq!(map_key(key(KeyCode::Delete)), Some(Event::Backspace));
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Event::Confirm));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Event::Quit));
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Event::Quit));
        assert_eq!(map_key(key(KeyCode::Left)), None);
    }

    #[test]
    fn test_map_key_control() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Event::Quit));
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_x), None);
    }

    #[test]
    fn test_draw_initial_view() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        let session = Session::default();
        terminal.draw(|f| draw(f, &session)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Matrix A"));
        assert!(text.contains("Enter a matrix or vector"));
        assert!(text.contains("q/esc/ctrl+c:quit"));
    }

    #[test]
    fn test_draw_result_view() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        let mut session = Session::default();
        for c in "3,4".chars() {
            session.handle(Event::Char(c));
        }
        session.handle(Event::Confirm);
        for c in "norm".chars() {
            session.handle(Event::Char(c));
        }
        session.handle(Event::Confirm);
        terminal.draw(|f| draw(f, &session)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Result"));
        assert!(text.contains("Norm: 5"));
    }
}
