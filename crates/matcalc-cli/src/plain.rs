//! Line-oriented front end.
//!
//! Each input line is delivered to the session as its characters followed by
//! a confirm, and the view is printed after every line. `:q` or end of input
//! quits.

use std::io::{BufRead, Write};
use std::iter;

use anyhow::{Context, Result};
use tracing::debug;

use matcalc_core::{Event, Flow, Session};

const QUIT_COMMAND: &str = ":q";

pub fn run_plain<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "{}", session.render())?;

    for line in input.lines() {
        let line = line.context("reading input")?;
        let line = line.trim_end_matches('\r');

        let flow = if line.trim() == QUIT_COMMAND {
            session.handle(Event::Quit)
        } else {
            feed_line(session, line)
        };
        if flow == Flow::Quit {
            debug!("quit requested");
            return Ok(());
        }

        writeln!(out, "\n{}", session.render())?;
        out.flush()?;
    }

    Ok(())
}

fn feed_line(session: &mut Session, line: &str) -> Flow {
    for event in line_events(line) {
        if session.handle(event) == Flow::Quit {
            return Flow::Quit;
        }
    }
    Flow::Continue
}

/// Events for one line of input: its characters, then confirm.
pub fn line_events(line: &str) -> impl Iterator<Item = Event> + '_ {
    line.chars()
        .map(Event::Char)
        .chain(iter::once(Event::Confirm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use matcalc_core::State;

    fn run(script: &str) -> (Session, String) {
        let mut session = Session::default();
        let mut out = Vec::new();
        run_plain(&mut session, Cursor::new(script), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_line_events() {
        let events: Vec<Event> = line_events("1,2").collect();
        assert_eq!(
            events,
            vec![
                Event::Char('1'),
                Event::Char(','),
                Event::Char('2'),
                Event::Confirm
            ]
        );
    }

    #[test]
    fn test_determinant_script() {
        let (session, out) = run("1,2;3,4\ndet\n");
        assert_eq!(session.state(), State::Result);
        assert!(out.starts_with("Enter a matrix or vector"));
        assert!(out.contains("Matrix A:\n[ 1, 2 ]\n[ 3, 4 ]"));
        assert!(out.contains("Determinant: -2"));
    }

    #[test]
    fn test_quit_command_stops_reading() {
        let (session, out) = run("3,4\n:q\nnorm\n");
        assert_eq!(session.state(), State::SelectOpA);
        assert!(!out.contains("Norm:"));
    }

    #[test]
    fn test_reset_after_error() {
        let (session, out) = run("1,2;3\n\n");
        assert_eq!(session.state(), State::CollectA);
        assert!(out.contains("Error: inconsistent row lengths"));
    }

    #[test]
    fn test_crlf_input() {
        let (session, _) = run("1,2\r\ninner\r\n3,4\r\ninner\r\n");
        assert_eq!(session.buffer(), "Inner Product: 11");
    }
}
