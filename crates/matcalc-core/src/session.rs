//! The calculator session: collects operands, dispatches operations and
//! renders one text view per state.
//!
//! A front end delivers [`Event`]s one at a time to [`Session::handle`] and
//! redraws [`Session::render`] afterwards. The session never blocks and owns
//! every piece of mutable state.

use std::fmt;

use tracing::debug;

use crate::error::CalcError;
use crate::matrix::Matrix;
use crate::operation::Operation;
use crate::ops;
use crate::settings::Settings;

const MATRIX_HELP: &str = "comma-separated values, semicolon-separated rows";
const COLLECT_HINT: &str = "Press enter to confirm, ctrl+c to quit.";
const SELECT_A_GUIDANCE: &str =
    "Invalid selection. Please choose 'det', 'norm', 'nullspace', 'inner', 'outer', or 'multiply'.";
const SELECT_AB_GUIDANCE: &str =
    "Invalid selection for operation. Please choose 'inner', 'outer', or 'multiply'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Typing the first operand.
    CollectA,
    /// Choosing an operation for the first operand.
    SelectOpA,
    /// Typing the second operand.
    CollectB,
    /// Choosing an operation for both operands.
    SelectOpAB,
    Result,
    Error,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectA => "collect_a",
            Self::SelectOpA => "select_op_a",
            Self::CollectB => "collect_b",
            Self::SelectOpAB => "select_op_ab",
            Self::Result => "result",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Input events understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Char(char),
    Backspace,
    Confirm,
    Quit,
}

/// Whether the front end should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: State,
    matrix_a: Option<Matrix>,
    matrix_b: Option<Matrix>,
    /// Typed text, or the output message in `Result`.
    buffer: String,
    /// Guidance shown after an unrecognized operation keyword.
    notice: Option<String>,
    last_error: Option<CalcError>,
    settings: Settings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: State::CollectA,
            matrix_a: None,
            matrix_b: None,
            buffer: String::new(),
            notice: None,
            last_error: None,
            settings,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn matrix_a(&self) -> Option<&Matrix> {
        self.matrix_a.as_ref()
    }

    pub fn matrix_b(&self) -> Option<&Matrix> {
        self.matrix_b.as_ref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consumes the session and returns its successor after `event`.
    pub fn transition(mut self, event: Event) -> (Self, Flow) {
        let flow = self.handle(event);
        (self, flow)
    }

    /// Applies one event in place.
    pub fn handle(&mut self, event: Event) -> Flow {
        let before = self.state;
        match event {
            Event::Quit => return Flow::Quit,
            Event::Char(c) => self.push_char(c),
            Event::Backspace => self.pop_char(),
            Event::Confirm => self.confirm(),
        }
        if before != self.state {
            debug!(from = %before, to = %self.state, "session transition");
        }
        Flow::Continue
    }

    fn is_typing(&self) -> bool {
        !matches!(self.state, State::Result | State::Error)
    }

    fn push_char(&mut self, c: char) {
        if self.is_typing() {
            self.notice = None;
            self.buffer.push(c);
        }
    }

    fn pop_char(&mut self) {
        if self.is_typing() {
            self.buffer.pop();
        }
    }

    fn confirm(&mut self) {
        match self.state {
            State::CollectA => match Matrix::parse(&self.buffer) {
                Ok(m) => {
                    self.matrix_a = Some(m);
                    self.buffer.clear();
                    self.state = State::SelectOpA;
                }
                Err(e) => self.fail(e),
            },
            State::CollectB => match Matrix::parse(&self.buffer) {
                Ok(m) => {
                    self.matrix_b = Some(m);
                    self.buffer.clear();
                    self.state = State::SelectOpAB;
                }
                Err(e) => self.fail(e),
            },
            State::SelectOpA => match self.buffer.parse::<Operation>() {
                Ok(op) if op.is_binary() => {
                    self.buffer.clear();
                    self.state = State::CollectB;
                }
                Ok(op) => self.dispatch(op),
                Err(_) => self.reprompt(SELECT_A_GUIDANCE),
            },
            State::SelectOpAB => match self.buffer.parse::<Operation>() {
                Ok(op) if op.is_binary() => self.dispatch(op),
                _ => self.reprompt(SELECT_AB_GUIDANCE),
            },
            State::Result | State::Error => self.reset(),
        }
    }

    fn dispatch(&mut self, op: Operation) {
        let Some(a) = self.matrix_a.as_ref() else {
            debug!(%op, "no first operand, resetting");
            self.reset();
            return;
        };
        debug!(%op, "dispatching operation");

        self.buffer = match ops::evaluate(op, a, self.matrix_b.as_ref(), &self.settings) {
            Ok(outcome) => outcome.render(self.settings.precision),
            Err(e) => format!("Cannot compute {}: {e}", op.title().to_lowercase()),
        };
        self.notice = None;
        self.state = State::Result;
    }

    fn reprompt(&mut self, guidance: &str) {
        debug!(input = %self.buffer, "invalid operation selection");
        self.buffer.clear();
        self.notice = Some(guidance.to_string());
    }

    fn fail(&mut self, error: CalcError) {
        debug!(%error, "input rejected");
        self.last_error = Some(error);
        self.state = State::Error;
    }

    fn reset(&mut self) {
        self.matrix_a = None;
        self.matrix_b = None;
        self.buffer.clear();
        self.notice = None;
        self.last_error = None;
        self.state = State::CollectA;
    }

    /// Renders the view for the current state.
    pub fn render(&self) -> String {
        let precision = self.settings.precision;
        let mut out = String::new();

        match self.state {
            State::CollectA => {
                out.push_str(&format!("Enter a matrix or vector ({MATRIX_HELP}):\n"));
                self.push_input(&mut out);
                out.push_str(&format!("\n{COLLECT_HINT}"));
            }
            State::SelectOpA => {
                self.push_matrix(&mut out, "Matrix A", self.matrix_a.as_ref(), precision);
                out.push_str(&format!(
                    "Choose an operation: {}\n",
                    Operation::menu(&Operation::ALL)
                ));
                self.push_input(&mut out);
                out.push_str(&format!("\n{COLLECT_HINT}"));
            }
            State::CollectB => {
                self.push_matrix(&mut out, "Matrix A", self.matrix_a.as_ref(), precision);
                out.push_str(&format!(
                    "Enter a second matrix or vector ({MATRIX_HELP}):\n"
                ));
                self.push_input(&mut out);
                out.push_str(&format!("\n{COLLECT_HINT}"));
            }
            State::SelectOpAB => {
                self.push_matrix(&mut out, "Matrix A", self.matrix_a.as_ref(), precision);
                self.push_matrix(&mut out, "Matrix B", self.matrix_b.as_ref(), precision);
                out.push_str(&format!(
                    "Choose an operation: {}\n",
                    Operation::menu(&Operation::BINARY)
                ));
                self.push_input(&mut out);
                out.push_str(&format!("\n{COLLECT_HINT}"));
            }
            State::Result => {
                out.push_str(&self.buffer);
                out.push_str("\n\nPress enter to continue...");
            }
            State::Error => {
                let message = self
                    .last_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                out.push_str(&format!("Error: {message}"));
                out.push_str("\n\nPress enter to try again...");
            }
        }
        out
    }

    fn push_matrix(
        &self,
        out: &mut String,
        heading: &str,
        matrix: Option<&Matrix>,
        precision: Option<usize>,
    ) {
        if let Some(m) = matrix {
            out.push_str(&format!("{heading}:\n{}\n\n", m.render(precision)));
        }
    }

    fn push_input(&self, out: &mut String) {
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out.push_str(&format!("> {}\n", self.buffer));
    }
}
