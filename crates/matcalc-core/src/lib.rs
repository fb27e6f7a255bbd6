pub mod error;
pub mod matrix;
pub mod operation;
pub mod ops;
pub mod session;
pub mod settings;

pub use error::{CalcError, CalcResult, ErrorKind};
pub use matrix::Matrix;
pub use operation::Operation;
pub use ops::{evaluate, Outcome};
pub use session::{Event, Flow, Session, State};
pub use settings::{NullspaceBasis, Settings, DEFAULT_ZERO_TOLERANCE};
