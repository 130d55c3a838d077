// library crate for ifactions
// the binary in main.rs is a thin wrapper over `cli`

pub mod actions;
pub mod cli;
pub mod conditions;
pub mod config;
pub mod expression;
pub mod subject;

pub use actions::{ActionExecutor, LogExecutor, RecordingExecutor};
pub use conditions::{EvalContext, EvalReport, IfActions};
pub use config::{ConfigFile, OptionReader};
pub use expression::{ExpressionParser, MathParser};
pub use subject::{Snapshot, Subject};
