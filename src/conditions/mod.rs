//! edge-triggered conditional actions for one polled subject
//!
//! three independent families are evaluated on every update, in this order:
//! - thresholds: IfEqual, IfAbove, IfBelow (always single-shot)
//! - IfCondition list: formulas that evaluate to 1 (true) or 0 (false)
//! - IfMatch list: regex patterns tested against the subject's text
//!
//! each branch records that it fired, so an action that causes another update
//! of the same subject does not fire again until the condition reverses.

mod engine;
mod eval;
mod loader;
mod pattern;
mod threshold;
mod types;

pub use engine::IfActions;
pub use eval::{evaluate_conditions, evaluate_matches, Diagnostic, EvalContext, EvalReport};
pub use loader::{read_list, read_thresholds};
pub use pattern::{CompiledPattern, PatternError, PatternMatcher, RegexMatcher};
pub use threshold::{evaluate_thresholds, reset_thresholds};
pub use types::{truncate, Committed, Entry, EntryList, ListKind, Threshold, ThresholdSet};
