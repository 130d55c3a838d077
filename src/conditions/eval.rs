//! IfCondition / IfMatch list evaluation
//!
//! both lists share one state machine per entry:
//! - failure to parse or compile logs once per failure run and leaves the
//!   committed branch untouched
//! - success clears the error mark, then commits the outcome; the action
//!   fires on every cycle in level mode, or only when the committed branch
//!   changes in edge mode

use std::fmt;

use super::pattern::{PatternMatcher, RegexMatcher};
use super::types::{EntryList, ListKind};
use crate::actions::ActionExecutor;
use crate::expression::{ExpressionParser, MathParser};
use crate::subject::Subject;

/// collaborators used by one evaluation pass
pub struct EvalContext<'a, W: ?Sized> {
    pub expressions: &'a dyn ExpressionParser,
    pub patterns: &'a dyn PatternMatcher,
    pub executor: &'a mut dyn ActionExecutor<W>,
}

impl<'a, W: ?Sized> EvalContext<'a, W> {
    /// context with the bundled formula parser and regex matcher
    pub fn new(executor: &'a mut dyn ActionExecutor<W>) -> Self {
        Self {
            expressions: &MathParser,
            patterns: &RegexMatcher,
            executor,
        }
    }

    pub fn with_expressions(mut self, expressions: &'a dyn ExpressionParser) -> Self {
        self.expressions = expressions;
        self
    }

    pub fn with_patterns(mut self, patterns: &'a dyn PatternMatcher) -> Self {
        self.patterns = patterns;
        self
    }
}

/// an entry that failed to parse or compile
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ListKind,
    /// 1-based list position
    pub position: usize,
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    /// option name of the failing entry, e.g. `IfCondition2`
    pub fn key(&self) -> String {
        ListKind::numbered(self.kind.source_key(), self.position)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ListKind::Condition => write!(f, "{}: {}={}", self.message, self.key(), self.source),
            ListKind::Match => write!(
                f,
                "Error: \"{}\" in {}={}",
                self.message,
                self.key(),
                self.source
            ),
        }
    }
}

/// what one evaluation pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalReport {
    /// number of actions handed to the executor
    pub fired: usize,
    /// diagnostics newly raised this pass
    pub diagnostics: Vec<Diagnostic>,
}

/// hand a non-empty action to the executor
pub(crate) fn fire<W: ?Sized, E: ActionExecutor<W> + ?Sized>(
    executor: &mut E,
    action: &str,
    window: &W,
    subject: &str,
    fired: &mut usize,
) {
    if action.is_empty() {
        return;
    }
    log::debug!("[{}] firing: {}", subject, action);
    executor.execute(action, window);
    *fired += 1;
}

/// outcome of testing one entry: Ok(None) means "neither branch"
type Outcome = Result<Option<bool>, String>;

fn run_list<S, F>(
    list: &mut EntryList,
    subject: &S,
    executor: &mut dyn ActionExecutor<S::Window>,
    report: &mut EvalReport,
    mut test: F,
) where
    S: Subject + ?Sized,
    F: FnMut(&str) -> Outcome,
{
    let kind = list.kind;
    let level = list.level_triggered;

    for (index, entry) in list.entries.iter_mut().enumerate() {
        if !entry.is_active() {
            continue;
        }

        match test(&entry.source) {
            Err(message) => {
                if entry.has_error {
                    continue;
                }
                entry.has_error = true;

                let diagnostic = Diagnostic {
                    kind,
                    position: index + 1,
                    source: entry.source.clone(),
                    message,
                };
                log::error!("[{}] {}", subject.name(), diagnostic);
                report.diagnostics.push(diagnostic);
            }
            Ok(outcome) => {
                entry.has_error = false;

                let Some(outcome) = outcome else {
                    continue;
                };
                if let Some(action) = entry.commit(outcome, level) {
                    fire(
                        &mut *executor,
                        action,
                        subject.window(),
                        subject.name(),
                        &mut report.fired,
                    );
                }
            }
        }
    }
}

/// evaluate every IfCondition entry; 1 is true, 0 is false, anything else
/// fires nothing
pub fn evaluate_conditions<S: Subject + ?Sized>(
    list: &mut EntryList,
    subject: &S,
    ctx: &mut EvalContext<'_, S::Window>,
    report: &mut EvalReport,
) {
    let parser = ctx.expressions;
    let lookup = |name: &str| subject.resolve(name);

    run_list(list, subject, &mut *ctx.executor, report, |source| {
        match parser.parse(source, &lookup) {
            Ok(result) if result == 1.0 => Ok(Some(true)),
            Ok(result) if result == 0.0 => Ok(Some(false)),
            Ok(_) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    });
}

/// evaluate every IfMatch entry against the subject's text
///
/// patterns are compiled fresh for each entry and released before the next
pub fn evaluate_matches<S: Subject + ?Sized>(
    list: &mut EntryList,
    subject: &S,
    ctx: &mut EvalContext<'_, S::Window>,
    report: &mut EvalReport,
) {
    let patterns = ctx.patterns;
    let text = subject.current_text();

    run_list(list, subject, &mut *ctx.executor, report, |source| {
        let compiled = patterns.compile(source).map_err(|e| e.message)?;
        Ok(Some(compiled.is_match(&text)))
    });
}
