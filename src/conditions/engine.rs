//! per-subject if-action state

use super::eval::{evaluate_conditions, evaluate_matches, fire, EvalContext, EvalReport};
use super::loader::{read_list, read_thresholds};
use super::threshold::{evaluate_thresholds, reset_thresholds};
use super::types::{EntryList, ListKind, ThresholdSet};
use crate::config::OptionReader;
use crate::subject::Subject;

/// threshold, condition and match state owned by one subject
#[derive(Debug, Clone, PartialEq)]
pub struct IfActions {
    pub thresholds: ThresholdSet,
    pub conditions: EntryList,
    pub matches: EntryList,
}

impl Default for IfActions {
    fn default() -> Self {
        Self::new()
    }
}

impl IfActions {
    pub fn new() -> Self {
        Self {
            thresholds: ThresholdSet::default(),
            conditions: EntryList::new(ListKind::Condition),
            matches: EntryList::new(ListKind::Match),
        }
    }

    /// read every option this component understands from `section`
    pub fn read_options<R: OptionReader + ?Sized>(&mut self, reader: &R, section: &str) {
        self.read_threshold_options(reader, section);
        self.read_condition_options(reader, section);
    }

    /// IfAbove / IfBelow / IfEqual
    pub fn read_threshold_options<R: OptionReader + ?Sized>(&mut self, reader: &R, section: &str) {
        self.thresholds.reload(read_thresholds(reader, section));
    }

    /// IfCondition and IfMatch lists with their mode toggles
    pub fn read_condition_options<R: OptionReader + ?Sized>(&mut self, reader: &R, section: &str) {
        read_list(reader, section, &mut self.conditions);
        read_list(reader, section, &mut self.matches);
    }

    /// run one update cycle: thresholds, then conditions, then matches
    pub fn evaluate<S: Subject + ?Sized>(
        &mut self,
        subject: &S,
        ctx: &mut EvalContext<'_, S::Window>,
    ) -> EvalReport {
        let mut report = EvalReport::default();

        let value = subject.current_value();
        evaluate_thresholds(&mut self.thresholds, value, |action| {
            fire(
                &mut *ctx.executor,
                action,
                subject.window(),
                subject.name(),
                &mut report.fired,
            )
        });

        evaluate_conditions(&mut self.conditions, subject, ctx, &mut report);
        evaluate_matches(&mut self.matches, subject, ctx, &mut report);

        report
    }

    /// resync after the subject's value was reset outside an update
    ///
    /// threshold flags are cleared where their condition no longer holds;
    /// every list entry forgets its committed branch
    pub fn set_state(&mut self, value: f64) {
        reset_thresholds(&mut self.thresholds, value);
        self.conditions.reset();
        self.matches.reset();
    }

    /// true if nothing is configured
    pub fn is_empty(&self) -> bool {
        self.thresholds.above.action.is_empty()
            && self.thresholds.below.action.is_empty()
            && self.thresholds.equal.action.is_empty()
            && self.conditions.is_empty()
            && self.matches.is_empty()
    }
}
