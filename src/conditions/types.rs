//! core types for the if-action system

use std::fmt;

/// which branch of an entry has already fired for the current run
///
/// a single field instead of two flags keeps "at most one branch committed"
/// structural
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Committed {
    /// nothing has fired since the last reset
    #[default]
    Neither,
    /// the true (or match) branch fired and still holds
    True,
    /// the false (or not-match) branch fired and still holds
    False,
}

/// the two ordered list families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// boolean expressions: IfCondition / IfTrueAction / IfFalseAction
    Condition,
    /// regex patterns: IfMatch / IfMatchAction / IfNotMatchAction
    Match,
}

impl ListKind {
    /// base key of the expression or pattern option
    pub fn source_key(&self) -> &'static str {
        match self {
            ListKind::Condition => "IfCondition",
            ListKind::Match => "IfMatch",
        }
    }

    /// base key of the action fired when the entry holds
    pub fn true_key(&self) -> &'static str {
        match self {
            ListKind::Condition => "IfTrueAction",
            ListKind::Match => "IfMatchAction",
        }
    }

    /// base key of the action fired when the entry does not hold
    pub fn false_key(&self) -> &'static str {
        match self {
            ListKind::Condition => "IfFalseAction",
            ListKind::Match => "IfNotMatchAction",
        }
    }

    /// key of the level/edge mode toggle for the whole list
    pub fn mode_key(&self) -> &'static str {
        match self {
            ListKind::Condition => "IfConditionMode",
            ListKind::Match => "IfMatchMode",
        }
    }

    /// option name for a 1-based position: `IfCondition`, `IfCondition2`, ...
    pub fn numbered(base: &str, position: usize) -> String {
        if position <= 1 {
            base.to_string()
        } else {
            format!("{}{}", base, position)
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_key())
    }
}

/// one expression-or-pattern triple plus its firing state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    /// expression text (condition list) or pattern text (match list)
    pub source: String,
    /// IfTrueAction / IfMatchAction
    pub true_action: String,
    /// IfFalseAction / IfNotMatchAction
    pub false_action: String,
    /// branch committed for the current run
    pub committed: Committed,
    /// a diagnostic was already logged for the current failure run
    pub has_error: bool,
}

impl Entry {
    /// create a fresh entry with no committed branch and no error
    pub fn new(
        source: impl Into<String>,
        true_action: impl Into<String>,
        false_action: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            true_action: true_action.into(),
            false_action: false_action.into(),
            committed: Committed::Neither,
            has_error: false,
        }
    }

    /// overwrite text and actions, leaving firing state untouched
    pub fn set(&mut self, source: String, true_action: String, false_action: String) {
        self.source = source;
        self.true_action = true_action;
        self.false_action = false_action;
    }

    /// an entry with no source or no actions never evaluates
    pub fn is_active(&self) -> bool {
        !self.source.is_empty() && (!self.true_action.is_empty() || !self.false_action.is_empty())
    }

    /// record an outcome and return the action to fire, if any
    ///
    /// `level` fires on every call while the branch holds; otherwise only
    /// when the branch was not already committed
    pub fn commit(&mut self, outcome: bool, level: bool) -> Option<&str> {
        let (branch, action) = if outcome {
            (Committed::True, &self.true_action)
        } else {
            (Committed::False, &self.false_action)
        };

        let fire = level || self.committed != branch;
        self.committed = branch;

        if fire {
            Some(action.as_str())
        } else {
            None
        }
    }

    /// forget which branch fired
    pub fn reset(&mut self) {
        self.committed = Committed::Neither;
    }
}

/// ordered, index-addressed list of entries sharing one mode toggle
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList {
    pub kind: ListKind,
    /// level-triggered when true, edge-triggered otherwise
    pub level_triggered: bool,
    pub entries: Vec<Entry>,
}

impl EntryList {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            level_triggered: false,
            entries: Vec::new(),
        }
    }

    /// overwrite the entry at `index` in place, or append a fresh one
    ///
    /// `index` must be at most `len()`; the loader only ever grows the list
    /// contiguously
    pub fn upsert(
        &mut self,
        index: usize,
        source: String,
        true_action: String,
        false_action: String,
    ) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.set(source, true_action, false_action);
        } else {
            debug_assert_eq!(index, self.entries.len());
            self.entries.push(Entry::new(source, true_action, false_action));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// clear the committed branch of every entry
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.reset();
        }
    }
}

/// one scalar threshold: value, action and single-shot flag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Threshold<T> {
    pub value: T,
    pub action: String,
    pub committed: bool,
}

impl<T: PartialEq> Threshold<T> {
    pub fn new(value: T, action: impl Into<String>) -> Self {
        Self {
            value,
            action: action.into(),
            committed: false,
        }
    }

    /// same value and action as `other`, ignoring the flag
    pub fn same_setting(&self, other: &Self) -> bool {
        self.value == other.value && self.action == other.action
    }
}

/// IfEqual / IfAbove / IfBelow settings for one subject
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdSet {
    pub above: Threshold<f64>,
    pub below: Threshold<f64>,
    pub equal: Threshold<i64>,
}

impl ThresholdSet {
    /// replace settings with `next`, keeping a flag only where the threshold
    /// did not change
    pub fn reload(&mut self, mut next: ThresholdSet) {
        next.above.committed = self.above.committed && self.above.same_setting(&next.above);
        next.below.committed = self.below.committed && self.below.same_setting(&next.below);
        next.equal.committed = self.equal.committed && self.equal.same_setting(&next.equal);
        *self = next;
    }

    /// NaN and infinities never equal anything
    pub fn equal_holds(&self, value: f64) -> bool {
        value.is_finite() && truncate(value) == self.equal.value
    }

    pub fn above_holds(&self, value: f64) -> bool {
        value > self.above.value
    }

    pub fn below_holds(&self, value: f64) -> bool {
        value < self.below.value
    }
}

/// truncate toward zero, saturating at the i64 range (NaN becomes 0)
pub fn truncate(value: f64) -> i64 {
    value as i64
}
