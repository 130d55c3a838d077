//! the polled entity whose value drives evaluation

use std::borrow::Cow;
use std::collections::HashMap;

/// read access to a subject's current value
pub trait Subject {
    /// opaque context handed to the action executor
    type Window: ?Sized;

    /// section name, used to prefix diagnostics
    fn name(&self) -> &str;

    fn current_value(&self) -> f64;

    fn current_text(&self) -> Cow<'_, str>;

    fn window(&self) -> &Self::Window;

    /// resolve a name referenced from an IfCondition formula
    ///
    /// the default resolves only the subject's own name
    fn resolve(&self, name: &str) -> Option<f64> {
        name.eq_ignore_ascii_case(self.name())
            .then(|| self.current_value())
    }
}

/// a plain value/text snapshot
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub name: String,
    pub window: String,
    pub value: f64,
    /// when unset, the text form of `value`
    pub text: Option<String>,
    /// other named values visible to formulas
    pub others: HashMap<String, f64>,
}

impl Snapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: impl Into<String>) -> Self {
        self.window = window.into();
        self
    }

    pub fn with_other(mut self, name: impl Into<String>, value: f64) -> Self {
        self.others.insert(name.into(), value);
        self
    }

    /// set the numeric value and clear any explicit text
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.text = None;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl Subject for Snapshot {
    type Window = str;

    fn name(&self) -> &str {
        &self.name
    }

    fn current_value(&self) -> f64 {
        self.value
    }

    fn current_text(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(format_value(self.value)),
        }
    }

    fn window(&self) -> &str {
        &self.window
    }

    fn resolve(&self, name: &str) -> Option<f64> {
        if name.eq_ignore_ascii_case(&self.name) {
            return Some(self.value);
        }
        self.others
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// shortest text form: integral values without a fraction
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
