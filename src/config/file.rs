//! JSON5-backed option reader

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::{ConfigError, OptionReader};
use crate::expression::parse_expr;

/// sections of option keys loaded from a JSON5 document
///
/// section and key lookups ignore ASCII case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    sections: Map<String, Value>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let value: Value =
            json5::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(sections) = value else {
            return Err(ConfigError::RootShape);
        };

        for (name, section) in &sections {
            if !section.is_object() {
                return Err(ConfigError::SectionShape(name.clone()));
            }
        }

        Ok(Self { sections })
    }

    /// section names, sorted
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// set (or replace) one option, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let name = self
            .sections
            .keys()
            .find(|k| k.eq_ignore_ascii_case(section))
            .cloned()
            .unwrap_or_else(|| section.to_string());

        let entry = self
            .sections
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));

        if let Value::Object(options) = entry {
            let existing = options
                .keys()
                .find(|k| k.eq_ignore_ascii_case(key))
                .cloned();
            if let Some(existing) = existing {
                options.remove(&existing);
            }
            options.insert(key.to_string(), value.into());
        }
    }

    /// remove one option; returns whether it existed
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let Some(Value::Object(options)) = self
            .sections
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(section))
            .map(|(_, v)| v)
        else {
            return false;
        };

        let existing = options
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .cloned();
        match existing {
            Some(k) => options.remove(&k).is_some(),
            None => false,
        }
    }

    fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.sections
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(section))
            .and_then(|(_, v)| v.as_object())
    }

    fn raw(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section)?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

/// numeric text, or a parenthesized formula without names
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(n) = text.parse::<f64>() {
        return Some(n);
    }

    if text.starts_with('(') {
        return parse_expr(text).ok()?.eval(&|_| None).ok();
    }

    None
}

impl OptionReader for ConfigFile {
    fn read_string(&self, section: &str, key: &str, default: &str, allow_empty: bool) -> String {
        let value = match self.raw(section, key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => (if *b { "1" } else { "0" }).to_string(),
            Some(other) if !other.is_null() => {
                log::warn!("[{}] {} is not a scalar, ignored", section, key);
                return default.to_string();
            }
            _ => return default.to_string(),
        };

        if value.is_empty() && !allow_empty {
            return default.to_string();
        }
        value
    }

    fn read_float(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.raw(section, key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Some(Value::String(s)) if s.trim().is_empty() => default,
            Some(Value::String(s)) => parse_number(s).unwrap_or_else(|| {
                log::warn!("[{}] {}={} is not a number", section, key, s);
                default
            }),
            _ => default,
        }
    }

    fn read_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.raw(section, key) {
            Some(Value::Bool(b)) => *b,
            Some(_) => self.read_float(section, key, if default { 1.0 } else { 0.0 }) != 0.0,
            None => default,
        }
    }
}
