//! pattern matching for IfMatch entries

use regex::Regex;
use thiserror::Error;

/// a pattern failed to compile
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PatternError {
    pub message: String,
    /// byte offset into the pattern, when the engine reports one
    pub offset: Option<usize>,
}

impl PatternError {
    pub fn new(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// a compiled pattern; dropping it releases the engine's resources
pub trait CompiledPattern {
    /// unanchored search: true if the pattern matches anywhere in `text`
    fn is_match(&self, text: &str) -> bool;
}

/// compiles UTF-8 patterns
pub trait PatternMatcher {
    /// a failed compile yields no handle, so there is nothing to release
    fn compile(&self, pattern: &str) -> Result<Box<dyn CompiledPattern>, PatternError>;
}

/// [`PatternMatcher`] backed by the `regex` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

impl CompiledPattern for Regex {
    fn is_match(&self, text: &str) -> bool {
        Regex::is_match(self, text)
    }
}

impl PatternMatcher for RegexMatcher {
    fn compile(&self, pattern: &str) -> Result<Box<dyn CompiledPattern>, PatternError> {
        match Regex::new(pattern) {
            Ok(re) => Ok(Box::new(re)),
            Err(e) => Err(from_regex_error(&e)),
        }
    }
}

fn from_regex_error(e: &regex::Error) -> PatternError {
    match e {
        regex::Error::Syntax(text) => {
            // the rendered syntax error is multi-line; the last line is the
            // human description ("error: unclosed group")
            let message = text
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().trim_start_matches("error: ").to_string())
                .unwrap_or_else(|| text.clone());
            PatternError::new(message, None)
        }
        other => PatternError::new(other.to_string(), None),
    }
}
