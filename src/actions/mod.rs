//! action dispatch
//!
//! the engine hands every fired action string to an [`ActionExecutor`]
//! together with the subject's window context. dispatch is fire-and-forget:
//! executors report nothing back to the engine

/// receives fired actions
///
/// `W` is the opaque window context of the subject that fired
pub trait ActionExecutor<W: ?Sized> {
    fn execute(&mut self, action: &str, window: &W);
}

impl<W: ?Sized, F> ActionExecutor<W> for F
where
    F: FnMut(&str, &W),
{
    fn execute(&mut self, action: &str, window: &W) {
        self(action, window)
    }
}

/// collects fired actions in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingExecutor {
    pub fired: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// take everything recorded so far
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.fired)
    }
}

impl<W: ?Sized> ActionExecutor<W> for RecordingExecutor {
    fn execute(&mut self, action: &str, _window: &W) {
        self.fired.push(action.to_string());
    }
}

/// logs each action at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogExecutor;

impl<W: ?Sized + std::fmt::Display> ActionExecutor<W> for LogExecutor {
    fn execute(&mut self, action: &str, window: &W) {
        log::info!("[{}] execute: {}", window, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_executor_keeps_order() {
        let mut exec = RecordingExecutor::new();
        ActionExecutor::<str>::execute(&mut exec, "!A", "skin");
        ActionExecutor::<str>::execute(&mut exec, "!B", "skin");

        assert_eq!(exec.drain(), vec!["!A".to_string(), "!B".to_string()]);
        assert!(exec.fired.is_empty());
    }

    #[test]
    fn test_closure_executor() {
        let mut seen = Vec::new();
        {
            let mut exec = |action: &str, window: &str| seen.push(format!("{}@{}", action, window));
            exec.execute("!Refresh", "Clock");
        }
        assert_eq!(seen, vec!["!Refresh@Clock".to_string()]);
    }

    #[test]
    fn test_log_executor_accepts_any_display_window() {
        let mut exec = LogExecutor;
        ActionExecutor::<str>::execute(&mut exec, "!A", "skin");
        ActionExecutor::<u32>::execute(&mut exec, "!B", &7);

        let engine_exec: &mut dyn ActionExecutor<str> = &mut exec;
        engine_exec.execute("!C", "skin");
    }
}
