//! User interaction abstractions.
//!
//! Messages are split by severity so callers can route them to a status
//! line, a warning, or an error banner.

use mockall::automock;
use tracing::{error, info, warn};

/// Trait for talking to whoever triggered an action.
///
/// # Example
///
/// ```rust,ignore
/// use tibco_assist::internal::interaction::{UserInteraction, LogInteraction};
///
/// fn report<U: UserInteraction>(interaction: &U) {
///     interaction.error("Please provide TIBCO code/XML to analyze");
/// }
/// ```
#[automock]
pub trait UserInteraction: Send + Sync {
    /// Ask for a secret value (e.g. an API key) without echoing it.
    ///
    /// Returns `None` when nothing could be asked or the user gave up.
    fn ask_secret(&self, prompt: &str, help_text: Option<&'static str>) -> Option<String>;

    /// Informational status message.
    fn notify(&self, message: &str);

    /// Something looks off, but the action continues.
    fn warn(&self, message: &str);

    /// The action was blocked or failed.
    fn error(&self, message: &str);
}

/// Writes every message to the `user` tracing target and never prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInteraction;

impl UserInteraction for LogInteraction {
    fn ask_secret(&self, _prompt: &str, _help_text: Option<&'static str>) -> Option<String> {
        None
    }

    fn notify(&self, message: &str) {
        info!(target: "user", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "user", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "user", "{}", message);
    }
}

/// Swallows every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl UserInteraction for Silent {
    fn ask_secret(&self, _prompt: &str, _help_text: Option<&'static str>) -> Option<String> {
        None
    }

    fn notify(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_never_yields_a_secret() {
        let interaction = Silent;
        assert!(interaction.ask_secret("Groq API Key", None).is_none());
        assert!(interaction.ask_secret("Groq API Key", Some("help")).is_none());
    }

    #[test]
    fn test_log_interaction_never_yields_a_secret() {
        let interaction = LogInteraction;
        assert!(interaction.ask_secret("Groq API Key", None).is_none());
    }

    #[test]
    fn test_messages_do_not_panic() {
        for interaction in [&Silent as &dyn UserInteraction, &LogInteraction] {
            interaction.notify("note");
            interaction.warn("careful");
            interaction.error("broken");
        }
    }
}
