//! Terminal implementation of [`UserInteraction`].
//!
//! Status messages go through tracing so they share the console with the
//! spinner. Secrets are read with an `inquire` password prompt, which is
//! skipped when stdin is not a TTY (pipes, CI).

use crate::internal::interaction::UserInteraction;
use inquire::InquireError;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct InquireInteraction;

impl UserInteraction for InquireInteraction {
    fn ask_secret(&self, prompt: &str, help_text: Option<&'static str>) -> Option<String> {
        tracing_indicatif::suspend_tracing_indicatif(|| {
            let base_prompt = inquire::Password::new(prompt)
                .without_confirmation()
                .with_display_mode(inquire::PasswordDisplayMode::Masked);
            let prompt = match help_text {
                Some(text) => base_prompt.with_help_message(text),
                None => base_prompt,
            };

            match prompt.prompt() {
                Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
                Ok(_) => None,
                Err(InquireError::NotTTY) => {
                    warn!(target: "user", "Prompting user, but input device is not a TTY. Skipping.");
                    None
                }
                Err(_) => None,
            }
        })
    }

    fn notify(&self, message: &str) {
        info!(target: "user", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "user", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "always", "{}", message);
    }
}
