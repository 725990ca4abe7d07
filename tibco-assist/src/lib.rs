//! Assistant for TIBCO BusinessWorks processes backed by a hosted LLM.
//!
//! Each action (test cases, complexity, optimization, documentation,
//! migration) renders one prompt from the process text and the selected
//! options, sends a single chat-completion request, and formats the answer.

pub mod assist;
pub mod cli;
pub mod internal;
pub mod shared;

pub mod prelude {
    pub use crate::assist::prelude::*;
    pub use crate::shared::prelude::*;
}

pub use internal::interaction::{LogInteraction, Silent, UserInteraction};
pub use shared::prelude::{ConfigOptions, FoundConfig, LoggingOpts};

/// Write result text to stdout through the shared writer, so it doesn't tear
/// the progress bar. The line is also recorded in the log file. Must be
/// called from async code.
#[macro_export]
macro_rules! report_stdout {
    ($($arg:tt)*) => {
        tracing::info!(target="stdout", $($arg)*);
        writeln!($crate::prelude::STDOUT_WRITER.write().await, $($arg)*).ok()
    };
}
