//! Internal abstractions for library-first design.
//!
//! The action code never talks to a terminal directly. Everything that
//! would be a banner or a password field on a page goes through
//! [`interaction::UserInteraction`], so the same code path serves the CLI,
//! library callers, and tests.
//!
//! | Use Case | UserInteraction |
//! |----------|-----------------|
//! | CLI/Interactive | `InquireInteraction` (in [`crate::cli`]) |
//! | Library with logging | `LogInteraction` |
//! | Tests / embedding | `Silent` or `MockUserInteraction` |
//!
//! ```rust
//! use tibco_assist::internal::interaction::{UserInteraction, Silent};
//!
//! let interaction = Silent;
//! assert!(interaction.ask_secret("Groq API Key", None).is_none());
//! interaction.error("not shown anywhere");
//! ```

pub mod interaction;

pub use interaction::{LogInteraction, Silent, UserInteraction};
