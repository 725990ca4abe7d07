pub mod choices;
pub mod client_cache;
pub mod completion;
mod config_load;
pub mod format;
pub mod input;
mod logging;
pub mod models;
pub mod templates;

pub const RUN_ID_ENV_VAR: &str = "TIBCO_ASSIST_RUN_ID";

pub mod prelude {
    pub use super::RUN_ID_ENV_VAR;
    pub use super::choices::*;
    pub use super::client_cache::{CLIENT_CACHE, ClientCache};
    pub use super::completion::{
        ChatMessage, CompletionError, CompletionProvider, CompletionRequest,
        CompletionRequestBuilder, DEFAULT_BASE_URL, GroqClient, MockCompletionProvider, Role,
    };
    pub use super::config_load::{CONFIG_DIR_NAME, ConfigOptions, FoundConfig, build_config_path};
    pub use super::format::*;
    pub use super::input::{CollectedInput, InputError, InputSource, decode_bytes};
    pub use super::logging::{
        ConfiguredLogger, LoggingOpts, LoggingProgress, STDERR_WRITER, STDOUT_WRITER,
        progress_bar_without_pos,
    };
    pub use super::templates::{
        PromptKind, PromptTemplates, RenderedPrompt, TemplateError, TemplateOrigin,
    };
}
