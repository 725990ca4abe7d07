use crate::shared::RUN_ID_ENV_VAR;
use crate::shared::choices::ModelChoice;
use crate::shared::completion::DEFAULT_BASE_URL;
use crate::shared::models::{ModelRoot, ParsedConfig, PromptTemplateModel};
use crate::shared::templates::{PromptKind, PromptTemplates, TemplateOrigin};
use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use colored::*;
use directories::{BaseDirs, UserDirs};
use normpath::PathExt;
use secrecy::SecretString;
use serde::Deserialize;
use serde_yaml::{Deserializer, Value};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, warn};
use url::Url;

/// Directory name searched for configuration.
pub const CONFIG_DIR_NAME: &str = ".tibco-assist";

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("config"))]
pub struct ConfigOptions {
    /// API key for the completion service.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global(true))]
    api_key: Option<String>,

    /// Model used for every request.
    #[arg(
        long,
        env = "TIBCO_ASSIST_MODEL",
        value_enum,
        default_value_t = ModelChoice::default(),
        global(true)
    )]
    model: ModelChoice,

    /// Base URL of an OpenAI-compatible API.
    #[arg(
        long,
        env = "TIBCO_ASSIST_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        global(true)
    )]
    base_url: Url,

    /// Add paths to search for configuration. By default, `tibco-assist` will search up
    /// for `.tibco-assist` directories and load `.yml` and `.yaml` files for config.
    /// Specifying this option will _add_ the paths/files to the loaded config.
    #[clap(long, env = "TIBCO_ASSIST_CONFIG_DIR", global(true))]
    extra_config: Vec<String>,

    /// When set, default config files will not be loaded and only specified config will be loaded.
    #[arg(
        long,
        env = "TIBCO_ASSIST_DISABLE_DEFAULT_CONFIG",
        default_value = "false",
        global(true)
    )]
    disable_default_config: bool,

    /// Override the working directory
    #[arg(long, short = 'C', global(true))]
    working_dir: Option<String>,

    /// Unique value naming the log file of this run.
    /// In the case that the run-id is re-used, the old log will be overwritten.
    #[arg(long, global(true), env = RUN_ID_ENV_VAR)]
    run_id: Option<String>,
}

impl ConfigOptions {
    pub fn generate_run_id() -> String {
        let id = nanoid::nanoid!(4, &nanoid::alphabet::SAFE);
        let now = chrono::Local::now();
        let current_time = now.format("%Y%m%d");
        format!("{}-{}", current_time, id)
    }

    pub fn get_run_id(&self) -> String {
        self.run_id.clone().unwrap_or_else(Self::generate_run_id)
    }

    pub async fn load_config(&self) -> Result<FoundConfig> {
        let current_dir = std::env::current_dir();
        let working_dir = match (current_dir, &self.working_dir) {
            (Ok(cwd), None) => cwd,
            (_, Some(dir)) => PathBuf::from(&dir),
            _ => {
                error!(target: "user", "Unable to get a working dir");
                return Err(anyhow!("Unable to get a working dir"));
            }
        };

        let working_dir = working_dir
            .normalize()
            .map_err(|e| anyhow!("Unable to use {} as working dir. {}", working_dir.display(), e))?
            .into_path_buf();

        let config_path = self.find_config_paths(&working_dir);
        let found_config = FoundConfig::new(self, working_dir, config_path).await;

        debug!("Loaded config {:?}", found_config);

        Ok(found_config)
    }

    fn find_config_paths(&self, working_dir: &Path) -> Vec<PathBuf> {
        let mut config_paths = Vec::new();

        if !self.disable_default_config {
            for config_dir in build_config_path(working_dir) {
                debug!("Checking if {} exists", config_dir.display());
                if config_dir.exists() && !config_paths.contains(&config_dir) {
                    config_paths.push(config_dir)
                }
            }
        }

        for extra_config in &self.extra_config {
            let config_dir = Path::new(&extra_config);
            debug!("Checking if {} exists", config_dir.display());
            if config_dir.exists() {
                config_paths.push(config_dir.to_path_buf())
            } else {
                warn!(target: "user", "Config path {} does not exist", config_dir.display());
            }
        }

        config_paths
    }
}

#[derive(Debug)]
pub struct FoundConfig {
    pub working_dir: PathBuf,
    pub api_key: Option<SecretString>,
    pub model: ModelChoice,
    pub base_url: Url,
    pub templates: PromptTemplates,
    pub raw_config: Vec<ModelRoot<Value>>,
    pub config_path: Vec<PathBuf>,
    pub run_id: String,
}

impl FoundConfig {
    /// Config with built-in defaults only, no files and no credential.
    pub fn empty(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            api_key: None,
            model: ModelChoice::default(),
            base_url: default_base_url(),
            templates: PromptTemplates::default(),
            raw_config: Vec::new(),
            config_path: Vec::new(),
            run_id: ConfigOptions::generate_run_id(),
        }
    }

    pub async fn new(
        config_options: &ConfigOptions,
        working_dir: PathBuf,
        config_path: Vec<PathBuf>,
    ) -> Self {
        let raw_config = load_all_config(&config_path).await;

        let mut this = Self {
            working_dir,
            api_key: config_options
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(|key| SecretString::from(key.to_string())),
            model: config_options.model,
            base_url: config_options.base_url.clone(),
            templates: PromptTemplates::default(),
            raw_config: raw_config.clone(),
            config_path,
            run_id: config_options.get_run_id(),
        };

        this.add_models(raw_config);
        this
    }

    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Apply parsed resources in discovery order, the first one per name wins.
    pub fn add_models(&mut self, raw_config: Vec<ModelRoot<Value>>) {
        let mut seen = BTreeSet::new();
        for raw in raw_config {
            let full_name = raw.full_name();
            let file_path = raw.metadata.file_path();
            match ParsedConfig::try_from(raw) {
                Ok(ParsedConfig::PromptTemplate(model)) => self.add_template(model, &mut seen),
                Err(e) => {
                    warn!(target: "user", "Skipping {} in {}. {}", full_name.bold(), file_path, e)
                }
            }
        }
    }

    fn add_template(&mut self, model: PromptTemplateModel, seen: &mut BTreeSet<PromptKind>) {
        let file_path = model.metadata.file_path();
        let kind = match PromptKind::from_str(model.name()) {
            Ok(kind) => kind,
            Err(_) => {
                warn!(target: "user", "Unknown template {} in {}, expected one of: {}", model.name().bold(), file_path, known_template_names());
                return;
            }
        };

        if seen.contains(&kind) {
            warn!(target: "user", "Duplicate {} found, dropping {} in {}", model.full_name().bold(), model.name().bold(), file_path);
            return;
        }

        match self.templates.override_template(
            kind,
            model.spec.system,
            model.spec.template,
            TemplateOrigin::File(file_path.clone()),
        ) {
            Ok(_) => {
                debug!("Template {} loaded from {}", kind, file_path);
                seen.insert(kind);
            }
            Err(e) => {
                warn!(target: "user", "Ignoring template {} in {}. {}", kind.to_string().bold(), file_path, e)
            }
        }
    }
}

fn known_template_names() -> String {
    use strum::IntoEnumIterator;
    PromptKind::iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", ")
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url to be valid")
}

async fn load_all_config(paths: &[PathBuf]) -> Vec<ModelRoot<Value>> {
    let mut loaded_values = Vec::new();

    for file_path in expand_to_files(paths) {
        let file_contents = match tokio::fs::read_to_string(&file_path).await {
            Err(e) => {
                warn!(target: "user", "Unable to read file {} because {}", file_path.display(), e);
                continue;
            }
            Ok(content) => content,
        };
        for doc in Deserializer::from_str(&file_contents) {
            if let Some(parsed_model) = parse_model(doc, &file_path) {
                loaded_values.push(parsed_model)
            }
        }
    }

    loaded_values
}

pub(crate) fn parse_model(doc: Deserializer, file_path: &Path) -> Option<ModelRoot<Value>> {
    let value = match Value::deserialize(doc) {
        Ok(value) => value,
        Err(e) => {
            warn!(target: "user", "Unable to load document from {} because {}", file_path.display(), e);
            return None;
        }
    };

    if value.is_null() {
        return None;
    }

    match serde_yaml::from_value::<ModelRoot<Value>>(value) {
        Ok(mut value) => {
            value.metadata.annotations.file_path = Some(file_path.display().to_string());
            Some(value)
        }
        Err(e) => {
            warn!(target: "user", "Unable to parse model from {} because {}", file_path.display(), e);
            None
        }
    }
}

fn expand_to_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut config_files = Vec::new();
    for path in paths {
        let expanded_paths = expand_path(path).unwrap_or_else(|e| {
            warn!(target: "user", "Unable to access filesystem because {}", e);
            Vec::new()
        });
        config_files.extend(expanded_paths);
    }

    config_files
}

fn expand_path(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files = Vec::new();
        for dir_entry in fs::read_dir(path)?.flatten() {
            if !dir_entry.path().is_file() {
                continue;
            }

            let file_path = dir_entry.path();
            let extension = file_path.extension();
            if extension == Some(OsStr::new("yaml")) || extension == Some(OsStr::new("yml")) {
                debug!(target: "user", "Found file {:?}", file_path);
                files.push(file_path);
            }
        }

        // read_dir order is platform dependent
        files.sort();
        return Ok(files);
    }

    warn!("Unknown file type {}", path.display());
    Ok(Vec::new())
}

/// Candidate config directories, most specific first.
pub fn build_config_path(working_dir: &Path) -> Vec<PathBuf> {
    let mut config_path = Vec::new();

    for search_dir in working_dir.ancestors() {
        config_path.push(search_dir.join(CONFIG_DIR_NAME))
    }

    if let Some(user_dirs) = UserDirs::new() {
        config_path.push(user_dirs.home_dir().join(CONFIG_DIR_NAME));
    }

    if let Some(base_dirs) = BaseDirs::new() {
        config_path.push(base_dirs.config_dir().join(CONFIG_DIR_NAME));
    }

    config_path
}
