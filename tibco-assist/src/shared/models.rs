//! Resources that can be declared in `.tibco-assist` config files.

use anyhow::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

pub const API_VERSION: &str = "tibco-assist/v1alpha";
pub const PROMPT_TEMPLATE_KIND: &str = "PromptTemplate";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ModelMetadataAnnotations {
    #[serde(rename = "tibco-assist/file-path")]
    pub file_path: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, Builder)]
#[builder(setter(into))]
pub struct ModelMetadata {
    pub name: String,
    #[serde(default = "default_description")]
    #[builder(default = "default_description()")]
    pub description: String,
    #[serde(default)]
    #[builder(default)]
    pub annotations: ModelMetadataAnnotations,
}

fn default_description() -> String {
    "Description not provided".to_string()
}

impl ModelMetadata {
    pub fn file_path(&self) -> String {
        match &self.annotations.file_path {
            Some(v) => v.to_string(),
            None => "unknown".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ModelRoot<V> {
    pub api_version: String,
    pub kind: String,
    pub metadata: ModelMetadata,
    pub spec: V,
}

impl<V> ModelRoot<V> {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.kind, self.name())
    }

    fn is_kind(&self, api_version: &str, kind: &str) -> bool {
        self.api_version.eq_ignore_ascii_case(api_version) && self.kind.eq_ignore_ascii_case(kind)
    }
}

/// Replacement text for one of the built-in prompts.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct PromptTemplateSpec {
    /// Replaces the role instruction sent as the system message.
    #[serde(default)]
    pub system: Option<String>,
    /// minijinja template for the user message.
    pub template: String,
}

pub type PromptTemplateModel = ModelRoot<PromptTemplateSpec>;

/// Every resource this tool understands.
#[derive(Debug, PartialEq, Clone)]
pub enum ParsedConfig {
    PromptTemplate(PromptTemplateModel),
}

impl TryFrom<ModelRoot<Value>> for ParsedConfig {
    type Error = anyhow::Error;

    fn try_from(value: ModelRoot<Value>) -> Result<Self, Self::Error> {
        if value.is_kind(API_VERSION, PROMPT_TEMPLATE_KIND) {
            let parsed: PromptTemplateModel = ModelRoot {
                api_version: value.api_version,
                kind: value.kind,
                metadata: value.metadata,
                spec: serde_yaml::from_value(value.spec)?,
            };
            return Ok(ParsedConfig::PromptTemplate(parsed));
        }

        Err(anyhow::anyhow!(
            "Unknown resource {} with apiVersion {}",
            value.full_name(),
            value.api_version
        ))
    }
}
