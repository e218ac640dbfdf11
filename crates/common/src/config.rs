//! Stack configuration document
//!
//! This module provides loading and saving of the YAML configuration that
//! drives code generation and diagram rendering: stacks, API gateways,
//! lambdas with their triggers, RESTful APIs, filters and draw settings.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root of the configuration document
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Diagram settings (stack name used by the reverse direction)
    #[serde(default)]
    pub diagram: DiagramSettings,
    /// Rendering settings for the DOT diagram
    #[serde(default)]
    pub draw: DrawSettings,
    /// Per resource type allow/deny patterns, keyed by lower-case type name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: Filters,
    #[serde(default)]
    pub stacks: Vec<Stack>,
    /// RESTful APIs called by lambdas, unique by name
    #[serde(default)]
    pub restful_apis: Vec<RestfulApi>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DiagramSettings {
    #[serde(default)]
    pub stack_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DrawSettings {
    /// Graphviz `rankdir` (e.g. "LR", "TB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    /// Icon overrides keyed by resource type name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub images: BTreeMap<String, String>,
}

/// Filters keyed by lower-case resource type name
pub type Filters = BTreeMap<String, Filter>;

/// Allow/deny regex lists for one resource type
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Filter {
    /// Value must match at least one of these (when non-empty)
    #[serde(default, rename = "match")]
    pub matches: Vec<String>,
    /// Value must match none of these
    #[serde(default)]
    pub not_match: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Stack {
    pub name: String,
    #[serde(default)]
    pub api_gateways: Vec<ApiGateway>,
    #[serde(default)]
    pub lambdas: Vec<Lambda>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiGateway {
    pub stack_name: String,
    #[serde(default)]
    pub api_domain: String,
    #[serde(default)]
    pub apig: bool,
    #[serde(default)]
    pub lambdas: Vec<ApiGatewayLambda>,
}

/// Lambda served behind an API Gateway route
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiGatewayLambda {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub envars: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub path: String,
}

/// Standalone lambda with its triggers
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Lambda {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub envars: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub sqs_triggers: Vec<Trigger>,
    #[serde(default)]
    pub kinesis_triggers: Vec<Trigger>,
    #[serde(default)]
    pub crons: Vec<Cron>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Trigger {
    pub source_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Cron {
    pub schedule_expression: String,
    #[serde(default)]
    pub is_enabled: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RestfulApi {
    pub name: String,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Stack name from the diagram settings, falling back to the first stack
    pub fn stack_name(&self) -> &str {
        if !self.diagram.stack_name.is_empty() {
            return &self.diagram.stack_name;
        }
        self.stacks.first().map(|s| s.name.as_str()).unwrap_or_default()
    }
}
