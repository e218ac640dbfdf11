//! Terraform AST as handed over by the HCL parser
//!
//! The parser itself lives outside this workspace. Its output is accepted as a
//! JSON document: an ordered list of modules and an ordered list of resources,
//! each carrying a bag of attributes.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Attribute bag of a declared block
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Value of a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Explicit `null`, treated as an absent attribute
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<AttributeValue>),
    Block(Attributes),
}

impl AttributeValue {
    /// Scalar value rendered as text; `None` for nulls, lists and blocks
    pub fn to_text(&self) -> Option<String> {
        match self {
            AttributeValue::Text(s) => Some(s.clone()),
            AttributeValue::Number(n) => Some(n.to_string()),
            AttributeValue::Bool(b) => Some(b.to_string()),
            AttributeValue::Null | AttributeValue::List(_) | AttributeValue::Block(_) => None,
        }
    }

    /// Nested blocks carried by this value
    ///
    /// HCL parsers emit a nested block either as a map or as a list of maps.
    fn blocks(&self) -> Vec<&Attributes> {
        match self {
            AttributeValue::Block(block) => vec![block],
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    AttributeValue::Block(block) => Some(block),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A declared `resource "<type>" "<name>"` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ResourceBlock {
    /// Label other blocks use to address this one
    ///
    /// The second label wins over `name` when the parser reports both.
    pub fn label(&self) -> &str {
        match self.labels.as_slice() {
            [_, label, ..] => label,
            _ => &self.name,
        }
    }

    /// Scalar attribute as text
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.get(key).and_then(AttributeValue::to_text)
    }

    /// Environment variables from the nested `environment { variables = {...} }` block
    pub fn environment_variables(&self) -> BTreeMap<String, String> {
        let mut variables = BTreeMap::new();
        let Some(environment) = self.attributes.get("environment") else {
            return variables;
        };

        for block in environment.blocks() {
            if let Some(vars) = block.get("variables") {
                for vars_block in vars.blocks() {
                    extend_with_scalars(&mut variables, vars_block);
                }
            }
        }

        variables
    }
}

/// A declared `module "<label>"` block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleBlock {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ModuleBlock {
    pub fn label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or_default()
    }

    /// Scalar attribute as text
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.get(key).and_then(AttributeValue::to_text)
    }

    /// Environment variables from a flat `*env_vars` / `environment_variables` map
    pub fn environment_variables(&self) -> BTreeMap<String, String> {
        let mut variables = BTreeMap::new();

        for (key, value) in &self.attributes {
            if key == "environment_variables" || key.ends_with("env_vars") {
                for block in value.blocks() {
                    extend_with_scalars(&mut variables, block);
                }
            }
        }

        variables
    }
}

fn extend_with_scalars(variables: &mut BTreeMap<String, String>, block: &Attributes) {
    variables.extend(
        block
            .iter()
            .filter_map(|(key, value)| value.to_text().map(|text| (key.clone(), text))),
    );
}

/// Parsed infrastructure description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InfraConfig {
    #[serde(default)]
    pub modules: Vec<ModuleBlock>,
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

impl InfraConfig {
    /// Load a parsed AST from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read Terraform AST {:?}: {}", path, e))
        })?;

        Self::from_json(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to load Terraform AST {:?}: {}", path, e))
        })
    }

    /// Parse an AST from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse Terraform AST JSON: {}", e)))
    }

    /// Append the declarations of another file, keeping declaration order
    pub fn merge(&mut self, other: InfraConfig) {
        self.modules.extend(other.modules);
        self.resources.extend(other.resources);
    }

    /// Find a declared resource by Terraform type and label
    pub fn find_resource(&self, resource_type: &str, label: &str) -> Option<&ResourceBlock> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.label() == label)
    }

    /// Find a declared module by label
    pub fn find_module(&self, label: &str) -> Option<&ModuleBlock> {
        self.modules.iter().find(|m| m.label() == label)
    }
}
