//! Common types and utilities for the AWS Terraform Generator
//!
//! This crate contains the resource graph vocabulary, the Terraform AST handed
//! over by the HCL parser, the stack configuration document, and the error
//! type shared by the transformer, generator, and CLI components.

pub mod config;
pub mod resource;
pub mod terraform;

pub use config::{
    ApiGateway, ApiGatewayLambda, Config, Cron, DiagramSettings, DrawSettings, Filter, Filters,
    Lambda, RestfulApi, Stack, Trigger,
};
pub use resource::{Relationship, Resource, ResourceCollection, ResourceType};
pub use terraform::{AttributeValue, Attributes, InfraConfig, ModuleBlock, ResourceBlock};

use thiserror::Error;

/// Errors that can occur while loading, transforming, or generating
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Invalid {resource_type} filter pattern '{pattern}': {message}")]
    InvalidFilter {
        resource_type: String,
        pattern: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
