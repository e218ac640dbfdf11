//! Transforms between Terraform ASTs, resource graphs and stack configuration
//!
//! - [`TerraformTransformer`]: declared modules/resources → typed resource graph
//! - [`ConfigTransformer`]: resource graph → configuration document
//! - [`FilterEngine`]: regex allow/deny lists applied per resource type
//!
//! Environment-variable naming conventions live in [`rules`], reference
//! following in [`ReferenceResolver`].

mod filter;
mod reference;
mod resources_to_config;
pub mod rules;
mod terraform_to_resources;

pub use filter::FilterEngine;
pub use reference::{Reference, ReferenceResolver};
pub use resources_to_config::{ConfigTransformer, DefaultLambdaEntryBuilder, LambdaEntryBuilder};
pub use terraform_to_resources::TerraformTransformer;
