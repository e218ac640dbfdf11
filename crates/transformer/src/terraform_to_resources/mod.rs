//! Terraform AST to resource graph
//!
//! Walks the declared modules and resources of one [`InfraConfig`] and infers
//! typed resource nodes and the relationships between them.
//!
//! ## Strategy
//! The transform runs in two passes over the same block order (modules, then
//! resources, each in declaration order):
//! 1. **Materialize**: every recognized block creates (or reuses) its node,
//!    Lambda environment variables are matched against the rule table, and
//!    block addresses are indexed.
//! 2. **Connect**: blocks that only link other blocks (routes to
//!    integrations, domain names to routes, event source mappings, event
//!    targets) are resolved against the indices.
//!
//! Ids are assigned during the first pass only, so the second pass never
//! introduces a node and edges do not depend on declaration order.
//!
//! ## Usage
//! ```rust
//! use aws_terraform_generator_common::{Config, InfraConfig};
//! use aws_terraform_generator_transformer::TerraformTransformer;
//!
//! let infra = InfraConfig::from_json(r#"{
//!     "resources": [{
//!         "type": "aws_sqs_queue",
//!         "name": "my_sqs",
//!         "attributes": {"name": "my-queue"}
//!     }]
//! }"#).unwrap();
//! let config = Config::default();
//!
//! let graph = TerraformTransformer::new(&config, &infra).transform().unwrap();
//! assert_eq!(graph.resources[0].value, "my-queue");
//! ```

mod apigateway;
mod lambda;
mod triggers;

use crate::filter::FilterEngine;
use crate::reference::ReferenceResolver;
use aws_terraform_generator_common::{
    Config, InfraConfig, Relationship, Resource, ResourceBlock, ResourceCollection,
    ResourceType, Result,
};
use std::collections::{HashMap, HashSet};

const AWS_LAMBDA_FUNCTION: &str = "aws_lambda_function";
const AWS_LAMBDA_EVENT_SOURCE_MAPPING: &str = "aws_lambda_event_source_mapping";
const AWS_KINESIS_STREAM: &str = "aws_kinesis_stream";
const AWS_S3_BUCKET: &str = "aws_s3_bucket";
const AWS_SQS_QUEUE: &str = "aws_sqs_queue";
const AWS_SNS_TOPIC: &str = "aws_sns_topic";
const AWS_CLOUDWATCH_EVENT_RULE: &str = "aws_cloudwatch_event_rule";
const AWS_CLOUDWATCH_EVENT_TARGET: &str = "aws_cloudwatch_event_target";
const AWS_APIGATEWAYV2_ROUTE: &str = "aws_apigatewayv2_route";
const AWS_APIGATEWAYV2_INTEGRATION: &str = "aws_apigatewayv2_integration";
const AWS_APIGATEWAYV2_DOMAIN_NAME: &str = "aws_apigatewayv2_domain_name";

/// Builds a [`ResourceCollection`] from one Terraform AST
///
/// A transformer holds the state of a single run and is consumed by
/// [`TerraformTransformer::transform`]; build a new one per AST.
pub struct TerraformTransformer<'a> {
    config: &'a Config,
    infra: &'a InfraConfig,
    resolver: ReferenceResolver<'a>,

    collection: ResourceCollection,
    /// Position in `collection.resources` by dedup identity
    nodes: HashMap<(ResourceType, String), usize>,
    /// Emitted edges as (source id, target id)
    edges: HashSet<(String, String)>,
    last_id: usize,

    /// Lambda nodes by block address (`aws_lambda_function.<label>`, `module.<label>`)
    lambdas_by_address: HashMap<String, Resource>,
    /// Kinesis/SQS/SNS nodes by block address
    sources_by_address: HashMap<String, Resource>,
    /// Cron nodes by `aws_cloudwatch_event_rule.<label>`
    crons_by_rule: HashMap<String, Resource>,
    /// APIGateway route nodes by API id, in discovery order
    routes_by_api: HashMap<String, Vec<Resource>>,
    /// Endpoint node by API id
    endpoints_by_api: HashMap<String, Resource>,
    /// Lambda address by (API id, integration label)
    integrations: HashMap<(String, String), String>,
}

impl<'a> TerraformTransformer<'a> {
    pub fn new(config: &'a Config, infra: &'a InfraConfig) -> Self {
        Self {
            config,
            infra,
            resolver: ReferenceResolver::new(infra),
            collection: ResourceCollection::new(),
            nodes: HashMap::new(),
            edges: HashSet::new(),
            last_id: 0,
            lambdas_by_address: HashMap::new(),
            sources_by_address: HashMap::new(),
            crons_by_rule: HashMap::new(),
            routes_by_api: HashMap::new(),
            endpoints_by_api: HashMap::new(),
            integrations: HashMap::new(),
        }
    }

    /// Run the transform and apply the configured filters
    ///
    /// Fails only when a filter pattern does not compile.
    pub fn transform(self) -> Result<ResourceCollection> {
        let filters = FilterEngine::new(&self.config.filters)?;
        let collection = self.build();
        Ok(filters.apply(collection))
    }

    /// Run the transform without filtering
    pub fn build(mut self) -> ResourceCollection {
        let infra = self.infra;

        for module in &infra.modules {
            self.materialize_module(module);
        }
        for resource in &infra.resources {
            self.materialize_resource(resource);
        }
        for resource in &infra.resources {
            self.connect_resource(resource);
        }

        tracing::debug!(
            resources = self.collection.resources.len(),
            relationships = self.collection.relationships.len(),
            "terraform transform complete"
        );

        self.collection
    }

    fn materialize_resource(&mut self, block: &ResourceBlock) {
        match block.resource_type.as_str() {
            AWS_LAMBDA_FUNCTION => self.materialize_lambda_resource(block),
            AWS_KINESIS_STREAM => {
                self.materialize_source(block, "name", ResourceType::Kinesis)
            }
            AWS_S3_BUCKET => {
                if let Some(bucket) = block.attribute("bucket") {
                    self.materialize(ResourceType::S3, &bucket);
                }
            }
            AWS_SQS_QUEUE => self.materialize_source(block, "name", ResourceType::Sqs),
            AWS_SNS_TOPIC => self.materialize_source(block, "name", ResourceType::Sns),
            AWS_CLOUDWATCH_EVENT_RULE => self.materialize_cron(block),
            AWS_APIGATEWAYV2_ROUTE => self.materialize_route(block),
            AWS_APIGATEWAYV2_INTEGRATION => self.record_integration(block),
            AWS_APIGATEWAYV2_DOMAIN_NAME => self.materialize_domain_name(block),
            other => {
                tracing::trace!(block_type = other, label = block.label(), "block ignored");
            }
        }
    }

    fn connect_resource(&mut self, block: &ResourceBlock) {
        match block.resource_type.as_str() {
            AWS_LAMBDA_EVENT_SOURCE_MAPPING => self.connect_event_source_mapping(block),
            AWS_CLOUDWATCH_EVENT_TARGET => self.connect_event_target(block),
            AWS_APIGATEWAYV2_ROUTE => self.connect_route(block),
            AWS_APIGATEWAYV2_DOMAIN_NAME => self.connect_domain_name(block),
            _ => {}
        }
    }

    /// Existing node with this identity, or a new one with the next id
    fn materialize(&mut self, resource_type: ResourceType, value: &str) -> Resource {
        if let Some(&index) = self.nodes.get(&(resource_type, value.to_string())) {
            return self.collection.resources[index].clone();
        }

        self.last_id += 1;
        let resource = Resource::new(self.last_id.to_string(), value, resource_type);
        tracing::debug!(
            id = %resource.id,
            value,
            resource_type = %resource_type,
            "resource materialized"
        );

        self.nodes.insert(
            (resource_type, value.to_string()),
            self.collection.resources.len(),
        );
        self.collection.resources.push(resource.clone());
        resource
    }

    fn existing(&self, resource_type: ResourceType, value: &str) -> Option<Resource> {
        self.nodes
            .get(&(resource_type, value.to_string()))
            .map(|&index| self.collection.resources[index].clone())
    }

    /// Append an edge unless the same edge was already emitted this run
    fn connect(&mut self, source: &Resource, target: &Resource) {
        if self.edges.insert((source.id.clone(), target.id.clone())) {
            tracing::debug!(
                source = %source.value,
                target = %target.value,
                "relationship detected"
            );
            self.collection
                .relationships
                .push(Relationship::new(source.clone(), target.clone()));
        }
    }
}

/// `<type>.<label>` address of a declared resource
fn address_of(block: &ResourceBlock) -> String {
    format!("{}.{}", block.resource_type, block.label())
}
