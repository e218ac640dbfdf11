//! Resource graph to stack configuration
//!
//! Regroups a flat resource graph (typically read from a diagram) into the
//! nested configuration document consumed by code generation: one stack
//! holding its API gateways, plus the RESTful APIs the lambdas call.

mod apigateway;
mod restful_api;

use aws_terraform_generator_common::{
    ApiGatewayLambda, Config, DiagramSettings, Resource, ResourceCollection, Stack,
};

/// Maps a Lambda reached from an API Gateway route to its configuration entry
#[cfg_attr(test, mockall::automock)]
pub trait LambdaEntryBuilder {
    fn api_gateway_lambda(
        &self,
        route: &Resource,
        lambda: &Resource,
        graph: &ResourceCollection,
    ) -> ApiGatewayLambda;
}

/// Names the entry after the Lambda and splits the route key into verb and path
///
/// `"POST /v1/examples"` becomes verb `POST`, path `/v1/examples`. A route key
/// without a verb (e.g. `$default`) is kept whole as the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLambdaEntryBuilder;

impl LambdaEntryBuilder for DefaultLambdaEntryBuilder {
    fn api_gateway_lambda(
        &self,
        route: &Resource,
        lambda: &Resource,
        _graph: &ResourceCollection,
    ) -> ApiGatewayLambda {
        let (verb, path) = match route.value.trim().split_once(char::is_whitespace) {
            Some((verb, path)) => (verb.to_string(), path.trim().to_string()),
            None => (String::new(), route.value.trim().to_string()),
        };

        ApiGatewayLambda {
            name: lambda.value.clone(),
            verb,
            path,
            ..Default::default()
        }
    }
}

/// Builds a [`Config`] from a resource graph
pub struct ConfigTransformer<'a, B = DefaultLambdaEntryBuilder> {
    graph: &'a ResourceCollection,
    stack_name: String,
    builder: B,
}

impl<'a> ConfigTransformer<'a> {
    pub fn new(graph: &'a ResourceCollection, stack_name: impl Into<String>) -> Self {
        Self::with_builder(graph, stack_name, DefaultLambdaEntryBuilder)
    }
}

impl<'a, B: LambdaEntryBuilder> ConfigTransformer<'a, B> {
    pub fn with_builder(
        graph: &'a ResourceCollection,
        stack_name: impl Into<String>,
        builder: B,
    ) -> Self {
        Self {
            graph,
            stack_name: stack_name.into(),
            builder,
        }
    }

    /// Produce the configuration document for the stack
    ///
    /// Stack lambdas (triggers and crons) are left to the code-generation pass.
    pub fn transform(&self) -> Config {
        let api_gateways = self.build_api_gateways();
        let restful_apis = self.build_restful_apis();

        tracing::debug!(
            stack = %self.stack_name,
            api_gateways = api_gateways.len(),
            restful_apis = restful_apis.len(),
            "config transform complete"
        );

        Config {
            diagram: DiagramSettings {
                stack_name: self.stack_name.clone(),
            },
            stacks: vec![Stack {
                name: self.stack_name.clone(),
                api_gateways,
                lambdas: Vec::new(),
            }],
            restful_apis,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_terraform_generator_common::ResourceType;

    #[test]
    fn test_default_builder_splits_route_key() {
        let route = Resource::new("1", "POST /v1/examples", ResourceType::ApiGateway);
        let lambda = Resource::new("2", "myReceiver", ResourceType::Lambda);

        let entry = DefaultLambdaEntryBuilder.api_gateway_lambda(
            &route,
            &lambda,
            &ResourceCollection::new(),
        );

        assert_eq!(entry.name, "myReceiver");
        assert_eq!(entry.verb, "POST");
        assert_eq!(entry.path, "/v1/examples");
        assert!(entry.envars.is_empty());
    }

    #[test]
    fn test_default_builder_route_without_verb() {
        let route = Resource::new("1", "$default", ResourceType::ApiGateway);
        let lambda = Resource::new("2", "fallback", ResourceType::Lambda);

        let entry = DefaultLambdaEntryBuilder.api_gateway_lambda(
            &route,
            &lambda,
            &ResourceCollection::new(),
        );

        assert_eq!(entry.verb, "");
        assert_eq!(entry.path, "$default");
    }

    #[test]
    fn test_empty_graph_yields_empty_stack() {
        let graph = ResourceCollection::new();
        let config = ConfigTransformer::new(&graph, "mystack").transform();

        assert_eq!(config.diagram.stack_name, "mystack");
        assert_eq!(config.stacks.len(), 1);
        assert!(config.stacks[0].api_gateways.is_empty());
        assert!(config.restful_apis.is_empty());
    }
}
