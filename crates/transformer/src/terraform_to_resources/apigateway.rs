//! API Gateway v2 routes, integrations and custom domains
//!
//! The three block kinds are tied together by the API id: the label of the
//! `aws_apigatewayv2_api` referenced by `api_id`, which is also the label of
//! the domain name block serving that API.

use super::TerraformTransformer;
use crate::reference::Reference;
use aws_terraform_generator_common::{ResourceBlock, ResourceType};

impl TerraformTransformer<'_> {
    pub(super) fn materialize_route(&mut self, block: &ResourceBlock) {
        let (Some(api_id), Some(route_key)) = (api_id(block), block.attribute("route_key")) else {
            tracing::debug!(label = block.label(), "route without api_id or route_key ignored");
            return;
        };

        let route = self.materialize(ResourceType::ApiGateway, &route_key);
        let routes = self.routes_by_api.entry(api_id).or_default();
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    /// Integrations are not nodes; they only tell which Lambda a route calls
    pub(super) fn record_integration(&mut self, block: &ResourceBlock) {
        let Some(api_id) = api_id(block) else {
            return;
        };
        let Some(lambda_address) = block
            .attribute("integration_uri")
            .and_then(|uri| Reference::find(&uri))
            .map(|reference| reference.address())
        else {
            tracing::debug!(label = block.label(), "integration without lambda reference");
            return;
        };

        self.integrations
            .insert((api_id, block.label().to_string()), lambda_address);
    }

    pub(super) fn materialize_domain_name(&mut self, block: &ResourceBlock) {
        let Some(domain_name) = block.attribute("domain_name") else {
            return;
        };

        let value = self.resolver.resolve(&domain_name);
        let endpoint = self.materialize(ResourceType::Endpoint, &value);
        self.endpoints_by_api.insert(block.label().to_string(), endpoint);
    }

    /// Endpoint → every route of the API it serves
    pub(super) fn connect_domain_name(&mut self, block: &ResourceBlock) {
        let Some(endpoint) = self.endpoints_by_api.get(block.label()).cloned() else {
            return;
        };
        let routes = self
            .routes_by_api
            .get(block.label())
            .cloned()
            .unwrap_or_default();

        for route in &routes {
            self.connect(&endpoint, route);
        }
    }

    /// Route → Lambda behind the integration named by the route target
    pub(super) fn connect_route(&mut self, block: &ResourceBlock) {
        let (Some(api_id), Some(route_key)) = (api_id(block), block.attribute("route_key")) else {
            return;
        };
        let Some(route) = self.existing(ResourceType::ApiGateway, &route_key) else {
            return;
        };

        let integration = block
            .attribute("target")
            .and_then(|target| Reference::find(&target))
            .filter(|reference| reference.block_type == super::AWS_APIGATEWAYV2_INTEGRATION);
        let Some(integration) = integration else {
            tracing::debug!(route = %route.value, "route without integration target");
            return;
        };

        let lambda = self
            .integrations
            .get(&(api_id, integration.label))
            .and_then(|address| self.lambdas_by_address.get(address))
            .cloned();

        match lambda {
            Some(lambda) => self.connect(&route, &lambda),
            None => tracing::debug!(route = %route.value, "route integration has no known lambda"),
        }
    }
}

/// API id of a route or integration: the label of the referenced API, or the
/// literal value when it is not a reference
fn api_id(block: &ResourceBlock) -> Option<String> {
    let value = block.attribute("api_id")?;
    Some(match Reference::find(&value) {
        Some(reference) => reference.label,
        None => value,
    })
}
