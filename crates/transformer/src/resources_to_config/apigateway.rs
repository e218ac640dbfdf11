use super::{ConfigTransformer, LambdaEntryBuilder};
use aws_terraform_generator_common::{ApiGateway, ResourceType};
use std::collections::HashSet;

impl<B: LambdaEntryBuilder> ConfigTransformer<'_, B> {
    /// One entry per APIGateway node, in graph order
    pub(super) fn build_api_gateways(&self) -> Vec<ApiGateway> {
        self.graph
            .of_type(ResourceType::ApiGateway)
            .map(|route| {
                let api_domain = self
                    .graph
                    .inbound(route)
                    .find(|source| source.resource_type == ResourceType::Endpoint)
                    .map(|endpoint| endpoint.value.clone())
                    .unwrap_or_default();

                let mut seen = HashSet::new();
                let lambdas = self
                    .graph
                    .outbound(route)
                    .filter(|target| target.resource_type == ResourceType::Lambda)
                    .filter(|lambda| seen.insert(lambda.id.as_str()))
                    .map(|lambda| self.builder.api_gateway_lambda(route, lambda, self.graph))
                    .collect();

                ApiGateway {
                    stack_name: self.stack_name.clone(),
                    api_domain,
                    apig: true,
                    lambdas,
                }
            })
            .collect()
    }
}
