use super::{ConfigTransformer, LambdaEntryBuilder};
use aws_terraform_generator_common::{ResourceType, RestfulApi};
use std::collections::HashSet;

impl<B: LambdaEntryBuilder> ConfigTransformer<'_, B> {
    /// Distinct RestfulAPI names, first-seen order
    pub(super) fn build_restful_apis(&self) -> Vec<RestfulApi> {
        let mut seen = HashSet::new();
        self.graph
            .of_type(ResourceType::RestfulApi)
            .filter(|api| seen.insert(api.value.as_str()))
            .map(|api| RestfulApi {
                name: api.value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_terraform_generator_common::{Resource, ResourceCollection};

    #[test]
    fn test_restful_apis_deduplicated_in_order() {
        let graph = ResourceCollection {
            resources: vec![
                Resource::new("1", "Orders", ResourceType::RestfulApi),
                Resource::new("2", "myLambda", ResourceType::Lambda),
                Resource::new("3", "Billing", ResourceType::RestfulApi),
                Resource::new("4", "Orders", ResourceType::RestfulApi),
            ],
            relationships: vec![],
        };

        let apis = ConfigTransformer::new(&graph, "mystack").build_restful_apis();
        let names: Vec<_> = apis.iter().map(|api| api.name.as_str()).collect();

        assert_eq!(names, vec!["Orders", "Billing"]);
    }
}
