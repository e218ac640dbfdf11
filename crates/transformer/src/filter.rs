//! Regex allow/deny filtering of resource graphs

use aws_terraform_generator_common::{
    Filters, GeneratorError, Resource, ResourceCollection, Result,
};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Compiled form of one [`aws_terraform_generator_common::Filter`]
#[derive(Debug)]
struct CompiledFilter {
    matches: Vec<Regex>,
    not_match: Vec<Regex>,
}

impl CompiledFilter {
    fn accepts(&self, value: &str) -> bool {
        (self.matches.is_empty() || self.matches.iter().any(|re| re.is_match(value)))
            && !self.not_match.iter().any(|re| re.is_match(value))
    }
}

/// Per resource type filters, ready to evaluate
#[derive(Debug, Default)]
pub struct FilterEngine {
    filters: HashMap<String, CompiledFilter>,
}

impl FilterEngine {
    /// Compile configured filters
    ///
    /// Keys are lower-cased. Any pattern that fails to compile is returned as
    /// [`GeneratorError::InvalidFilter`].
    pub fn new(filters: &Filters) -> Result<Self> {
        let mut compiled = HashMap::with_capacity(filters.len());

        for (resource_type, filter) in filters {
            let key = resource_type.to_lowercase();
            let compile = |patterns: &[String]| -> Result<Vec<Regex>> {
                patterns
                    .iter()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|e| GeneratorError::InvalidFilter {
                            resource_type: key.clone(),
                            pattern: pattern.clone(),
                            message: e.to_string(),
                        })
                    })
                    .collect()
            };

            let entry = CompiledFilter {
                matches: compile(&filter.matches)?,
                not_match: compile(&filter.not_match)?,
            };
            compiled.insert(key, entry);
        }

        Ok(Self { filters: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a resource survives filtering
    ///
    /// A missing resource never passes; a resource whose type has no filter
    /// always does.
    pub fn passes(&self, resource: Option<&Resource>) -> bool {
        let Some(resource) = resource else {
            return false;
        };

        match self.filters.get(&resource.resource_type.filter_key()) {
            Some(filter) => filter.accepts(&resource.value),
            None => true,
        }
    }

    /// Drop failing resources and every relationship touching one of them
    pub fn apply(&self, collection: ResourceCollection) -> ResourceCollection {
        if self.is_empty() {
            return collection;
        }

        let (kept, dropped): (Vec<Resource>, Vec<Resource>) = collection
            .resources
            .into_iter()
            .partition(|r| self.passes(Some(r)));

        for resource in &dropped {
            tracing::debug!(
                id = %resource.id,
                value = %resource.value,
                resource_type = %resource.resource_type,
                "resource filtered out"
            );
        }

        let dropped_ids: HashSet<String> = dropped.into_iter().map(|r| r.id).collect();
        let relationships = collection
            .relationships
            .into_iter()
            .filter(|rel| {
                !dropped_ids.contains(&rel.source.id) && !dropped_ids.contains(&rel.target.id)
            })
            .collect();

        ResourceCollection {
            resources: kept,
            relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_terraform_generator_common::{Filter, Relationship, ResourceType};

    fn filters(key: &str, matches: &[&str], not_match: &[&str]) -> Filters {
        let mut filters = Filters::new();
        filters.insert(
            key.to_string(),
            Filter {
                matches: matches.iter().map(|s| s.to_string()).collect(),
                not_match: not_match.iter().map(|s| s.to_string()).collect(),
            },
        );
        filters
    }

    #[test]
    fn test_match() {
        let engine = FilterEngine::new(&filters("lambda", &["^my"], &[])).unwrap();
        let mine = Resource::new("1", "myLambda", ResourceType::Lambda);
        let other = Resource::new("2", "otherLambda", ResourceType::Lambda);
        assert!(engine.passes(Some(&mine)));
        assert!(!engine.passes(Some(&other)));
    }

    #[test]
    fn test_not_match() {
        let engine = FilterEngine::new(&filters("lambda", &[], &["^my"])).unwrap();
        let mine = Resource::new("1", "myLambda", ResourceType::Lambda);
        assert!(!engine.passes(Some(&mine)));
    }

    #[test]
    fn test_match_and_not_match_combined() {
        let engine = FilterEngine::new(&filters("sqs", &["-queue$"], &["^legacy"])).unwrap();
        assert!(engine.passes(Some(&Resource::new("1", "orders-queue", ResourceType::Sqs))));
        assert!(!engine.passes(Some(&Resource::new("2", "legacy-queue", ResourceType::Sqs))));
        assert!(!engine.passes(Some(&Resource::new("3", "orders", ResourceType::Sqs))));
    }

    #[test]
    fn test_missing_resource_never_passes() {
        let engine = FilterEngine::new(&filters("lambda", &[], &["^my"])).unwrap();
        assert!(!engine.passes(None));
        assert!(!FilterEngine::default().passes(None));
    }

    #[test]
    fn test_unfiltered_type_passes() {
        let engine = FilterEngine::new(&filters("lambda", &["^my"], &[])).unwrap();
        let queue = Resource::new("1", "other-queue", ResourceType::Sqs);
        assert!(engine.passes(Some(&queue)));
        assert!(FilterEngine::default().passes(Some(&queue)));
    }

    #[test]
    fn test_filter_keys_are_case_insensitive() {
        let engine = FilterEngine::new(&filters("RestfulAPI", &["^Internal"], &[])).unwrap();
        let api = Resource::new("1", "PublicApi", ResourceType::RestfulApi);
        assert!(!engine.passes(Some(&api)));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = FilterEngine::new(&filters("lambda", &["("], &[])).unwrap_err();
        match err {
            GeneratorError::InvalidFilter {
                resource_type,
                pattern,
                ..
            } => {
                assert_eq!(resource_type, "lambda");
                assert_eq!(pattern, "(");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_drops_resources_and_their_edges() {
        let lambda = Resource::new("1", "myReceiver", ResourceType::Lambda);
        let queue = Resource::new("2", "legacy-queue", ResourceType::Sqs);
        let bucket = Resource::new("3", "my-bucket", ResourceType::S3);
        let collection = ResourceCollection {
            resources: vec![lambda.clone(), queue.clone(), bucket.clone()],
            relationships: vec![
                Relationship::new(lambda.clone(), queue),
                Relationship::new(lambda.clone(), bucket.clone()),
            ],
        };

        let engine = FilterEngine::new(&filters("sqs", &[], &["^legacy"])).unwrap();
        let filtered = engine.apply(collection);

        assert_eq!(filtered.resources, vec![lambda.clone(), bucket.clone()]);
        assert_eq!(filtered.relationships, vec![Relationship::new(lambda, bucket)]);
    }
}
