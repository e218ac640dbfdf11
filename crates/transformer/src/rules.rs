//! Environment-variable naming conventions
//!
//! Maps Lambda environment-variable keys to the kind of resource they point
//! at. The table is evaluated top to bottom against the upper-cased key; rows
//! are expected to be mutually exclusive, so a key matching more than one
//! row is reported as ambiguous instead of being assigned to either.

use aws_terraform_generator_common::ResourceType;
use std::fmt;

/// How the value of a matched variable becomes a resource value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueResolution {
    /// Use the variable value verbatim
    Literal,
    /// Follow a reference expression, keeping the literal when it does not resolve
    Reference,
}

/// One row of the rule table
pub struct PatternRule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    pub target: ResourceType,
    pub resolution: ValueResolution,
}

impl fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRule")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("resolution", &self.resolution)
            .finish()
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl PatternRule {
    /// Whether an (upper-cased) key satisfies this row
    pub fn matches(&self, key: &str) -> bool {
        (self.matches)(key)
    }
}

/// Outcome of evaluating a key against the whole table
#[derive(Debug, PartialEq)]
pub enum RuleMatch {
    None,
    Single(&'static PatternRule),
    Ambiguous(Vec<&'static PatternRule>),
}

pub static RULES: [PatternRule; 7] = [
    PatternRule {
        name: "google-bigquery",
        matches: |key| key.contains("PROJECT_ID") && key.contains("BQ"),
        target: ResourceType::GoogleBigQuery,
        resolution: ValueResolution::Literal,
    },
    PatternRule {
        name: "database",
        matches: |key| key.contains("DOCDB_HOST"),
        target: ResourceType::Database,
        resolution: ValueResolution::Literal,
    },
    PatternRule {
        name: "kinesis",
        matches: |key| key.ends_with("KINESIS_STREAM_URL"),
        target: ResourceType::Kinesis,
        resolution: ValueResolution::Reference,
    },
    PatternRule {
        name: "restful-api",
        matches: |key| key.ends_with("RESTFUL_API_BASE_URL") || key == "API_BASE_URL",
        target: ResourceType::RestfulApi,
        resolution: ValueResolution::Literal,
    },
    PatternRule {
        name: "s3",
        matches: |key| key.ends_with("S3_BUCKET") || key == "BUCKET_NAME",
        target: ResourceType::S3,
        resolution: ValueResolution::Reference,
    },
    PatternRule {
        name: "sqs",
        matches: |key| key.ends_with("SQS_QUEUE_URL"),
        target: ResourceType::Sqs,
        resolution: ValueResolution::Reference,
    },
    PatternRule {
        name: "sns",
        matches: |key| key.ends_with("SNS_TOPIC_ARN"),
        target: ResourceType::Sns,
        resolution: ValueResolution::Reference,
    },
];

/// Evaluate an environment-variable key against [`RULES`], case-insensitively
///
/// # Examples
/// ```
/// use aws_terraform_generator_transformer::rules::{match_key, RuleMatch};
/// use aws_terraform_generator_common::ResourceType;
///
/// let RuleMatch::Single(rule) = match_key("my_queue_sqs_queue_url") else {
///     panic!("expected a single match");
/// };
/// assert_eq!(rule.target, ResourceType::Sqs);
/// assert_eq!(match_key("LOG_LEVEL"), RuleMatch::None);
/// ```
pub fn match_key(key: &str) -> RuleMatch {
    let key = key.to_uppercase();
    let mut matched: Vec<&'static PatternRule> =
        RULES.iter().filter(|rule| rule.matches(&key)).collect();

    match matched.len() {
        0 => RuleMatch::None,
        1 => RuleMatch::Single(matched.remove(0)),
        _ => RuleMatch::Ambiguous(matched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_of(key: &str) -> Option<ResourceType> {
        match match_key(key) {
            RuleMatch::Single(rule) => Some(rule.target),
            _ => None,
        }
    }

    #[test]
    fn test_bigquery_keys() {
        assert_eq!(
            target_of("GOOGLE_BQ_PROJECT_ID"),
            Some(ResourceType::GoogleBigQuery)
        );
        assert_eq!(target_of("BQ_PROJECT_ID"), Some(ResourceType::GoogleBigQuery));
        assert_eq!(target_of("PROJECT_ID"), None);
    }

    #[test]
    fn test_suffix_and_exact_keys() {
        assert_eq!(target_of("DOCDB_HOST"), Some(ResourceType::Database));
        assert_eq!(
            target_of("MY_STREAM_KINESIS_STREAM_URL"),
            Some(ResourceType::Kinesis)
        );
        assert_eq!(
            target_of("MY_RESTFUL_API_BASE_URL"),
            Some(ResourceType::RestfulApi)
        );
        assert_eq!(target_of("API_BASE_URL"), Some(ResourceType::RestfulApi));
        assert_eq!(target_of("OTHER_API_BASE_URL"), None);
        assert_eq!(target_of("MY_BUCKET_S3_BUCKET"), Some(ResourceType::S3));
        assert_eq!(target_of("BUCKET_NAME"), Some(ResourceType::S3));
        assert_eq!(target_of("SQS_QUEUE_URL"), Some(ResourceType::Sqs));
        assert_eq!(target_of("ALERTS_SNS_TOPIC_ARN"), Some(ResourceType::Sns));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        assert_eq!(target_of("docdb_host"), Some(ResourceType::Database));
        assert_eq!(target_of("Bucket_Name"), Some(ResourceType::S3));
    }

    #[test]
    fn test_ambiguous_key_is_flagged() {
        let RuleMatch::Ambiguous(rules) = match_key("BQ_PROJECT_ID_S3_BUCKET") else {
            panic!("expected an ambiguous match");
        };
        let names: Vec<_> = rules.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["google-bigquery", "s3"]);
    }

    #[test]
    fn test_resolution_strategies() {
        for rule in &RULES {
            let expected = match rule.target {
                ResourceType::GoogleBigQuery | ResourceType::Database | ResourceType::RestfulApi => {
                    ValueResolution::Literal
                }
                _ => ValueResolution::Reference,
            };
            assert_eq!(rule.resolution, expected, "rule {}", rule.name);
        }
    }
}
