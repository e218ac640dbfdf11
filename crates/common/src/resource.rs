//! Resource graph vocabulary
//!
//! Typed nodes ([`Resource`]), directed edges ([`Relationship`]) and the
//! [`ResourceCollection`] produced by a transform run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of AWS constructs a graph node can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ResourceType {
    ApiGateway,
    Cron,
    Database,
    Endpoint,
    GoogleBigQuery,
    Kinesis,
    Lambda,
    RestfulApi,
    S3,
    Sns,
    Sqs,
    Unknown,
}

impl ResourceType {
    /// Every member of the enumeration, in canonical order
    pub const ALL: [ResourceType; 12] = [
        ResourceType::ApiGateway,
        ResourceType::Cron,
        ResourceType::Database,
        ResourceType::Endpoint,
        ResourceType::GoogleBigQuery,
        ResourceType::Kinesis,
        ResourceType::Lambda,
        ResourceType::RestfulApi,
        ResourceType::S3,
        ResourceType::Sns,
        ResourceType::Sqs,
        ResourceType::Unknown,
    ];

    /// Canonical name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::ApiGateway => "APIGateway",
            ResourceType::Cron => "Cron",
            ResourceType::Database => "Database",
            ResourceType::Endpoint => "Endpoint",
            ResourceType::GoogleBigQuery => "GoogleBigQuery",
            ResourceType::Kinesis => "Kinesis",
            ResourceType::Lambda => "Lambda",
            ResourceType::RestfulApi => "RestfulAPI",
            ResourceType::S3 => "S3",
            ResourceType::Sns => "SNS",
            ResourceType::Sqs => "SQS",
            ResourceType::Unknown => "Unknown",
        }
    }

    /// Parse a type name, case-insensitively
    ///
    /// Never fails: unrecognized names map to [`ResourceType::Unknown`].
    ///
    /// # Examples
    /// ```
    /// use aws_terraform_generator_common::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("SQS"), ResourceType::Sqs);
    /// assert_eq!(ResourceType::parse("lambda"), ResourceType::Lambda);
    /// assert_eq!(ResourceType::parse("dynamo"), ResourceType::Unknown);
    /// ```
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(ResourceType::Unknown)
    }

    /// Lower-case name used to key filters and icon overrides
    pub fn filter_key(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        ResourceType::parse(&value)
    }
}

/// A node in the resource graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Sequential identifier assigned during a transform run
    pub id: String,
    /// Canonical display name (queue name, function name, route key, ...)
    pub value: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        value: impl Into<String>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            resource_type,
        }
    }
}

/// A directed edge between two resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: Resource,
    pub target: Resource,
}

impl Relationship {
    pub fn new(source: Resource, target: Resource) -> Self {
        Self { source, target }
    }
}

/// Output unit of a transform: nodes in discovery order, edges in detection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCollection {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a serialized graph from a JSON string
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::GeneratorError::Parse(format!("Failed to parse resource graph JSON: {}", e))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources of one type, in collection order
    pub fn of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == resource_type)
    }

    /// Targets of edges leaving `resource`, in edge order
    pub fn outbound<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Resource> {
        self.relationships
            .iter()
            .filter(move |rel| rel.source.id == resource.id)
            .map(|rel| &rel.target)
    }

    /// Sources of edges entering `resource`, in edge order
    pub fn inbound<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Resource> {
        self.relationships
            .iter()
            .filter(move |rel| rel.target.id == resource.id)
            .map(|rel| &rel.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_round_trip() {
        for t in ResourceType::ALL {
            assert_eq!(ResourceType::parse(&t.to_string()), t);
        }
    }

    #[test]
    fn test_unknown_type_name() {
        assert_eq!(ResourceType::parse(""), ResourceType::Unknown);
        assert_eq!(ResourceType::parse("DynamoDB"), ResourceType::Unknown);
    }

    #[test]
    fn test_filter_key() {
        assert_eq!(ResourceType::Lambda.filter_key(), "lambda");
        assert_eq!(ResourceType::RestfulApi.filter_key(), "restfulapi");
        assert_eq!(ResourceType::parse("restfulapi"), ResourceType::RestfulApi);
    }

    #[test]
    fn test_empty_collection_serializes_with_empty_lists() {
        let json = serde_json::to_value(ResourceCollection::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "resources": [], "relationships": [] })
        );
    }

    #[test]
    fn test_graph_json_uses_type_names() {
        let graph = ResourceCollection::from_json(
            r#"{
                "resources": [
                    {"id": "1", "value": "api.example.com", "type": "Endpoint"},
                    {"id": "2", "value": "GET /health", "type": "APIGateway"}
                ],
                "relationships": [
                    {
                        "source": {"id": "1", "value": "api.example.com", "type": "Endpoint"},
                        "target": {"id": "2", "value": "GET /health", "type": "APIGateway"}
                    }
                ]
            }"#,
        )
        .unwrap();

        let apig = &graph.resources[1];
        assert_eq!(apig.resource_type, ResourceType::ApiGateway);
        let sources: Vec<_> = graph.inbound(apig).map(|r| r.value.as_str()).collect();
        assert_eq!(sources, vec!["api.example.com"]);
        assert_eq!(graph.of_type(ResourceType::Endpoint).count(), 1);
    }
}
