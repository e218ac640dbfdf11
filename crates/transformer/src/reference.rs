//! Cross-reference resolution
//!
//! Terraform attribute values are often references of the form
//! `<type>.<label>.<attribute>` (or `module.<label>.<output>`) pointing at
//! another declared block. The resolver follows such a reference to the
//! literal value it names, falling back to the original string whenever the
//! target cannot be found.

use aws_terraform_generator_common::InfraConfig;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum number of references followed for one value
const MAX_HOPS: usize = 2;

/// Prefixes of Terraform expressions that are never block references
const OPAQUE_PREFIXES: [&str; 8] = [
    "var", "local", "data", "each", "count", "path", "self", "terraform",
];

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z][a-z0-9_]*)\.([A-Za-z0-9_-]+)\.([A-Za-z0-9_]+)$")
        .expect("reference pattern is valid")
});

static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("interpolation pattern is valid"));

/// A parsed `<type>.<label>.<attribute>` expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Terraform resource type, or `module`
    pub block_type: String,
    pub label: String,
    pub attribute: String,
}

impl Reference {
    /// Parse a value that is, as a whole, a reference
    ///
    /// A single `${...}` wrapper around the expression is accepted.
    ///
    /// # Examples
    /// ```
    /// use aws_terraform_generator_transformer::Reference;
    ///
    /// let r = Reference::parse("aws_kinesis_stream.my_stream.name").unwrap();
    /// assert_eq!(r.address(), "aws_kinesis_stream.my_stream");
    /// assert_eq!(r.attribute, "name");
    ///
    /// assert!(Reference::parse("var.doc_db_host").is_none());
    /// assert!(Reference::parse("my-queue").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let expr = value.trim();
        let expr = expr
            .strip_prefix("${")
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(expr)
            .trim();

        let caps = REFERENCE_RE.captures(expr)?;
        let block_type = &caps[1];
        if OPAQUE_PREFIXES.contains(&block_type) {
            return None;
        }

        Some(Self {
            block_type: block_type.to_string(),
            label: caps[2].to_string(),
            attribute: caps[3].to_string(),
        })
    }

    /// Find a reference anywhere in a value
    ///
    /// Tries the whole value first, then every `${...}` interpolation in
    /// order (e.g. `integrations/${aws_apigatewayv2_integration.x.id}`).
    pub fn find(value: &str) -> Option<Self> {
        Self::parse(value).or_else(|| {
            INTERPOLATION_RE
                .captures_iter(value)
                .find_map(|caps| Self::parse(&caps[1]))
        })
    }

    pub fn is_module(&self) -> bool {
        self.block_type == "module"
    }

    /// Address of the referenced block (`<type>.<label>`)
    pub fn address(&self) -> String {
        format!("{}.{}", self.block_type, self.label)
    }
}

/// Resolves reference expressions against the declared blocks of one AST
pub struct ReferenceResolver<'a> {
    infra: &'a InfraConfig,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(infra: &'a InfraConfig) -> Self {
        Self { infra }
    }

    /// Resolve `value` to the literal it points at
    ///
    /// - Non-references are returned unchanged.
    /// - At most two references are followed.
    /// - A cycle (including self-reference) returns `value` unchanged.
    /// - A dangling reference returns the last value obtained.
    pub fn resolve(&self, value: &str) -> String {
        let mut current = value.to_string();
        let mut visited = HashSet::new();

        for _ in 0..MAX_HOPS {
            let Some(reference) = Reference::parse(&current) else {
                return current;
            };

            if !visited.insert(reference.clone()) {
                tracing::debug!(value, "reference cycle detected");
                return value.to_string();
            }

            match self.lookup(&reference) {
                Some(next) => current = next,
                None => return current,
            }
        }

        if let Some(reference) = Reference::parse(&current) {
            if visited.contains(&reference) {
                tracing::debug!(value, "reference cycle detected");
                return value.to_string();
            }
        }

        current
    }

    /// Value of the attribute a reference names, if the block declares it
    pub fn lookup(&self, reference: &Reference) -> Option<String> {
        if reference.is_module() {
            self.infra
                .find_module(&reference.label)?
                .attribute(&reference.attribute)
        } else {
            self.infra
                .find_resource(&reference.block_type, &reference.label)?
                .attribute(&reference.attribute)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infra() -> InfraConfig {
        InfraConfig::from_json(
            r#"{
                "modules": [{
                    "labels": ["my_receiver_lambda"],
                    "attributes": {"function_name": "myReceiver"}
                }],
                "resources": [
                    {
                        "type": "aws_kinesis_stream",
                        "name": "my_stream",
                        "labels": ["aws_kinesis_stream", "my_stream"],
                        "attributes": {"name": "MyStream"}
                    },
                    {
                        "type": "aws_sqs_queue",
                        "name": "alias",
                        "attributes": {"name": "aws_kinesis_stream.my_stream.name"}
                    },
                    {
                        "type": "aws_sqs_queue",
                        "name": "deep",
                        "attributes": {"name": "aws_sqs_queue.alias.name"}
                    },
                    {
                        "type": "aws_sqs_queue",
                        "name": "self_ref",
                        "attributes": {"name": "aws_sqs_queue.self_ref.name"}
                    },
                    {
                        "type": "aws_sqs_queue",
                        "name": "ping",
                        "attributes": {"name": "aws_sqs_queue.pong.name"}
                    },
                    {
                        "type": "aws_sqs_queue",
                        "name": "pong",
                        "attributes": {"name": "aws_sqs_queue.ping.name"}
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_reference() {
        let r = Reference::parse("aws_lambda_function.example_receiver_lambda.arn").unwrap();
        assert_eq!(r.block_type, "aws_lambda_function");
        assert_eq!(r.label, "example_receiver_lambda");
        assert_eq!(r.attribute, "arn");
        assert!(!r.is_module());

        let m = Reference::parse("module.my_receiving_lambda.function_arn").unwrap();
        assert!(m.is_module());
        assert_eq!(m.address(), "module.my_receiving_lambda");
    }

    #[test]
    fn test_literals_are_not_references() {
        assert!(Reference::parse("var.client-var.environment-my-bucket").is_none());
        assert!(Reference::parse("local.api_domain").is_none());
        assert!(Reference::parse("POST /v1/examples").is_none());
        assert!(Reference::parse("cron(0 3 * * ? *)").is_none());
        assert!(Reference::parse("").is_none());
    }

    #[test]
    fn test_find_embedded_reference() {
        let r = Reference::find("integrations/${aws_apigatewayv2_integration.my_receiver.id}")
            .unwrap();
        assert_eq!(r.address(), "aws_apigatewayv2_integration.my_receiver");
        assert_eq!(
            Reference::parse("${aws_sqs_queue.q.arn}").unwrap().label,
            "q"
        );
    }

    #[test]
    fn test_resolve_literal_unchanged() {
        let infra = infra();
        let resolver = ReferenceResolver::new(&infra);
        assert_eq!(resolver.resolve("my-bucket"), "my-bucket");
        assert_eq!(resolver.resolve("var.doc_db_host"), "var.doc_db_host");
    }

    #[test]
    fn test_resolve_resource_and_module() {
        let infra = infra();
        let resolver = ReferenceResolver::new(&infra);
        assert_eq!(
            resolver.resolve("aws_kinesis_stream.my_stream.name"),
            "MyStream"
        );
        assert_eq!(
            resolver.resolve("module.my_receiver_lambda.function_name"),
            "myReceiver"
        );
    }

    #[test]
    fn test_resolve_follows_one_further_reference() {
        let infra = infra();
        let resolver = ReferenceResolver::new(&infra);
        assert_eq!(resolver.resolve("aws_sqs_queue.alias.name"), "MyStream");
        // Third hop is not followed
        assert_eq!(
            resolver.resolve("aws_sqs_queue.deep.name"),
            "aws_kinesis_stream.my_stream.name"
        );
    }

    #[test]
    fn test_resolve_dangling_reference() {
        let infra = infra();
        let resolver = ReferenceResolver::new(&infra);
        assert_eq!(
            resolver.resolve("aws_kinesis_stream.missing.name"),
            "aws_kinesis_stream.missing.name"
        );
        assert_eq!(
            resolver.resolve("aws_kinesis_stream.my_stream.arn"),
            "aws_kinesis_stream.my_stream.arn"
        );
    }

    #[test]
    fn test_resolve_cycles_return_original() {
        let infra = infra();
        let resolver = ReferenceResolver::new(&infra);
        assert_eq!(
            resolver.resolve("aws_sqs_queue.self_ref.name"),
            "aws_sqs_queue.self_ref.name"
        );
        assert_eq!(
            resolver.resolve("aws_sqs_queue.ping.name"),
            "aws_sqs_queue.ping.name"
        );
    }
}
