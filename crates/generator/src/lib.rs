//! Diagram and configuration output
//!
//! This crate renders resource graphs to Graphviz DOT files and writes
//! configuration documents produced by the reverse transform.

mod templates;

use aws_terraform_generator_common::{
    Config, DrawSettings, GeneratorError, ResourceCollection, ResourceType, Result,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;

/// File name of the rendered diagram inside the output directory
pub const DIAGRAM_FILE_NAME: &str = "diagram.dot";

const DEFAULT_ORIENTATION: &str = "LR";
const ORIENTATIONS: [&str; 4] = ["LR", "RL", "TB", "BT"];

/// Icon shown for each resource type unless overridden in the draw settings
pub fn default_images() -> BTreeMap<ResourceType, String> {
    [
        (ResourceType::ApiGateway, "assets/diagram/api_gateway.svg"),
        (ResourceType::Cron, "assets/diagram/cron.svg"),
        (ResourceType::Database, "assets/diagram/database_dynamo_db.svg"),
        (ResourceType::Endpoint, "assets/diagram/endpoint.svg"),
        (ResourceType::GoogleBigQuery, "assets/diagram/google_bigquery.svg"),
        (ResourceType::Kinesis, "assets/diagram/kinesis_data_stream.svg"),
        (ResourceType::Lambda, "assets/diagram/lambda.svg"),
        (ResourceType::RestfulApi, "assets/diagram/restful_api.svg"),
        (ResourceType::S3, "assets/diagram/s3_bucket.svg"),
        (ResourceType::Sns, "assets/diagram/sns.svg"),
        (ResourceType::Sqs, "assets/diagram/sqs.svg"),
        (ResourceType::Unknown, ""),
    ]
    .into_iter()
    .map(|(resource_type, image)| (resource_type, image.to_string()))
    .collect()
}

#[derive(Debug, Serialize)]
struct DotNode<'a> {
    id: &'a str,
    label: &'a str,
    image: &'a str,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct DotEdge<'a> {
    source: &'a str,
    target: &'a str,
}

/// Diagram generator
///
/// Renders one [`ResourceCollection`] as a DOT digraph: one node statement per
/// resource (labelled with its value, drawn with its type icon) and one edge
/// statement per relationship.
pub struct DiagramGenerator {
    name: String,
    orientation: String,
    images: BTreeMap<ResourceType, String>,
    tera: Tera,
}

impl DiagramGenerator {
    /// Create a generator from the draw settings of a configuration document
    pub fn new(name: impl Into<String>, settings: &DrawSettings) -> Result<Self> {
        let orientation = settings
            .orientation
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(DEFAULT_ORIENTATION)
            .to_uppercase();
        if !ORIENTATIONS.contains(&orientation.as_str()) {
            return Err(GeneratorError::Generation(format!(
                "Unsupported diagram orientation '{}', expected one of {}",
                orientation,
                ORIENTATIONS.join(", ")
            )));
        }

        let mut images = default_images();
        for (key, image) in &settings.images {
            let resource_type = ResourceType::parse(key);
            if resource_type == ResourceType::Unknown && !key.eq_ignore_ascii_case("unknown") {
                tracing::warn!(key = %key, "image override for unknown resource type");
            }
            images.insert(resource_type, image.clone());
        }

        let tera = templates::load_templates()?;
        Ok(Self {
            name: name.into(),
            orientation,
            images,
            tera,
        })
    }

    pub fn image_for(&self, resource_type: ResourceType) -> &str {
        self.images
            .get(&resource_type)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Render the graph as DOT text
    pub fn render(&self, collection: &ResourceCollection) -> Result<String> {
        let context = self.create_context(collection);
        self.tera
            .render("diagram.dot", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))
    }

    /// Write `diagram.dot` into `output_dir`, creating the directory if needed
    pub fn generate_to_directory(
        &self,
        collection: &ResourceCollection,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let rendered = self.render(collection)?;
        let output_path = output_dir.join(DIAGRAM_FILE_NAME);
        fs::write(&output_path, rendered).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", DIAGRAM_FILE_NAME, e))
        })?;

        tracing::debug!(path = %output_path.display(), "diagram written");
        Ok(output_path)
    }

    fn create_context(&self, collection: &ResourceCollection) -> tera::Context {
        let nodes: Vec<DotNode> = collection
            .resources
            .iter()
            .map(|r| DotNode {
                id: &r.id,
                label: &r.value,
                image: self.image_for(r.resource_type),
                kind: r.resource_type.as_str(),
            })
            .collect();

        let edges: Vec<DotEdge> = collection
            .relationships
            .iter()
            .map(|rel| DotEdge {
                source: &rel.source.id,
                target: &rel.target.id,
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("name", &self.name);
        context.insert("orientation", &self.orientation);
        context.insert("nodes", &nodes);
        context.insert("edges", &edges);
        context
    }
}

/// Render a graph with the draw settings of `config` into `output_dir`
pub fn generate_diagram(
    config: &Config,
    collection: &ResourceCollection,
    output_dir: &Path,
) -> Result<PathBuf> {
    let name = match config.stack_name() {
        "" => "diagram",
        name => name,
    };
    let generator = DiagramGenerator::new(name, &config.draw)?;
    generator.generate_to_directory(collection, output_dir)
}

/// Write a configuration document as YAML, creating parent directories
pub fn write_config(config: &Config, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;
    }

    let yaml = config.to_yaml()?;
    fs::write(output_path, yaml).map_err(|e| {
        GeneratorError::Generation(format!("Failed to write {:?}: {}", output_path, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_terraform_generator_common::{Relationship, Resource};

    fn sample() -> ResourceCollection {
        let lambda = Resource::new("1", "myReceiver", ResourceType::Lambda);
        let queue = Resource::new("2", "my-queue", ResourceType::Sqs);
        ResourceCollection {
            resources: vec![lambda.clone(), queue.clone()],
            relationships: vec![Relationship::new(lambda, queue)],
        }
    }

    #[test]
    fn test_generator_creation() {
        let generator = DiagramGenerator::new("mystack", &DrawSettings::default()).unwrap();
        assert_eq!(generator.orientation, "LR");
        assert_eq!(
            generator.image_for(ResourceType::Lambda),
            "assets/diagram/lambda.svg"
        );
        assert_eq!(generator.image_for(ResourceType::Unknown), "");
    }

    #[test]
    fn test_image_overrides_and_orientation() {
        let settings = DrawSettings {
            orientation: Some("tb".to_string()),
            images: [("SQS".to_string(), "icons/queue.png".to_string())]
                .into_iter()
                .collect(),
        };

        let generator = DiagramGenerator::new("mystack", &settings).unwrap();
        assert_eq!(generator.orientation, "TB");
        assert_eq!(generator.image_for(ResourceType::Sqs), "icons/queue.png");
        assert_eq!(
            generator.image_for(ResourceType::Kinesis),
            "assets/diagram/kinesis_data_stream.svg"
        );
    }

    #[test]
    fn test_invalid_orientation() {
        let settings = DrawSettings {
            orientation: Some("diagonal".to_string()),
            ..Default::default()
        };

        let result = DiagramGenerator::new("mystack", &settings);
        assert!(matches!(result, Err(GeneratorError::Generation(_))));
    }

    #[test]
    fn test_render_nodes_and_edges() {
        let generator = DiagramGenerator::new("mystack", &DrawSettings::default()).unwrap();
        let dot = generator.render(&sample()).unwrap();

        assert!(dot.starts_with("digraph \"mystack\" {"));
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains(
            r#""1" [label="myReceiver", image="assets/diagram/lambda.svg", tooltip="Lambda"];"#
        ));
        assert!(dot.contains(r#""2" [label="my-queue", image="assets/diagram/sqs.svg", tooltip="SQS"];"#));
        assert!(dot.contains(r#""1" -> "2";"#));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_empty_graph() {
        let generator = DiagramGenerator::new("mystack", &DrawSettings::default()).unwrap();
        let dot = generator.render(&ResourceCollection::new()).unwrap();

        assert!(!dot.contains("->"));
        assert!(!dot.contains("label="));
    }
}
