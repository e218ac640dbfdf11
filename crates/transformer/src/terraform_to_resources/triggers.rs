//! Streams, queues, schedules and the blocks that wire them to Lambdas

use super::{address_of, TerraformTransformer};
use crate::reference::Reference;
use aws_terraform_generator_common::{ResourceBlock, ResourceType};

impl TerraformTransformer<'_> {
    /// Kinesis stream, SQS queue or SNS topic keyed by one attribute
    pub(super) fn materialize_source(
        &mut self,
        block: &ResourceBlock,
        key_attr: &str,
        resource_type: ResourceType,
    ) {
        let Some(name) = block.attribute(key_attr) else {
            return;
        };

        let resource = self.materialize(resource_type, &name);
        self.sources_by_address.insert(address_of(block), resource);
    }

    /// `aws_cloudwatch_event_rule` with a schedule becomes a Cron node
    pub(super) fn materialize_cron(&mut self, block: &ResourceBlock) {
        let Some(expression) = block.attribute("schedule_expression") else {
            tracing::trace!(label = block.label(), "event rule without schedule ignored");
            return;
        };

        let cron = self.materialize(ResourceType::Cron, &expression);
        self.crons_by_rule.insert(address_of(block), cron);
    }

    /// Source stream/queue triggering a Lambda
    ///
    /// Both ends must already exist: a mapping never introduces a node.
    pub(super) fn connect_event_source_mapping(&mut self, block: &ResourceBlock) {
        let source = block
            .attribute("event_source_arn")
            .and_then(|arn| Reference::find(&arn))
            .and_then(|reference| self.sources_by_address.get(&reference.address()).cloned());

        let lambda = block
            .attribute("function_name")
            .or_else(|| block.attribute("arn"))
            .and_then(|value| self.find_lambda(&value));

        match (source, lambda) {
            (Some(source), Some(lambda)) => self.connect(&source, &lambda),
            _ => tracing::debug!(
                label = block.label(),
                "event source mapping left unconnected"
            ),
        }
    }

    /// Schedule rule invoking a Lambda
    pub(super) fn connect_event_target(&mut self, block: &ResourceBlock) {
        let cron = block
            .attribute("rule")
            .and_then(|rule| Reference::find(&rule))
            .and_then(|reference| self.crons_by_rule.get(&reference.address()).cloned());

        let lambda = block
            .attribute("arn")
            .or_else(|| block.attribute("function_name"))
            .and_then(|value| self.find_lambda(&value));

        match (cron, lambda) {
            (Some(cron), Some(lambda)) => self.connect(&cron, &lambda),
            _ => tracing::debug!(label = block.label(), "event target left unconnected"),
        }
    }
}
