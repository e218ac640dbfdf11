//! Lambda blocks and environment-variable inference

use super::{address_of, TerraformTransformer};
use crate::reference::Reference;
use crate::rules::{match_key, RuleMatch, ValueResolution};
use aws_terraform_generator_common::{ModuleBlock, Resource, ResourceBlock, ResourceType};
use std::collections::BTreeMap;

/// Module attributes that mark a module as a Lambda
const MODULE_FUNCTION_NAME_ATTRS: [&str; 2] = ["function_name", "lambda_function_name"];

impl TerraformTransformer<'_> {
    pub(super) fn materialize_lambda_resource(&mut self, block: &ResourceBlock) {
        let Some(function_name) = block.attribute("function_name") else {
            tracing::debug!(label = block.label(), "lambda without function_name ignored");
            return;
        };

        let lambda = self.register_lambda(address_of(block), &function_name);
        self.infer_from_environment(&lambda, block.environment_variables());
    }

    /// Modules are only recognized as Lambdas by their attribute shape
    pub(super) fn materialize_module(&mut self, module: &ModuleBlock) {
        let Some(function_name) = MODULE_FUNCTION_NAME_ATTRS
            .iter()
            .find_map(|attr| module.attribute(attr))
        else {
            tracing::trace!(label = module.label(), "module ignored");
            return;
        };

        let lambda = self.register_lambda(format!("module.{}", module.label()), &function_name);
        self.infer_from_environment(&lambda, module.environment_variables());
    }

    fn register_lambda(&mut self, address: String, function_name: &str) -> Resource {
        let value = self.resolver.resolve(function_name);
        let lambda = self.materialize(ResourceType::Lambda, &value);
        self.lambdas_by_address.insert(address, lambda.clone());
        lambda
    }

    /// Apply the rule table to every environment variable of a Lambda
    fn infer_from_environment(&mut self, lambda: &Resource, variables: BTreeMap<String, String>) {
        for (key, value) in variables {
            let rule = match match_key(&key) {
                RuleMatch::None => continue,
                RuleMatch::Single(rule) => rule,
                RuleMatch::Ambiguous(rules) => {
                    let candidates: Vec<_> = rules.iter().map(|r| r.name).collect();
                    tracing::warn!(
                        lambda = %lambda.value,
                        key = %key,
                        ?candidates,
                        "environment variable matches several resource kinds, skipped"
                    );
                    continue;
                }
            };

            let target_value = match rule.resolution {
                ValueResolution::Literal => value,
                ValueResolution::Reference => self.resolver.resolve(&value),
            };
            if target_value.is_empty() {
                continue;
            }

            let target = self.materialize(rule.target, &target_value);
            self.connect(lambda, &target);
        }
    }

    /// Lambda node named by a block attribute, never creating one
    ///
    /// The value may be a reference to a Lambda resource or module, or a
    /// literal function name.
    pub(super) fn find_lambda(&self, value: &str) -> Option<Resource> {
        match Reference::find(value) {
            Some(reference) => self.lambdas_by_address.get(&reference.address()).cloned(),
            None => self.existing(ResourceType::Lambda, &self.resolver.resolve(value)),
        }
    }
}
