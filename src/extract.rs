//! Registry to schema transform.
//!
//! [`extract`] is a single pass over the registry: every module name maps to
//! its descriptor's `types` value, in registry order. The only decision made
//! here is how to treat a descriptor that has no `types` field, which is
//! governed by [`MissingTypesPolicy`].

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{ExtractedSchema, MissingTypesPolicy, ModuleRegistry};

/// Errors that can occur while building the schema.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// A module has no `types` field and the policy forbids that
    #[error("Module '{module}' has no `types` field")]
    MissingTypes { module: String },
}

/// Result of a successful extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Module name to `types` value
    pub schema: ExtractedSchema,

    /// Modules whose descriptor had no `types` field, in registry order
    pub missing_types: Vec<String>,
}

/// Builds the extracted schema from `registry`.
///
/// `visit` is called with each module name as it is enumerated, before the
/// policy is applied, so callers can report progress for every module.
///
/// # Errors
///
/// Returns [`ExtractError::MissingTypes`] for the first module without a
/// `types` field when `policy` is [`MissingTypesPolicy::Error`].
pub fn extract_with<F>(
    registry: &ModuleRegistry,
    policy: MissingTypesPolicy,
    mut visit: F,
) -> Result<Extraction, ExtractError>
where
    F: FnMut(&str),
{
    let mut extraction = Extraction::default();

    for (module, descriptor) in registry.iter() {
        visit(module);

        match descriptor.types() {
            Some(types) => {
                debug!(module, "Extracted types");
                extraction.schema.insert(module, types.clone());
            }
            None => {
                warn!(module, policy = ?policy, "Module has no `types` field");
                extraction.missing_types.push(module.to_string());

                match policy {
                    MissingTypesPolicy::Null => extraction.schema.insert(module, Value::Null),
                    MissingTypesPolicy::Omit => {}
                    MissingTypesPolicy::Error => {
                        return Err(ExtractError::MissingTypes {
                            module: module.to_string(),
                        })
                    }
                }
            }
        }
    }

    Ok(extraction)
}

/// [`extract_with`] without a progress callback.
pub fn extract(
    registry: &ModuleRegistry,
    policy: MissingTypesPolicy,
) -> Result<Extraction, ExtractError> {
    extract_with(registry, policy, |_| {})
}
