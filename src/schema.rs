//! JSON Schema contracts for tool input and output.

use crate::{Error, ErrorContext, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::json;

/// JSON Schema of `T`, as generated by `schemars`.
pub fn json_schema_for<T: schemars::JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

/// A compiled Draft 7 schema that checks instances before any side effect.
pub struct SchemaValidator {
    schema: JSONSchema,
    raw: serde_json::Value,
}

impl SchemaValidator {
    pub fn new(schema: serde_json::Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Failed to compile schema: {}", e),
                    ErrorContext::new().with_source("schema_validator"),
                )
            })?;
        Ok(Self {
            schema: compiled,
            raw: schema,
        })
    }

    pub fn for_type<T: schemars::JsonSchema>() -> Result<Self> {
        Self::new(json_schema_for::<T>())
    }

    pub fn schema(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Reject `instance` with every violation listed, first offending path in the context.
    pub fn validate(&self, instance: &serde_json::Value) -> Result<()> {
        if let Err(errors) = self.schema.validate(instance) {
            let mut first_path = None;
            let mut msgs = Vec::new();
            for e in errors {
                let path = e.instance_path.to_string();
                if first_path.is_none() {
                    first_path = Some(path.clone());
                }
                if path.is_empty() {
                    msgs.push(e.to_string());
                } else {
                    msgs.push(format!("{}: {}", path, e));
                }
            }
            let mut context = ErrorContext::new().with_source("schema_validator");
            if let Some(path) = first_path.filter(|p| !p.is_empty()) {
                context = context.with_field_path(path);
            }
            return Err(Error::validation_with_context(
                format!("input does not match schema: {}", msgs.join("; ")),
                context,
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.raw)
            .finish()
    }
}
