//! Payload schemas for request bodies.
//!
//! Bodies are checked against a small JSON-schema subset (value types,
//! required properties, closed objects, array items) before they are
//! deserialized, so clients get every violation at once instead of the
//! first serde error. Schemas are immutable and built once at startup.

use serde_json::Value;

use super::error::{FieldError, ValidationError};

// =============================================================================
// Schema Types
// =============================================================================

/// Schema of a single JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSchema {
    /// Any JSON string.
    String,
    /// A JSON array whose items all match the inner schema.
    Array(Box<ValueSchema>),
    /// A JSON object matching the inner schema.
    Object(ObjectSchema),
}

/// Schema of a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    properties: Vec<(String, ValueSchema)>,
    required: Vec<String>,
    additional_properties: bool,
}

impl ObjectSchema {
    /// Creates an open object schema with no declared properties.
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }

    /// Declares a required property.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>, schema: ValueSchema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    /// Rejects properties that were not declared.
    #[must_use]
    pub const fn deny_additional_properties(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    /// Validates a value against this schema.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in document order.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        self.check(value, "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(errors))
        }
    }

    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        let Some(object) = value.as_object() else {
            errors.push(FieldError::new(path, "must be an object"));
            return;
        };

        for name in &self.required {
            if !object.contains_key(name) {
                errors.push(FieldError::new(format!("{path}/{name}"), "is required"));
            }
        }

        for (key, property_value) in object {
            let property_path = format!("{path}/{key}");
            match self.property_schema(key) {
                Some(schema) => schema.check(property_value, &property_path, errors),
                None if !self.additional_properties => {
                    errors.push(FieldError::new(property_path, "is not allowed"));
                }
                None => {}
            }
        }
    }

    fn property_schema(&self, name: &str) -> Option<&ValueSchema> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, schema)| schema)
    }
}

impl ValueSchema {
    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        match self {
            Self::String => {
                if !value.is_string() {
                    errors.push(FieldError::new(path, "must be a string"));
                }
            }
            Self::Array(items) => match value.as_array() {
                Some(values) => {
                    for (index, item) in values.iter().enumerate() {
                        items.check(item, &format!("{path}/{index}"), errors);
                    }
                }
                None => errors.push(FieldError::new(path, "must be an array")),
            },
            Self::Object(schema) => schema.check(value, path, errors),
        }
    }
}

// =============================================================================
// Task Schemas
// =============================================================================

/// The schemas for every task-mutating request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSchemas {
    /// `POST /employees/{empId}/tasks`: `{ text }`.
    pub create_task: ObjectSchema,
    /// `PUT /employees/{empId}/tasks`: `{ todo, done }`.
    pub replace_tasks: ObjectSchema,
}

impl TaskSchemas {
    /// Builds the schemas.
    #[must_use]
    pub fn new() -> Self {
        let task_item = ValueSchema::Object(
            ObjectSchema::new()
                .required("_id", ValueSchema::String)
                .required("text", ValueSchema::String)
                .deny_additional_properties(),
        );
        let task_array = || ValueSchema::Array(Box::new(task_item.clone()));

        Self {
            create_task: ObjectSchema::new()
                .required("text", ValueSchema::String)
                .deny_additional_properties(),
            replace_tasks: ObjectSchema::new()
                .required("todo", task_array())
                .required("done", task_array())
                .deny_additional_properties(),
        }
    }
}

impl Default for TaskSchemas {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
