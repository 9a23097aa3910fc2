//! Tool definitions and boundary validation of tool arguments.
//!
//! A [`ToolDefinition`] describes one callable operation: its unique name, a
//! human-readable description and a JSON-Schema-like parameter object. On the
//! wire it uses the function-calling envelope:
//!
//! ```json
//! { "type": "function", "function": { "name": "...", "description": "...", "parameters": { ... } } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::ToolError;

/// JSON object type used for tool arguments.
pub type JsonObject = Map<String, Value>;

/// Machine-readable description of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool identifier (exact, case-sensitive).
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Parameter schema (`type: "object"` with `properties` and `required`).
    pub parameters: Value,
}

/// Function-calling envelope around a [`ToolDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolDefinition,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Unwrap a definition from its function envelope, checking its shape.
    pub fn from_envelope(envelope: FunctionEnvelope) -> Result<Self, String> {
        if envelope.kind != "function" {
            return Err(format!(
                "unsupported definition type '{}', expected 'function'",
                envelope.kind
            ));
        }
        envelope.function.validate()?;
        Ok(envelope.function)
    }

    /// Wrap this definition in the function envelope.
    pub fn to_function_json(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    /// The parameter schema as a JSON object.
    pub fn parameters_object(&self) -> JsonObject {
        self.parameters.as_object().cloned().unwrap_or_default()
    }

    /// Check the definition itself is well formed.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tool name must not be empty".to_string());
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(format!("tool name '{}' must not contain whitespace", self.name));
        }

        let schema = self
            .parameters
            .as_object()
            .ok_or_else(|| format!("parameters of '{}' must be an object", self.name))?;

        match schema.get("type").and_then(Value::as_str) {
            Some("object") => {}
            other => {
                return Err(format!(
                    "parameters of '{}' must have type 'object', found {:?}",
                    self.name, other
                ));
            }
        }

        if let Some(properties) = schema.get("properties") {
            if !properties.is_object() {
                return Err(format!("'properties' of '{}' must be an object", self.name));
            }
        }

        if let Some(required) = schema.get("required") {
            let all_strings = required
                .as_array()
                .is_some_and(|fields| fields.iter().all(Value::is_string));
            if !all_strings {
                return Err(format!(
                    "'required' of '{}' must be an array of strings",
                    self.name
                ));
            }
        }

        Ok(())
    }

    /// Names of the required arguments.
    pub fn required_fields(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Validate an argument mapping against the parameter schema.
    ///
    /// Required fields must be present and non-null. Declared properties that
    /// are supplied must match their primitive `type`. Extra fields pass.
    pub fn validate_arguments(&self, arguments: &JsonObject) -> Result<(), ToolError> {
        for field in self.required_fields() {
            match arguments.get(field) {
                None | Some(Value::Null) => {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required field '{}'",
                        field
                    )));
                }
                Some(_) => {}
            }
        }

        let Some(properties) = self.parameters.get("properties").and_then(Value::as_object) else {
            return Ok(());
        };

        for (field, value) in arguments {
            if value.is_null() {
                continue;
            }
            let Some(expected) = properties
                .get(field)
                .and_then(|p| p.get("type"))
                .and_then(Value::as_str)
            else {
                continue;
            };
            if !matches_type(value, expected) {
                return Err(ToolError::invalid_arguments(format!(
                    "field '{}' must be of type {}",
                    field, expected
                )));
            }
        }

        Ok(())
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        // Unknown schema types are not checked.
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_definition() -> ToolDefinition {
        ToolDefinition::new(
            "search_volumes",
            "Search for volumes in the Google Books API.",
            json!({
                "type": "object",
                "properties": {
                    "q": { "type": "string", "description": "The search query for volumes." },
                    "maxResults": { "type": "integer" }
                },
                "required": ["q"]
            }),
        )
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_envelope_roundtrip_shape() {
        let raw = json!({
            "type": "function",
            "function": {
                "name": "search_volumes",
                "description": "Search for volumes in the Google Books API.",
                "parameters": { "type": "object", "properties": {}, "required": [] }
            }
        });
        let envelope: FunctionEnvelope = serde_json::from_value(raw.clone()).unwrap();
        let definition = ToolDefinition::from_envelope(envelope).unwrap();
        assert_eq!(definition.name, "search_volumes");
        assert_eq!(definition.to_function_json(), raw);
    }

    #[test]
    fn test_envelope_rejects_wrong_type() {
        let envelope = FunctionEnvelope {
            kind: "retrieval".into(),
            function: search_definition(),
        };
        assert!(ToolDefinition::from_envelope(envelope).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut def = search_definition();
        def.name = "  ".into();
        assert!(def.validate().is_err());

        let mut def = search_definition();
        def.name = "search volumes".into();
        assert!(def.validate().is_err());

        let mut def = search_definition();
        def.parameters = json!({ "type": "array" });
        assert!(def.validate().is_err());

        let mut def = search_definition();
        def.parameters = json!({ "type": "object", "required": "q" });
        assert!(def.validate().is_err());

        assert!(search_definition().validate().is_ok());
    }

    #[test]
    fn test_required_field_missing() {
        let def = search_definition();
        let err = def.validate_arguments(&JsonObject::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = def.validate_arguments(&args(json!({ "q": null }))).unwrap_err();
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn test_type_mismatch() {
        let def = search_definition();
        assert!(def.validate_arguments(&args(json!({ "q": 42 }))).is_err());
        assert!(
            def.validate_arguments(&args(json!({ "q": "rust", "maxResults": 1.5 })))
                .is_err()
        );
    }

    #[test]
    fn test_valid_arguments_with_extras() {
        let def = search_definition();
        assert!(
            def.validate_arguments(&args(json!({ "q": "rust", "maxResults": 5, "extra": true })))
                .is_ok()
        );
    }
}
