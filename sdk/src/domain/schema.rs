// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Tool Schema Builder
//
// Builds JSON Schema for action-dispatched tool inputs: a required `action`
// enum followed by the tool's own parameters.

use serde_json::{json, Map, Value};

/// Builder for action-dispatched tool input schemas
#[derive(Debug, Clone, Default)]
pub struct ToolSchema {
    actions: Vec<String>,
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ToolSchema {
    /// Start a schema whose `action` field accepts the given names
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn string(self, name: &str, description: &str, required: bool) -> Self {
        self.property(name, json!({ "type": "string", "description": description }), required)
    }

    pub fn number(self, name: &str, description: &str, required: bool) -> Self {
        self.property(name, json!({ "type": "number", "description": description }), required)
    }

    pub fn boolean(self, name: &str, description: &str, required: bool) -> Self {
        self.property(name, json!({ "type": "boolean", "description": description }), required)
    }

    /// String parameter restricted to `values`
    pub fn enumeration(self, name: &str, description: &str, required: bool, values: &[&str]) -> Self {
        self.property(
            name,
            json!({ "type": "string", "enum": values, "description": description }),
            required,
        )
    }

    pub fn object(self, name: &str, description: &str, required: bool) -> Self {
        self.property(name, json!({ "type": "object", "description": description }), required)
    }

    fn property(mut self, name: &str, spec: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), spec);
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Produce the schema. `action` is always present and always required first.
    pub fn build(self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            "action".to_string(),
            json!({
                "type": "string",
                "enum": self.actions,
                "description": format!("Action to perform: {}", self.actions.join(", ")),
            }),
        );
        for (name, spec) in self.properties {
            properties.insert(name, spec);
        }

        let mut required = vec!["action".to_string()];
        required.extend(self.required);

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_is_first_required_property() {
        let schema = ToolSchema::new(["add", "divide"])
            .number("a", "First operand", true)
            .number("b", "Second operand", true)
            .string("note", "Free text", false)
            .build();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["action", "a", "b"]));
        assert_eq!(schema["properties"]["action"]["enum"], json!(["add", "divide"]));
        assert_eq!(
            schema["properties"]["action"]["description"],
            "Action to perform: add, divide"
        );
        assert_eq!(schema["properties"]["note"]["type"], "string");
    }

    #[test]
    fn test_property_types() {
        let schema = ToolSchema::new(["run"])
            .boolean("dry_run", "Do not apply", false)
            .enumeration("mode", "Mode", true, &["fast", "safe"])
            .object("options", "Extra options", false)
            .build();

        let props = &schema["properties"];
        assert_eq!(props["dry_run"]["type"], "boolean");
        assert_eq!(props["mode"]["enum"], json!(["fast", "safe"]));
        assert_eq!(props["options"]["type"], "object");
        assert_eq!(schema["required"], json!(["action", "mode"]));
    }

    #[test]
    fn test_no_actions() {
        let schema = ToolSchema::new(Vec::<String>::new()).build();
        assert_eq!(schema["properties"]["action"]["description"], "Action to perform: ");
        assert_eq!(schema["required"], json!(["action"]));
    }
}
