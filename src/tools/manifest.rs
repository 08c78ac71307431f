use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// 能力的描述信息，用于向模型声明可调用的工具
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ToolPort>,
}

impl ToolManifest {
    pub fn builder(name: impl Into<String>) -> ToolManifestBuilder {
        ToolManifestBuilder::new(name)
    }

    /// OpenAI 兼容的 function 定义
    pub fn to_function_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for port in &self.inputs {
            let mut property = Map::new();
            property.insert("type".into(), json!(port.type_name));
            if let Some(description) = &port.description {
                property.insert("description".into(), json!(description));
            }
            properties.insert(port.name.clone(), Value::Object(property));
            if port.required {
                required.push(json!(port.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description.clone().unwrap_or_default(),
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolPort {
    pub name: String,
    #[serde(default = "default_type_name")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_type_name() -> String {
    "string".to_string()
}

fn default_required() -> bool {
    true
}

impl ToolPort {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: default_type_name(),
            description: None,
            required: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ToolManifestBuilder {
    manifest: ToolManifest,
}

impl ToolManifestBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            manifest: ToolManifest {
                name: name.into(),
                description: None,
                inputs: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.manifest.description = Some(description.into());
        self
    }

    pub fn input(mut self, port: ToolPort) -> Self {
        self.manifest.inputs.push(port);
        self
    }

    pub fn build(self) -> ToolManifest {
        self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_schema_lists_required_inputs() {
        let manifest = ToolManifest::builder("generate_sql")
            .description("根据用户意图和查询生成 SQL 语句。")
            .input(ToolPort::string("intent"))
            .input(ToolPort::string("user_query").with_description("原始问题"))
            .input(ToolPort::string("hint").optional())
            .build();

        let schema = manifest.to_function_schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "generate_sql");
        let params = &schema["function"]["parameters"];
        assert_eq!(params["properties"]["intent"]["type"], "string");
        assert_eq!(params["properties"]["user_query"]["description"], "原始问题");
        assert_eq!(params["required"], json!(["intent", "user_query"]));
    }
}
