//! Connector self-description types.
//!
//! A [`ConnectorSpecification`] is what the `spec` capability returns:
//! capability flags plus a [`ConnectionSpecification`], the JSON-schema
//! "form" describing the configuration the connector expects.
//!
//! Wire names mix camelCase and snake_case; that mixture is the
//! orchestrator protocol's actual spelling and is preserved verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::DestinationSyncMode;

/// JSON-schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// A property's type: a single primitive or a union of them.
///
/// Unions are how optional fields are expressed on the wire, e.g.
/// `["integer","null"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyType {
    Single(PropType),
    Union(Vec<PropType>),
}

impl From<PropType> for PropertyType {
    fn from(value: PropType) -> Self {
        Self::Single(value)
    }
}

/// Schema entry for one named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Element schema when the property is an array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySpec>>,
    /// Nested field schemas when the property is an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySpec>>,
}

impl PropertySpec {
    /// Spec for a plain value of one type.
    pub fn typed(prop_type: PropType) -> Self {
        Self {
            property_type: prop_type.into(),
            description: None,
            examples: vec![],
            items: None,
            properties: None,
        }
    }

    /// Spec for a value that may also be null.
    pub fn nullable(prop_type: PropType) -> Self {
        Self {
            property_type: PropertyType::Union(vec![prop_type, PropType::Null]),
            ..Self::typed(prop_type)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}

/// Named field schemas, keyed by field name.
///
/// Serializes as `{"properties": {...}}`, the shape shared by stream
/// schemas and the connection form. Keys are ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
}

impl FromIterator<(String, PropertySpec)> for Properties {
    fn from_iter<T: IntoIterator<Item = (String, PropertySpec)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

/// The configuration "form" a connector expects, as a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpecification {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    /// Names of fields that must be present in the configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(flatten)]
    pub properties: Properties,
}

fn object_type() -> String {
    "object".to_string()
}

/// Connector self-description returned by the `spec` capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpecification {
    #[serde(
        rename = "documentationUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub documentation_url: Option<String>,
    #[serde(
        rename = "changelogUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub changelog_url: Option<String>,
    #[serde(rename = "supportsIncremental", default)]
    pub supports_incremental: bool,
    #[serde(rename = "supportsNormalization", default)]
    pub supports_normalization: bool,
    /// Whether the connector's output is suitable for a downstream
    /// transform step.
    #[serde(rename = "supportsTransforms", default)]
    pub supports_transforms: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_destination_sync_modes: Vec<DestinationSyncMode>,
    #[serde(rename = "connectionSpecification")]
    pub connection_specification: ConnectionSpecification,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> ConnectorSpecification {
        ConnectorSpecification {
            documentation_url: Some("https://example.com/docs".into()),
            changelog_url: None,
            supports_incremental: true,
            supports_normalization: false,
            supports_transforms: false,
            supported_destination_sync_modes: vec![DestinationSyncMode::Overwrite],
            connection_specification: ConnectionSpecification {
                title: "Example Source".into(),
                description: "Settings for the example source".into(),
                schema_type: "object".into(),
                required: vec!["apiKey".into()],
                properties: [(
                    "apiKey".to_string(),
                    PropertySpec::typed(PropType::String)
                        .with_description("API key, a valid uuid")
                        .with_examples(["xxxx-xxxx-xxxx-xxxx"]),
                )]
                .into_iter()
                .collect(),
            },
        }
    }

    #[test]
    fn prop_type_wire_spelling() {
        assert_eq!(serde_json::to_string(&PropType::String).unwrap(), "\"string\"");
        assert_eq!(serde_json::to_string(&PropType::Null).unwrap(), "\"null\"");
    }

    #[test]
    fn property_type_single_vs_union() {
        let single: PropertyType = PropType::Integer.into();
        assert_eq!(serde_json::to_string(&single).unwrap(), "\"integer\"");

        let union = PropertyType::Union(vec![PropType::Integer, PropType::Null]);
        assert_eq!(
            serde_json::to_string(&union).unwrap(),
            r#"["integer","null"]"#
        );

        let back: PropertyType = serde_json::from_str(r#"["integer","null"]"#).unwrap();
        assert_eq!(back, union);
    }

    #[test]
    fn nullable_builds_union() {
        let spec = PropertySpec::nullable(PropType::Integer);
        assert_eq!(
            spec.property_type,
            PropertyType::Union(vec![PropType::Integer, PropType::Null])
        );
    }

    #[test]
    fn connection_specification_flattens_properties() {
        let spec = sample_spec();
        let v = serde_json::to_value(&spec).unwrap();
        // "properties" sits directly under connectionSpecification, not
        // double-nested.
        assert!(v["connectionSpecification"]["properties"]["apiKey"].is_object());
        assert_eq!(v["connectionSpecification"]["type"], "object");
        assert_eq!(v["connectionSpecification"]["required"][0], "apiKey");
    }

    #[test]
    fn specification_wire_names() {
        let v = serde_json::to_value(sample_spec()).unwrap();
        assert_eq!(v["documentationUrl"], "https://example.com/docs");
        assert_eq!(v["supportsIncremental"], true);
        assert_eq!(v["supported_destination_sync_modes"][0], "overwrite");
        assert!(v.get("changelogUrl").is_none());
    }

    #[test]
    fn specification_roundtrip() {
        let spec = sample_spec();
        let json = serde_json::to_string(&spec).unwrap();
        let back: ConnectorSpecification = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn nested_object_property_roundtrip() {
        let spec = PropertySpec {
            properties: Some(
                [("street".to_string(), PropertySpec::typed(PropType::String))]
                    .into_iter()
                    .collect(),
            ),
            ..PropertySpec::typed(PropType::Object)
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: PropertySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn array_items_roundtrip() {
        let spec = PropertySpec {
            items: Some(Box::new(PropertySpec::typed(PropType::Number))),
            ..PropertySpec::typed(PropType::Array)
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: PropertySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
