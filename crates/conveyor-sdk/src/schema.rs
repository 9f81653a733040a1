//! Stream schema inference.
//!
//! Builds a [`Properties`] field description from the shape of a sample
//! value, so connector authors can derive catalog schemas from their
//! record types instead of hand-writing them. Pure functions; nothing
//! here touches the sink or the protocol stream.

use serde::Serialize;
use serde_json::Value;

use conveyor_protocol::{EncodeError, PropType, Properties, PropertySpec};

/// Infer field schemas from a JSON object's shape.
///
/// Non-object values produce an empty property map, since a stream
/// schema always describes an object's fields.
pub fn infer_properties(value: &Value) -> Properties {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, field)| (name.clone(), infer_spec(field)))
            .collect(),
        _ => Properties::default(),
    }
}

/// Serialize a native sample value and infer its schema.
///
/// The usual entry point: hand it a populated instance of your record
/// type and use the result as a stream's `json_schema`.
pub fn infer_from<T: Serialize>(sample: &T) -> Result<Properties, EncodeError> {
    let value = serde_json::to_value(sample).map_err(EncodeError::from)?;
    Ok(infer_properties(&value))
}

fn infer_spec(value: &Value) -> PropertySpec {
    match value {
        Value::Null => PropertySpec::typed(PropType::Null),
        Value::Bool(_) => PropertySpec::typed(PropType::Boolean),
        Value::Number(n) => {
            if n.is_f64() {
                PropertySpec::typed(PropType::Number)
            } else {
                PropertySpec::typed(PropType::Integer)
            }
        }
        Value::String(_) => PropertySpec::typed(PropType::String),
        Value::Array(items) => {
            let mut spec = PropertySpec::typed(PropType::Array);
            // An empty sample array carries no element shape.
            spec.items = items.first().map(|first| Box::new(infer_spec(first)));
            spec
        }
        Value::Object(map) => {
            let mut spec = PropertySpec::typed(PropType::Object);
            if !map.is_empty() {
                spec.properties = Some(
                    map.iter()
                        .map(|(name, field)| (name.clone(), infer_spec(field)))
                        .collect(),
                );
            }
            spec
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_protocol::PropertyType;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payment {
        userid: i64,
        amount: f64,
        memo: Option<String>,
        tags: Vec<String>,
    }

    #[test]
    fn scalars_map_to_primitive_types() {
        let props = infer_properties(&json!({
            "name": "ada",
            "age": 36,
            "score": 0.5,
            "active": true,
            "deleted_at": null,
        }));
        let get = |name: &str| props.properties[name].property_type.clone();
        assert_eq!(get("name"), PropertyType::Single(PropType::String));
        assert_eq!(get("age"), PropertyType::Single(PropType::Integer));
        assert_eq!(get("score"), PropertyType::Single(PropType::Number));
        assert_eq!(get("active"), PropertyType::Single(PropType::Boolean));
        assert_eq!(get("deleted_at"), PropertyType::Single(PropType::Null));
    }

    #[test]
    fn nested_objects_recurse() {
        let props = infer_properties(&json!({
            "address": {"street": "Main St", "zip": 12345}
        }));
        let address = &props.properties["address"];
        assert_eq!(address.property_type, PropertyType::Single(PropType::Object));
        let nested = address.properties.as_ref().unwrap();
        assert_eq!(
            nested["street"].property_type,
            PropertyType::Single(PropType::String)
        );
        assert_eq!(
            nested["zip"].property_type,
            PropertyType::Single(PropType::Integer)
        );
    }

    #[test]
    fn arrays_take_first_element_shape() {
        let props = infer_properties(&json!({"tags": ["a", "b"], "empty": []}));
        let tags = &props.properties["tags"];
        assert_eq!(
            tags.items.as_ref().unwrap().property_type,
            PropertyType::Single(PropType::String)
        );
        assert!(props.properties["empty"].items.is_none());
    }

    #[test]
    fn non_object_sample_yields_empty_schema() {
        assert!(infer_properties(&json!(42)).properties.is_empty());
        assert!(infer_properties(&json!("scalar")).properties.is_empty());
    }

    #[test]
    fn infer_from_native_struct() {
        let props = infer_from(&Payment {
            userid: 1,
            amount: 9.75,
            memo: Some("coffee".into()),
            tags: vec!["food".into()],
        })
        .unwrap();
        assert_eq!(
            props.properties["userid"].property_type,
            PropertyType::Single(PropType::Integer)
        );
        assert_eq!(
            props.properties["amount"].property_type,
            PropertyType::Single(PropType::Number)
        );
        assert_eq!(
            props.properties["memo"].property_type,
            PropertyType::Single(PropType::String)
        );
        assert_eq!(
            props.properties["tags"]
                .items
                .as_ref()
                .unwrap()
                .property_type,
            PropertyType::Single(PropType::String)
        );
    }
}
