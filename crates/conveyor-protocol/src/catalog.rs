//! Stream catalog types.
//!
//! A [`Catalog`] is the set of [`Stream`]s a source exposes, produced by
//! the `discover` capability. A [`ConfiguredCatalog`] is the
//! orchestrator's selection out of that set (per stream, the chosen sync
//! mode and cursor), handed back to the connector as input to `read`.

use serde::{Deserialize, Serialize};

use crate::spec::Properties;

/// How data is read from a source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// One-time full read of all records.
    FullRefresh,
    /// Cursor-based reads since the last checkpoint.
    Incremental,
}

/// How the orchestrator writes synced data on the destination side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    /// Insert all records.
    #[default]
    Append,
    /// Replace the destination table each run.
    Overwrite,
    /// Insert with history-preserving deduplication.
    AppendDedup,
}

/// A discoverable stream exposed by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Stream name, unique within its namespace.
    pub name: String,
    /// JSON-schema-shaped description of the stream's fields.
    pub json_schema: Properties,
    /// Sync modes this stream supports.
    pub supported_sync_modes: Vec<SyncMode>,
    /// Whether the source defines its own cursor for this stream.
    #[serde(default)]
    pub source_defined_cursor: bool,
    /// Cursor field path used when the orchestrator does not pick one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_cursor_field: Vec<String>,
    /// Optional namespace qualifying the stream name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Set of streams a source exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<Stream>,
}

/// One stream the orchestrator selected for syncing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// The stream descriptor as discovered.
    pub stream: Stream,
    /// Sync mode chosen by the orchestrator.
    pub sync_mode: SyncMode,
    /// Cursor field path for incremental mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cursor_field: Vec<String>,
    /// Destination-side write behavior chosen by the orchestrator.
    #[serde(default)]
    pub destination_sync_mode: DestinationSyncMode,
}

/// The orchestrator's stream selection, input to `read`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    pub streams: Vec<ConfiguredStream>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{PropType, Properties, PropertySpec};

    fn users_stream() -> Stream {
        Stream {
            name: "users".into(),
            json_schema: Properties {
                properties: [
                    ("id".to_string(), PropertySpec::typed(PropType::Integer)),
                    ("name".to_string(), PropertySpec::typed(PropType::String)),
                ]
                .into_iter()
                .collect(),
            },
            supported_sync_modes: vec![SyncMode::FullRefresh, SyncMode::Incremental],
            source_defined_cursor: false,
            default_cursor_field: vec![],
            namespace: Some("public".into()),
        }
    }

    #[test]
    fn sync_mode_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&SyncMode::FullRefresh).unwrap(),
            "\"full_refresh\""
        );
        assert_eq!(
            serde_json::to_string(&DestinationSyncMode::AppendDedup).unwrap(),
            "\"append_dedup\""
        );
    }

    #[test]
    fn catalog_roundtrip() {
        let catalog = Catalog {
            streams: vec![users_stream()],
        };
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, back);
    }

    #[test]
    fn stream_optional_fields_skipped() {
        let mut stream = users_stream();
        stream.namespace = None;
        let v = serde_json::to_value(&stream).unwrap();
        assert!(v.get("namespace").is_none());
        assert!(v.get("default_cursor_field").is_none());
        // source_defined_cursor stays explicit even when false
        assert_eq!(v["source_defined_cursor"], false);
    }

    #[test]
    fn configured_catalog_tolerates_missing_destination_mode() {
        let json = r#"{
            "streams": [{
                "stream": {
                    "name": "users",
                    "json_schema": {"properties": {}},
                    "supported_sync_modes": ["full_refresh"]
                },
                "sync_mode": "full_refresh"
            }]
        }"#;
        let catalog: ConfiguredCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(
            catalog.streams[0].destination_sync_mode,
            DestinationSyncMode::Append
        );
        assert!(catalog.streams[0].cursor_field.is_empty());
    }

    #[test]
    fn configured_stream_roundtrip() {
        let configured = ConfiguredStream {
            stream: users_stream(),
            sync_mode: SyncMode::Incremental,
            cursor_field: vec!["updated_at".into()],
            destination_sync_mode: DestinationSyncMode::Overwrite,
        };
        let json = serde_json::to_string(&configured).unwrap();
        let back: ConfiguredStream = serde_json::from_str(&json).unwrap();
        assert_eq!(configured, back);
    }
}
