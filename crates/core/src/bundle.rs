use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use serde_json::{Map, Value as JsonValue};

/// FHIR Bundle resource as read from a mock-data file.
///
/// Only `total` and `entry` are interpreted; every other field (including
/// `type`) is kept in `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default = "bundle_resource_type")]
    pub resource_type: String,

    /// Always recomputed from `entry`; the file's value is discarded.
    #[serde(
        default,
        deserialize_with = "discard",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<usize>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub entry: Vec<BundleEntry>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

fn bundle_resource_type() -> String {
    "Bundle".to_string()
}

fn discard<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(None)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<BundleEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<BundleEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Bundle {
    /// Replace the entries with a search result and set `total` to match.
    pub fn with_entries(mut self, entries: Vec<BundleEntry>) -> Self {
        self.total = Some(entries.len());
        self.entry = entries;
        self
    }
}

/// One entry in a Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<JsonValue>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl BundleEntry {
    pub fn new(resource: JsonValue) -> Self {
        Self {
            resource: Some(resource),
            extra: Map::new(),
        }
    }

    /// `resource.id`, if it is a string
    pub fn resource_id(&self) -> Option<&str> {
        self.resource.as_ref()?.get("id")?.as_str()
    }
}
