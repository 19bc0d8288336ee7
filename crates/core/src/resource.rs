//! Searchable resource descriptors
//!
//! Patient, Practitioner and Encounter share one search/read implementation.
//! Each type is described by the bundle file it is served from, the search
//! parameters it recognizes, and whether identifier values also resolve
//! single-resource reads.

use serde_json::Value as JsonValue;

use crate::bundle::BundleEntry;

/// A search parameter understood by the mock server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchParam {
    /// `name:contains`
    NameContains,
    /// `_id`
    Id,
    /// `identifier`
    Identifier,
    /// `patient` / `subject`
    Subject,
}

impl SearchParam {
    /// Query parameter names accepted for this parameter
    pub fn names(self) -> &'static [&'static str] {
        match self {
            SearchParam::NameContains => &["name:contains"],
            SearchParam::Id => &["_id"],
            SearchParam::Identifier => &["identifier"],
            SearchParam::Subject => &["patient", "subject"],
        }
    }

    /// FHIR search parameter type, as advertised in the CapabilityStatement
    pub fn fhir_type(self) -> &'static str {
        match self {
            SearchParam::NameContains => "string",
            SearchParam::Id | SearchParam::Identifier => "token",
            SearchParam::Subject => "reference",
        }
    }
}

/// A resource type served from a static bundle file
#[derive(Debug)]
pub struct SearchableResource {
    /// FHIR resource type, also the route segment
    pub resource_type: &'static str,
    /// Bundle file name inside the mock-data directory
    pub file_name: &'static str,
    pub params: &'static [SearchParam],
    /// Whether `GET /<type>/{id}` also matches identifier values
    pub read_by_identifier: bool,
}

pub static PATIENT: SearchableResource = SearchableResource {
    resource_type: "Patient",
    file_name: "csv-patients-bundle.json",
    params: &[
        SearchParam::NameContains,
        SearchParam::Id,
        SearchParam::Identifier,
    ],
    read_by_identifier: true,
};

pub static PRACTITIONER: SearchableResource = SearchableResource {
    resource_type: "Practitioner",
    file_name: "csv-practitioners-bundle.json",
    params: &[
        SearchParam::NameContains,
        SearchParam::Id,
        SearchParam::Identifier,
    ],
    read_by_identifier: true,
};

pub static ENCOUNTER: SearchableResource = SearchableResource {
    resource_type: "Encounter",
    file_name: "csv-encounters-bundle.json",
    params: &[SearchParam::Id, SearchParam::Subject],
    read_by_identifier: false,
};

/// All served resource types
pub static RESOURCES: [&SearchableResource; 3] = [&PATIENT, &PRACTITIONER, &ENCOUNTER];

impl SearchableResource {
    pub fn recognizes(&self, param: SearchParam) -> bool {
        self.params.contains(&param)
    }

    /// Diagnostics for a failed bundle load
    pub fn load_failure_message(&self) -> String {
        format!(
            "Failed to load CSV {} data",
            self.resource_type.to_lowercase()
        )
    }

    pub fn not_found_message(&self, id: &str) -> String {
        format!("{} with id {} not found", self.resource_type, id)
    }

    /// Find the first entry whose resource id (or, when enabled, any
    /// identifier value) equals `id`.
    pub fn find<'a>(&self, entries: &'a [BundleEntry], id: &str) -> Option<&'a JsonValue> {
        entries
            .iter()
            .filter_map(|entry| entry.resource.as_ref())
            .find(|resource| {
                resource.get("id").and_then(JsonValue::as_str) == Some(id)
                    || (self.read_by_identifier && has_identifier(resource, id))
            })
    }
}

/// Whether any `identifier[].value` equals `value`
pub(crate) fn has_identifier(resource: &JsonValue, value: &str) -> bool {
    resource
        .get("identifier")
        .and_then(JsonValue::as_array)
        .is_some_and(|identifiers| {
            identifiers
                .iter()
                .any(|identifier| identifier.get("value").and_then(JsonValue::as_str) == Some(value))
        })
}
