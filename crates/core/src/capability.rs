use serde::{Deserialize, Serialize};

use crate::resource::{RESOURCES, SearchableResource};

/// FHIR CapabilityStatement resource (simplified)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    pub resource_type: String,
    pub status: String,
    pub date: String,
    pub kind: String,
    pub fhir_version: String,
    pub format: Vec<String>,
    pub rest: Vec<CapabilityRest>,
}

impl CapabilityStatement {
    /// Capability statement for the mock server, dated today
    pub fn new() -> Self {
        Self {
            resource_type: "CapabilityStatement".to_string(),
            status: "active".to_string(),
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            kind: "instance".to_string(),
            fhir_version: "4.0.1".to_string(), // R4
            format: vec!["json".to_string()],
            rest: vec![CapabilityRest::default()],
        }
    }
}

impl Default for CapabilityStatement {
    fn default() -> Self {
        Self::new()
    }
}

/// REST capability declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRest {
    pub mode: String,
    pub resource: Vec<CapabilityResource>,
}

impl Default for CapabilityRest {
    fn default() -> Self {
        Self {
            mode: "server".to_string(),
            resource: RESOURCES
                .iter()
                .map(|resource| CapabilityResource::from_resource(resource))
                .collect(),
        }
    }
}

/// Per-resource capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub interaction: Vec<CapabilityInteraction>,
    pub search_param: Vec<CapabilitySearchParam>,
}

impl CapabilityResource {
    fn from_resource(resource: &SearchableResource) -> Self {
        Self {
            resource_type: resource.resource_type.to_string(),
            interaction: ["read", "search-type"]
                .into_iter()
                .map(|code| CapabilityInteraction {
                    code: code.to_string(),
                })
                .collect(),
            search_param: resource
                .params
                .iter()
                .flat_map(|param| {
                    param.names().iter().map(move |name| CapabilitySearchParam {
                        // `name:contains` is advertised as the base parameter
                        name: name.split(':').next().unwrap_or(*name).to_string(),
                        param_type: param.fhir_type().to_string(),
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityInteraction {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitySearchParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}
