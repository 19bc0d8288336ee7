//! fhir-mock-core: Shared FHIR types and mock-data search logic
//!
//! This crate provides the Bundle and OperationOutcome shapes served by the
//! mock server, the bundle loader, the searchable resource descriptors and
//! their filters, and the upstream Basic-Auth helper.

pub mod auth;
pub mod bundle;
pub mod capability;
pub mod error;
pub mod loader;
pub mod outcome;
pub mod resource;
pub mod search;

pub use auth::UpstreamAuth;
pub use bundle::{Bundle, BundleEntry};
pub use capability::CapabilityStatement;
pub use error::FhirError;
pub use loader::BundleLoader;
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use resource::{ENCOUNTER, PATIENT, PRACTITIONER, RESOURCES, SearchParam, SearchableResource};
pub use search::SearchParams;
