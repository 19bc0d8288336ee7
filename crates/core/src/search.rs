//! Search parameter model and entry filtering

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::bundle::BundleEntry;
use crate::resource::{SearchParam, SearchableResource, has_identifier};

/// Search parameters, from the query string or a `_search` body
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchParams {
    #[serde(rename = "name:contains")]
    pub name_contains: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub identifier: Option<String>,
    pub patient: Option<String>,
    pub subject: Option<String>,
}

/// Empty strings count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl SearchParams {
    /// Combine with a fallback set, keeping our value wherever it is present.
    pub fn or(self, fallback: SearchParams) -> SearchParams {
        SearchParams {
            name_contains: present(self.name_contains).or(present(fallback.name_contains)),
            id: present(self.id).or(present(fallback.id)),
            identifier: present(self.identifier).or(present(fallback.identifier)),
            patient: present(self.patient).or(present(fallback.patient)),
            subject: present(self.subject).or(present(fallback.subject)),
        }
    }

    fn value(&self, param: SearchParam) -> Option<&str> {
        let value = match param {
            SearchParam::NameContains => self.name_contains.as_deref(),
            SearchParam::Id => self.id.as_deref(),
            SearchParam::Identifier => self.identifier.as_deref(),
            SearchParam::Subject => self
                .patient
                .as_deref()
                .filter(|v| !v.is_empty())
                .or(self.subject.as_deref()),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// A single parsed filter
enum Predicate<'a> {
    NameContains(String),
    Ids(Vec<&'a str>),
    Identifier(&'a str),
    Subject(&'a str),
}

impl<'a> Predicate<'a> {
    fn new(param: SearchParam, value: &'a str) -> Self {
        match param {
            SearchParam::NameContains => Predicate::NameContains(value.to_lowercase()),
            SearchParam::Id => Predicate::Ids(value.split(',').map(str::trim).collect()),
            SearchParam::Identifier => Predicate::Identifier(value),
            SearchParam::Subject => Predicate::Subject(value),
        }
    }

    fn matches(&self, resource: &JsonValue) -> bool {
        match self {
            Predicate::NameContains(term) => name_contains(resource, term),
            Predicate::Ids(ids) => resource
                .get("id")
                .and_then(JsonValue::as_str)
                .is_some_and(|id| ids.iter().any(|candidate| *candidate == id)),
            Predicate::Identifier(value) => has_identifier(resource, value),
            Predicate::Subject(reference) => subject_matches(resource, reference),
        }
    }
}

/// Case-insensitive match against family, given names, or "given family".
/// `term` is already lowercased.
fn name_contains(resource: &JsonValue, term: &str) -> bool {
    let Some(names) = resource.get("name").and_then(JsonValue::as_array) else {
        return false;
    };

    names.iter().any(|name| {
        let family = name
            .get("family")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_lowercase();
        let given = name
            .get("given")
            .and_then(JsonValue::as_array)
            .map(|given| {
                given
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
            .to_lowercase();
        let full_name = format!("{} {}", given, family);

        family.contains(term) || given.contains(term) || full_name.contains(term)
    })
}

/// `subject.reference` equals the value, `Patient/<value>`, or ends in `/<value>`
fn subject_matches(resource: &JsonValue, value: &str) -> bool {
    let Some(reference) = resource
        .get("subject")
        .and_then(|subject| subject.get("reference"))
        .and_then(JsonValue::as_str)
    else {
        return false;
    };

    reference == value
        || reference == format!("Patient/{}", value)
        || reference.ends_with(&format!("/{}", value))
}

/// Return the entries of `resource` that satisfy every supplied parameter
/// it recognizes, in their original order.
pub fn filter_entries(
    resource: &SearchableResource,
    entries: Vec<BundleEntry>,
    params: &SearchParams,
) -> Vec<BundleEntry> {
    let predicates: Vec<Predicate<'_>> = resource
        .params
        .iter()
        .filter_map(|&param| params.value(param).map(|value| Predicate::new(param, value)))
        .collect();

    if predicates.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .filter(|entry| {
            entry.resource.as_ref().is_some_and(|resource| {
                predicates.iter().all(|predicate| predicate.matches(resource))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ENCOUNTER, PATIENT, PRACTITIONER};
    use serde_json::json;

    fn people() -> Vec<BundleEntry> {
        vec![
            BundleEntry::new(json!({
                "resourceType": "Patient",
                "id": "p1",
                "name": [{"family": "Smith", "given": ["Jane"]}],
                "identifier": [{"value": "MRN-1"}]
            })),
            BundleEntry::new(json!({
                "resourceType": "Patient",
                "id": "p2",
                "name": [{"family": "Doe", "given": ["John", "Paul"]}],
                "identifier": [{"value": "MRN-2"}, {"value": "SSN-2"}]
            })),
            BundleEntry::new(json!({
                "resourceType": "Patient",
                "id": "p3",
                "name": [{"family": "Nguyen"}, {"given": ["Anh"], "family": "Smithers"}]
            })),
            BundleEntry::new(json!({"resourceType": "Patient", "id": "p4"})),
        ]
    }

    fn encounters() -> Vec<BundleEntry> {
        vec![
            BundleEntry::new(json!({"id": "e1", "subject": {"reference": "p1"}})),
            BundleEntry::new(json!({"id": "e2", "subject": {"reference": "Patient/p1"}})),
            BundleEntry::new(json!({"id": "e3", "subject": {"reference": "https://ehr.example/fhir/Patient/p1"}})),
            BundleEntry::new(json!({"id": "e4", "subject": {"reference": "Patient/p10"}})),
            BundleEntry::new(json!({"id": "e5", "subject": {"display": "no reference"}})),
            BundleEntry::new(json!({"id": "e6"})),
        ]
    }

    fn ids(entries: &[BundleEntry]) -> Vec<&str> {
        entries.iter().filter_map(BundleEntry::resource_id).collect()
    }

    fn name(term: &str) -> SearchParams {
        SearchParams {
            name_contains: Some(term.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn no_params_returns_everything() {
        let all = people();
        let filtered = filter_entries(&PATIENT, all.clone(), &SearchParams::default());
        assert_eq!(filtered, all);
    }

    #[test]
    fn name_contains_is_case_insensitive_on_family() {
        let filtered = filter_entries(&PATIENT, people(), &name("smith"));
        assert_eq!(ids(&filtered), ["p1", "p3"]);
    }

    #[test]
    fn name_contains_matches_given_and_full_name() {
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &name("PAUL"))), ["p2"]);
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &name("john paul"))), ["p2"]);
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &name("jane smith"))), ["p1"]);
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &name("anh smithers"))), ["p3"]);
    }

    #[test]
    fn name_contains_without_match_is_empty() {
        assert!(filter_entries(&PRACTITIONER, people(), &name("zzz")).is_empty());
    }

    #[test]
    fn id_accepts_comma_separated_exact_values() {
        let params = SearchParams {
            id: Some("p1, p3,p".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &params)), ["p1", "p3"]);
    }

    #[test]
    fn identifier_matches_any_value_exactly() {
        let params = SearchParams {
            identifier: Some("SSN-2".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &params)), ["p2"]);

        let partial = SearchParams {
            identifier: Some("SSN".to_string()),
            ..Default::default()
        };
        assert!(filter_entries(&PATIENT, people(), &partial).is_empty());
    }

    #[test]
    fn params_combine_with_and() {
        let params = SearchParams {
            name_contains: Some("smith".to_string()),
            id: Some("p3,p2".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&PATIENT, people(), &params)), ["p3"]);
    }

    #[test]
    fn unrecognized_params_are_ignored() {
        let params = SearchParams {
            patient: Some("p1".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_entries(&PATIENT, people(), &params).len(), 4);

        let by_name = SearchParams {
            name_contains: Some("zzz".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_entries(&ENCOUNTER, encounters(), &by_name).len(), 6);
    }

    #[test]
    fn subject_matches_all_reference_forms() {
        let params = SearchParams {
            patient: Some("p1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_entries(&ENCOUNTER, encounters(), &params)),
            ["e1", "e2", "e3"]
        );
    }

    #[test]
    fn subject_is_an_alias_for_patient() {
        let params = SearchParams {
            subject: Some("Patient/p10".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&ENCOUNTER, encounters(), &params)), ["e4"]);
    }

    #[test]
    fn patient_wins_over_subject() {
        let params = SearchParams {
            patient: Some("p10".to_string()),
            subject: Some("p1".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&ENCOUNTER, encounters(), &params)), ["e4"]);
    }

    #[test]
    fn encounter_id_filter() {
        let params = SearchParams {
            id: Some("e2,e6".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(&ENCOUNTER, encounters(), &params)), ["e2", "e6"]);
    }

    #[test]
    fn filtered_entries_are_a_subset_in_order() {
        let all = people();
        for term in ["s", "o", "j", "", "smith", "x"] {
            let filtered = filter_entries(&PATIENT, all.clone(), &name(term));
            let mut remaining = all.iter();
            for entry in &filtered {
                assert!(remaining.any(|original| original == entry));
            }
        }
    }

    #[test]
    fn or_prefers_present_values() {
        let query = SearchParams {
            id: Some("q".to_string()),
            identifier: Some(String::new()),
            ..Default::default()
        };
        let body = SearchParams {
            id: Some("b".to_string()),
            identifier: Some("from-body".to_string()),
            subject: Some("s".to_string()),
            ..Default::default()
        };

        let merged = query.or(body);
        assert_eq!(merged.id.as_deref(), Some("q"));
        assert_eq!(merged.identifier.as_deref(), Some("from-body"));
        assert_eq!(merged.subject.as_deref(), Some("s"));
        assert_eq!(merged.name_contains, None);
    }

    #[test]
    fn deserializes_fhir_parameter_names() {
        let params: SearchParams =
            serde_json::from_value(json!({"name:contains": "smi", "_id": "a,b", "other": "x"}))
                .unwrap();
        assert_eq!(params.name_contains.as_deref(), Some("smi"));
        assert_eq!(params.id.as_deref(), Some("a,b"));
    }
}
