//! Basic-Auth header construction for an upstream FHIR server

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::FhirError;

/// Upstream FHIR server credentials, passed explicitly to callers
#[derive(Debug, Clone, Default)]
pub struct UpstreamAuth {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub server_url: Option<String>,
}

impl UpstreamAuth {
    /// Load credentials from `FHIR_CLIENT_ID`, `FHIR_CLIENT_SECRET` and
    /// `FHIR_SERVER_URL`. Nothing has a default.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("FHIR_CLIENT_ID").ok(),
            client_secret: std::env::var("FHIR_CLIENT_SECRET").ok(),
            server_url: std::env::var("FHIR_SERVER_URL").ok(),
        }
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn build_auth_header(&self) -> Result<String, FhirError> {
        let (Some(client_id), Some(client_secret)) = (
            configured(&self.client_id),
            configured(&self.client_secret),
        ) else {
            return Err(FhirError::CredentialsNotConfigured);
        };

        let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
        Ok(format!("Basic {}", encoded))
    }

    /// Whether `url` points at the configured upstream server
    pub fn is_known_server(&self, url: &str) -> bool {
        configured(&self.server_url).is_some_and(|server_url| url.contains(server_url))
    }
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(id: Option<&str>, secret: Option<&str>, url: Option<&str>) -> UpstreamAuth {
        UpstreamAuth {
            client_id: id.map(String::from),
            client_secret: secret.map(String::from),
            server_url: url.map(String::from),
        }
    }

    #[test]
    fn builds_basic_header() {
        let header = auth(Some("client_id"), Some("client_secret"), None)
            .build_auth_header()
            .unwrap();
        assert_eq!(header, "Basic Y2xpZW50X2lkOmNsaWVudF9zZWNyZXQ=");
    }

    #[test]
    fn secret_may_contain_colons() {
        let header = auth(Some("client"), Some("pass:word"), None)
            .build_auth_header()
            .unwrap();
        assert_eq!(header, "Basic Y2xpZW50OnBhc3M6d29yZA==");
    }

    #[test]
    fn missing_credentials_fail() {
        for credentials in [
            auth(None, Some("secret"), None),
            auth(Some("id"), None, None),
            auth(Some(""), Some("secret"), None),
            UpstreamAuth::default(),
        ] {
            assert!(matches!(
                credentials.build_auth_header(),
                Err(FhirError::CredentialsNotConfigured)
            ));
        }
    }

    #[test]
    fn known_server_is_substring_match() {
        let credentials = auth(None, None, Some("https://fhir.example.org"));
        assert!(credentials.is_known_server("https://fhir.example.org/fhir/R4/Patient"));
        assert!(!credentials.is_known_server("https://other.example.org/fhir/R4/Patient"));
    }

    #[test]
    fn unconfigured_server_is_never_known() {
        assert!(!UpstreamAuth::default().is_known_server("https://fhir.example.org"));
        assert!(!auth(None, None, Some("")).is_known_server("https://fhir.example.org"));
    }
}
