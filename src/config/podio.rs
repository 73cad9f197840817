use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CLIENT_ID_ENV: &str = "PODIO_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "PODIO_CLIENT_SECRET";
pub const CONTACTS_APP_ID_ENV: &str = "PODIO_CONTACTOS_APP_ID";
pub const CONTACTS_APP_TOKEN_ENV: &str = "PODIO_CONTACTOS_APP_TOKEN";
pub const LEADS_APP_ID_ENV: &str = "PODIO_LEADS_APP_ID";
pub const LEADS_APP_TOKEN_ENV: &str = "PODIO_LEADS_APP_TOKEN";

/// Required credential variables and the config key each one lands on.
pub const CREDENTIAL_VARIABLES: [(&str, &str); 6] = [
    (CLIENT_ID_ENV, "podio.client_id"),
    (CLIENT_SECRET_ENV, "podio.client_secret"),
    (CONTACTS_APP_ID_ENV, "podio.contacts.app_id"),
    (CONTACTS_APP_TOKEN_ENV, "podio.contacts.app_token"),
    (LEADS_APP_ID_ENV, "podio.leads.app_id"),
    (LEADS_APP_TOKEN_ENV, "podio.leads.app_token"),
];

/// Credentials scoping access to a single Podio application.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default, PartialEq, Eq)]
pub struct AppCredentials {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_token: String,
}

/// Podio API access: OAuth client plus the contacts and leads apps.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PodioConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub contacts: AppCredentials,
    #[serde(default)]
    pub leads: AppCredentials,
    /// Base URL of the API; the token endpoint is `{api_url}/oauth/token`.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

fn default_api_url() -> String {
    "https://api.podio.com".to_string()
}

fn default_timeout_in_ms() -> u64 {
    30_000
}

impl Default for PodioConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            contacts: AppCredentials::default(),
            leads: AppCredentials::default(),
            api_url: default_api_url(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

impl PodioConfig {
    /// Names of the credential variables that are absent or blank, in declaration order.
    pub fn missing_variables(&self) -> Vec<&'static str> {
        [
            (CLIENT_ID_ENV, &self.client_id),
            (CLIENT_SECRET_ENV, &self.client_secret),
            (CONTACTS_APP_ID_ENV, &self.contacts.app_id),
            (CONTACTS_APP_TOKEN_ENV, &self.contacts.app_token),
            (LEADS_APP_ID_ENV, &self.leads.app_id),
            (LEADS_APP_TOKEN_ENV, &self.leads.app_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.api_url.trim_end_matches('/'))
    }
}
