use dotenvy::dotenv;
use log::warn;

pub const DEFAULT_REGION: &str = "northeurope";
pub const DEFAULT_LOCALE: &str = "en-us";

/// Subscription settings used to reach the speech service.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub key: String,
    pub region: String,
    /// Full API base URL; derived from `region` when unset.
    pub endpoint: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            key: lookup("SPEECH_KEY").unwrap_or_default(),
            region: lookup("SPEECH_REGION")
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: lookup("SPEECH_ENDPOINT").filter(|e| !e.trim().is_empty()),
        }
    }

    /// Command-line values take precedence over the environment.
    pub fn with_overrides(
        mut self,
        key: Option<String>,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        if let Some(key) = key {
            self.key = key;
        }
        if let Some(region) = region {
            self.region = region;
        }
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        if self.key.trim().is_empty() {
            warn!("No speech key configured; the service will reject requests");
        }
        self
    }

    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.cris.ai/api/speechtotext/v2.0", self.region),
        }
    }
}
