use serde::{Deserialize, Serialize};

/// Hosted backend serving the functions and the `user_profiles` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://xyz.supabase.co` or the local functions server.
    #[serde(default)]
    pub url: Option<String>,
    /// Public (anon / publishable) key sent as `apikey`.
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Signed-in user's access token; the anon key is used when absent.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl BackendConfig {
    /// Token for the `Authorization: Bearer` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.anon_key.as_deref())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}
