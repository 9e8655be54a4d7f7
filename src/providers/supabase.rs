use std::collections::HashMap;

use crate::{
    config::SupabaseConfig,
    error::{Result, ThumbError},
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Profile {
    pub fn plan_or_free(&self) -> &str {
        self.plan.as_deref().unwrap_or("free")
    }
}

/// Read-only client for the auth/profile backend's REST interface.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(client: Client, config: &SupabaseConfig) -> Result<Self> {
        let missing = config.missing();
        if !missing.is_empty() {
            return Err(ThumbError::ConfigError(format!(
                "Auth backend not configured, missing: {}",
                missing.join(", ")
            )));
        }

        let base_url = config.url.clone().unwrap_or_default();
        let anon_key = config.anon_key.clone().unwrap_or_default();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn build_headers(&self, access_token: Option<&str>) -> Result<HeaderMap> {
        let bearer = access_token.unwrap_or(&self.anon_key);
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key)
                .map_err(|e| ThumbError::ConfigError(format!("Invalid anon key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer))
                .map_err(|e| ThumbError::RequestError(format!("Invalid access token: {}", e)))?,
        );
        Ok(headers)
    }

    pub async fn fetch_profile(
        &self,
        user_id: &str,
        access_token: Option<&str>,
    ) -> Result<Option<Profile>> {
        let url = format!("{}/rest/v1/profiles", self.base_url);
        let filter = format!("eq.{}", user_id);

        let response = self
            .client
            .get(&url)
            .headers(self.build_headers(access_token)?)
            .query(&[("id", filter.as_str()), ("select", "*")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ThumbError::provider(
                "supabase",
                format!("profile lookup returned {}: {}", status, error_text),
            ));
        }

        let rows: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| ThumbError::ResponseError(e.to_string()))?;
        Ok(rows.into_iter().next())
    }
}
