use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    models::DraftProject,
    providers::{Profile, SupabaseClient},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfigurationState {
    Ready,
    /// The auth/profile backend is not set up; views show a blocking notice.
    Pending { missing: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

/// Application-wide state, built once at startup and handed to views.
pub struct AppContext {
    config: Config,
    session: Option<Session>,
    profile: Option<Profile>,
    draft: Option<DraftProject>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: None,
            profile: None,
            draft: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn configuration_state(&self) -> ConfigurationState {
        let missing = self.config.supabase.missing();
        if missing.is_empty() {
            ConfigurationState::Ready
        } else {
            ConfigurationState::Pending {
                missing: missing.into_iter().map(String::from).collect(),
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Session) {
        if self
            .session
            .as_ref()
            .map_or(true, |current| current.user_id != session.user_id)
        {
            self.profile = None;
        }
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) {
        self.session = None;
        self.profile = None;
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    pub fn plan(&self) -> &str {
        self.profile.as_ref().map_or("free", Profile::plan_or_free)
    }

    pub fn draft(&self) -> Option<&DraftProject> {
        self.draft.as_ref()
    }

    pub fn set_draft(&mut self, draft: DraftProject) {
        self.draft = Some(draft);
    }

    /// Opportunistically restores a stored draft; unreadable input is ignored.
    pub fn load_draft(&mut self, raw: Option<&str>) -> Option<&DraftProject> {
        if let Some(draft) = raw.and_then(DraftProject::parse) {
            self.draft = Some(draft);
        }
        self.draft.as_ref()
    }

    /// Loads the signed-in user's profile. Errors are logged, not returned.
    pub async fn refresh_profile(&mut self, client: &SupabaseClient) -> Option<&Profile> {
        let session = self.session.clone()?;
        match client
            .fetch_profile(&session.user_id, Some(&session.access_token))
            .await
        {
            Ok(Some(profile)) => self.profile = Some(profile),
            Ok(None) => log::warn!("No profile row for user {}", session.user_id),
            Err(e) => log::error!("Error fetching profile: {}", e),
        }
        self.profile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(user: &str) -> Session {
        Session {
            user_id: user.to_string(),
            access_token: "token".to_string(),
        }
    }

    fn profile(id: &str, plan: &str) -> Profile {
        Profile {
            id: id.to_string(),
            plan: Some(plan.to_string()),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_missing_backend_is_pending() {
        let context = AppContext::new(Config::new());
        assert_eq!(
            context.configuration_state(),
            ConfigurationState::Pending {
                missing: vec!["SUPABASE_URL".to_string(), "SUPABASE_ANON_KEY".to_string()]
            }
        );

        let config = Config::new()
            .with_supabase(SupabaseConfig::new().with_credentials("https://a.supabase.co", "k"));
        assert_eq!(AppContext::new(config).configuration_state(), ConfigurationState::Ready);
    }

    #[test]
    fn test_session_switch_drops_profile() {
        let mut context = AppContext::new(Config::new());
        context.set_session(session("u1"));
        context.set_profile(profile("u1", "pro"));
        assert_eq!(context.plan(), "pro");

        context.set_session(session("u1"));
        assert!(context.profile().is_some());

        context.set_session(session("u2"));
        assert!(context.profile().is_none());
        assert_eq!(context.plan(), "free");

        context.clear_session();
        assert!(context.session().is_none());
    }

    #[test]
    fn test_load_draft_keeps_previous_on_garbage() {
        let mut context = AppContext::new(Config::new());
        assert!(context.load_draft(None).is_none());

        let draft = context
            .load_draft(Some(r#"{"currentImage":"data:image/png;base64,AA","title":"T"}"#))
            .cloned()
            .unwrap();
        assert_eq!(draft.title.as_deref(), Some("T"));

        let kept = context.load_draft(Some("{broken")).cloned();
        assert_eq!(kept, Some(draft));
    }

    #[tokio::test]
    async fn test_refresh_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "id": "u1", "plan": "pro" }])),
            )
            .mount(&server)
            .await;

        let config = SupabaseConfig::new().with_credentials(server.uri(), "anon");
        let client = SupabaseClient::new(reqwest::Client::new(), &config).unwrap();

        let mut context = AppContext::new(Config::new().with_supabase(config));
        assert!(context.refresh_profile(&client).await.is_none());

        context.set_session(session("u1"));
        let profile = context.refresh_profile(&client).await.cloned().unwrap();
        assert_eq!(profile.plan_or_free(), "pro");
    }
}
