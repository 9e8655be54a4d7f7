use serde::{Deserialize, Serialize};

/// Draft snapshot kept by the browser under `virathumb_draft_project`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftProject {
    #[serde(default)]
    pub current_image: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl DraftProject {
    pub const STORAGE_KEY: &'static str = "virathumb_draft_project";

    /// Parse-or-ignore: anything that is not a JSON object yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<DraftProject>(raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                log::debug!("Ignoring unreadable draft snapshot: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
