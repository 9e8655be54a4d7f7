use serde::{Deserialize, Serialize};

const DEFAULT_VIRAL_SCORE: u32 = 75;
const DEFAULT_SAFETY_SCORE: u32 = 90;
const DEFAULT_SIMPLICITY_INDEX: u32 = 80;

/// One finding of a thumbnail audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditAlert {
    /// `error`, `warning` or `success`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
}

/// Scores and alerts for an uploaded thumbnail, each score in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailAudit {
    pub viral_score: u32,
    pub safety_score: u32,
    pub simplicity_index: u32,
    pub feedback: String,
    pub alerts: Vec<AuditAlert>,
}

impl Default for ThumbnailAudit {
    fn default() -> Self {
        Self {
            viral_score: DEFAULT_VIRAL_SCORE,
            safety_score: DEFAULT_SAFETY_SCORE,
            simplicity_index: DEFAULT_SIMPLICITY_INDEX,
            feedback: String::new(),
            alerts: Vec::new(),
        }
    }
}

/// The model's answer as sent; absent or zero scores fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAudit {
    #[serde(default)]
    viral_score: Option<f64>,
    #[serde(default)]
    safety_score: Option<f64>,
    #[serde(default)]
    simplicity_index: Option<f64>,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    alerts: Option<Vec<AuditAlert>>,
}

fn score_or(raw: Option<f64>, default: u32) -> u32 {
    match raw {
        Some(score) if score.is_finite() && score > 0.0 => score.round().min(100.0) as u32,
        _ => default,
    }
}

impl From<RawAudit> for ThumbnailAudit {
    fn from(raw: RawAudit) -> Self {
        Self {
            viral_score: score_or(raw.viral_score, DEFAULT_VIRAL_SCORE),
            safety_score: score_or(raw.safety_score, DEFAULT_SAFETY_SCORE),
            simplicity_index: score_or(raw.simplicity_index, DEFAULT_SIMPLICITY_INDEX),
            feedback: raw.feedback.unwrap_or_default(),
            alerts: raw.alerts.unwrap_or_default(),
        }
    }
}

/// A short headline suggestion for the thumbnail itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualHook {
    #[serde(default)]
    pub text: String,
    /// The word that should be drawn largest.
    #[serde(default)]
    pub emphasis: String,
    /// Emotional impact, `0..=100`.
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_zero_scores_use_defaults() {
        let raw: RawAudit = serde_json::from_str(r#"{"viralScore": 0, "feedback": "ok"}"#).unwrap();
        let audit = ThumbnailAudit::from(raw);
        assert_eq!(audit.viral_score, 75);
        assert_eq!(audit.safety_score, 90);
        assert_eq!(audit.simplicity_index, 80);
        assert_eq!(audit.feedback, "ok");
        assert!(audit.alerts.is_empty());
    }

    #[test]
    fn test_audit_reads_alerts() {
        let raw: RawAudit = serde_json::from_str(
            r#"{"viralScore": 88.6, "safetyScore": 140, "simplicityIndex": 60,
                "alerts": [{"type": "warning", "category": "CAPS", "message": "Texto gritando"}]}"#,
        )
        .unwrap();
        let audit = ThumbnailAudit::from(raw);
        assert_eq!(audit.viral_score, 89);
        assert_eq!(audit.safety_score, 100);
        assert_eq!(audit.simplicity_index, 60);
        assert_eq!(audit.alerts[0].kind, "warning");
        assert_eq!(audit.alerts[0].category, "CAPS");
    }
}
