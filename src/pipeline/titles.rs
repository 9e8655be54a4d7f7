use serde_json::Value;

use crate::{
    error::{Result, ThumbError},
    models::TitlesRequest,
    pipeline::chain::{first_success, Tier},
    providers::TextProvider,
};

pub struct TitleGenerator {
    tiers: Vec<Tier<dyn TextProvider>>,
}

impl TitleGenerator {
    pub fn new(tiers: Vec<Tier<dyn TextProvider>>) -> Self {
        Self { tiers }
    }

    pub fn instruction(request: &TitlesRequest) -> String {
        format!(
            "Generate 5 viral and intriguing YouTube video titles for the topic: \"{}\".\n\
             Language: {}.\n\
             CRITICAL RULES:\n\
             1. 100% correct spelling and flawless grammar in the requested language.\n\
             2. No typos.\n\
             3. Use high-retention hooks.\n\
             4. Return ONLY a JSON array of strings, without markdown.\n\
             Example: [\"Title 1\", \"Title 2\"]",
            request.topic.trim(),
            request.language()
        )
    }

    pub async fn generate(&self, request: &TitlesRequest) -> Result<Vec<String>> {
        if request.topic.trim().is_empty() {
            return Err(ThumbError::RequestError("Topic must not be empty".into()));
        }

        let instruction = Self::instruction(request);
        let instruction: &str = &instruction;

        let outcome = first_success(&self.tiers, move |provider| async move {
            let text = provider.complete(instruction).await?;
            parse_titles(&text)
                .ok_or_else(|| ThumbError::ResponseError("No titles in provider answer".into()))
        })
        .await;

        match outcome.value {
            Some((titles, _)) => Ok(titles),
            None => Err(ThumbError::InternalError(format!(
                "Failed to generate titles after {} attempts",
                outcome.attempts.len()
            ))),
        }
    }
}

/// Reads a list of titles out of free-form model output.
///
/// Code fences are stripped; then the whole text, or failing that the widest
/// `[...]` span, is parsed as a JSON array. Anything else becomes a single title.
/// An array with no usable titles (`[]`, only blanks) yields `None`.
pub fn parse_titles(raw: &str) -> Option<Vec<String>> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(titles) = parse_array(cleaned) {
        return non_empty(titles);
    }

    if let (Some(start), Some(end)) = (cleaned.find('['), cleaned.rfind(']')) {
        if start < end {
            if let Some(titles) = parse_array(&cleaned[start..=end]) {
                return non_empty(titles);
            }
        }
    }

    Some(vec![cleaned.to_string()])
}

/// `None` only when `text` is not a JSON array at all.
fn parse_array(text: &str) -> Option<Vec<String>> {
    let items: Vec<Value> = serde_json::from_str(text).ok()?;
    Some(
        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|title| !title.is_empty())
            .collect(),
    )
}

fn non_empty(titles: Vec<String>) -> Option<Vec<String>> {
    if titles.is_empty() {
        None
    } else {
        Some(titles)
    }
}
