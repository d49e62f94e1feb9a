//! Parsing helpers for generative-model replies
//!
//! Models are instructed to reply with a JSON array of strings but often wrap
//! the payload in Markdown code fences. These helpers strip the decoration and
//! parse the array.

use regex::Regex;

use crate::error::{Error, Result};

/// Remove Markdown code-fence decoration (``` or ```json) and trim
pub fn strip_code_fences(text: &str) -> String {
    // Compiled per call; reply parsing happens once per report
    let fence = Regex::new(r"```(?:json)?\n?").expect("static fence regex");
    fence.replace_all(text, "").trim().to_string()
}

/// Parse a model reply into a list of insight strings
pub fn parse_insight_list(text: &str) -> Result<Vec<String>> {
    let cleaned = strip_code_fences(text);

    let insights: Vec<String> = serde_json::from_str(&cleaned).map_err(|e| {
        // Truncate on a char boundary; replies are arbitrary UTF-8
        let truncated = match cleaned.char_indices().nth(200) {
            Some((idx, _)) => format!("{}...", &cleaned[..idx]),
            None => cleaned.clone(),
        };
        Error::Insight(format!(
            "Invalid insight JSON from model: {} | Raw: {}",
            e, truncated
        ))
    })?;

    if insights.is_empty() {
        return Err(Error::Insight("Model returned an empty insight list".into()));
    }

    Ok(insights)
}
