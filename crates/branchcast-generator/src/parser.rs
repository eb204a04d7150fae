//! Decode LLM output into a branch variant

use crate::error::GenerationError;
use branchcast_domain::{BranchId, BranchVariant, VariantError};
use serde::Deserialize;
use tracing::warn;

/// Shape the model is asked to return
#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawVariant {
    short_form: String,
    long_form: String,
}

/// Decode a raw model response into a validated variant.
///
/// Strips code fences, then requires a JSON object with exactly the
/// `shortForm` and `longForm` string fields. Empty fields and a short form
/// over `short_form_max_chars` are rejected, never repaired.
pub fn decode_variant(
    response: &str,
    branch: &BranchId,
    short_form_max_chars: usize,
) -> Result<BranchVariant, GenerationError> {
    let json_str = extract_json(response)?;

    let raw: RawVariant = serde_json::from_str(json_str).map_err(|e| {
        warn!("Undecodable response for '{}': {}", branch, e);
        GenerationError::InvalidFormat(format!("JSON parse error: {}", e))
    })?;

    BranchVariant::new(branch.clone(), raw.short_form, raw.long_form, short_form_max_chars)
        .map_err(|e| match e {
            VariantError::ShortFormTooLong { len, max } => {
                GenerationError::ShortFormTooLong { len, max }
            }
            other => GenerationError::InvalidFormat(other.to_string()),
        })
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, GenerationError> {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return Ok(trimmed);
    };

    // Opening fence may carry a language tag ("```json")
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.strip_suffix("```").unwrap_or(rest).trim();

    if rest.is_empty() {
        return Err(GenerationError::InvalidFormat("Empty code block".to_string()));
    }

    Ok(rest)
}
