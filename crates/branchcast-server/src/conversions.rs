//! Conversions between domain types and HTTP payloads.

use branchcast_domain::{BranchFeedEntry, BranchVariant, GenerationRecord, ViewEvent};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// `POST /generate` body
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    /// Article URL
    pub url: Option<String>,
    /// Stance, `PRO` or `ANTI`
    #[serde(rename = "type")]
    pub stance: Option<String>,
}

/// `POST /generate` response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Human-readable outcome
    pub message: String,
    /// Id of the stored generation
    pub id: String,
}

/// `POST /view` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBody {
    /// Generation that was viewed
    pub generation_id: Option<String>,
    /// Branch that viewed it
    pub branch_id: Option<String>,
}

/// `POST /view` response
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    /// Always true on success
    pub success: bool,
}

/// Plain `{message}` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message text
    pub message: String,
}

/// One branch's post pair
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairDto {
    /// Branch name
    pub branch_id: String,
    /// Short-form post
    pub short_form: String,
    /// Long-form post
    pub long_form: String,
}

/// One recorded view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDto {
    /// Branch that viewed the generation
    pub branch_id: String,
    /// RFC 3339 timestamp
    pub viewed_at: String,
}

/// A full generation record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationDto {
    /// Generation id
    pub id: String,
    /// Source article
    pub article_url: String,
    /// Stance, `PRO` or `ANTI`
    #[serde(rename = "type")]
    pub stance: String,
    /// RFC 3339 creation timestamp
    pub timestamp_generated: String,
    /// Variants in registry order
    pub pairs: Vec<PairDto>,
    /// Views in append order
    pub views: Vec<ViewDto>,
    /// Number of views
    pub view_count: usize,
}

/// One entry of a branch feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntryDto {
    /// Generation id
    pub id: String,
    /// Source article
    pub article_url: String,
    /// Stance, `PRO` or `ANTI`
    #[serde(rename = "type")]
    pub stance: String,
    /// RFC 3339 creation timestamp
    pub timestamp: String,
    /// The branch's own pair
    pub pair: PairDto,
}

/// Format milliseconds since the Unix epoch as RFC 3339 (UTC)
pub fn rfc3339(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

impl From<&BranchVariant> for PairDto {
    fn from(v: &BranchVariant) -> Self {
        Self {
            branch_id: v.branch_id().as_str().to_string(),
            short_form: v.short_form().to_string(),
            long_form: v.long_form().to_string(),
        }
    }
}

impl From<&ViewEvent> for ViewDto {
    fn from(v: &ViewEvent) -> Self {
        Self {
            branch_id: v.branch_id.as_str().to_string(),
            viewed_at: rfc3339(v.viewed_at),
        }
    }
}

impl From<&GenerationRecord> for GenerationDto {
    fn from(r: &GenerationRecord) -> Self {
        Self {
            id: r.id.to_string(),
            article_url: r.source_url.clone(),
            stance: r.stance.as_str().to_string(),
            timestamp_generated: rfc3339(r.created_at),
            pairs: r.variants.iter().map(PairDto::from).collect(),
            views: r.views.iter().map(ViewDto::from).collect(),
            view_count: r.views.len(),
        }
    }
}

impl From<&BranchFeedEntry> for FeedEntryDto {
    fn from(e: &BranchFeedEntry) -> Self {
        Self {
            id: e.id.to_string(),
            article_url: e.source_url.clone(),
            stance: e.stance.as_str().to_string(),
            timestamp: rfc3339(e.created_at),
            pair: PairDto::from(&e.variant),
        }
    }
}

/// Render a generation as CSV: `Branch,Long Form,Short Form`
pub fn generation_csv(record: &GenerationRecord) -> String {
    let mut out = String::from("Branch,Long Form,Short Form\r\n");
    for v in &record.variants {
        out.push_str(&csv_field(v.branch_id().as_str()));
        out.push(',');
        out.push_str(&csv_field(v.long_form()));
        out.push(',');
        out.push_str(&csv_field(v.short_form()));
        out.push_str("\r\n");
    }
    out
}

/// Quote a field when it holds a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchcast_domain::{BranchId, GenerationId, Stance};

    fn record() -> GenerationRecord {
        GenerationRecord {
            id: GenerationId::new(),
            source_url: "https://news.example/a".to_string(),
            stance: Stance::Oppose,
            created_at: 1_700_000_000_123,
            variants: vec![
                BranchVariant::new(BranchId::new("CABANG - A"), "Short, sharp", "Line one.\nLine \"two\".", 280)
                    .unwrap(),
                BranchVariant::new(BranchId::new("CABANG - B"), "plain", "plain long", 280).unwrap(),
            ],
            views: vec![ViewEvent {
                branch_id: BranchId::new("CABANG - B"),
                viewed_at: 1_700_000_100_000,
            }],
        }
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(rfc3339(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
        assert_eq!(rfc3339(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_generation_json_shape() {
        let json = serde_json::to_value(GenerationDto::from(&record())).unwrap();
        assert_eq!(json["articleUrl"], "https://news.example/a");
        assert_eq!(json["type"], "ANTI");
        assert_eq!(json["timestampGenerated"], "2023-11-14T22:13:20.123Z");
        assert_eq!(json["pairs"][0]["branchId"], "CABANG - A");
        assert_eq!(json["pairs"][1]["shortForm"], "plain");
        assert_eq!(json["views"][0]["branchId"], "CABANG - B");
        assert_eq!(json["viewCount"], 1);
    }

    #[test]
    fn test_feed_entry_json_shape() {
        let r = record();
        let entry = r.feed_entry_for(&BranchId::new("cabang - b")).unwrap();
        let json = serde_json::to_value(FeedEntryDto::from(&entry)).unwrap();
        assert_eq!(json["id"], r.id.to_string());
        assert_eq!(json["type"], "ANTI");
        assert_eq!(json["pair"]["longForm"], "plain long");
        assert!(json.get("pairs").is_none());
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let csv = generation_csv(&record());
        let expected = "Branch,Long Form,Short Form\r\n\
                        CABANG - A,\"Line one.\nLine \"\"two\"\".\",\"Short, sharp\"\r\n\
                        CABANG - B,plain long,plain\r\n";
        assert_eq!(csv, expected);
    }
}
