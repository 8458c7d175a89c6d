// crates/mailtriage-types/src/lib.rs
// Shared types for mailtriage (classification records, stored emails, HTTP envelopes)
// No native-only dependencies allowed here

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ═══════════════════════════════════════
// CLASSIFICATION ENUMS
// ═══════════════════════════════════════

/// Support ticket category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    BugReport,
    FeatureRequest,
    Billing,
    General,
    TechnicalSupport,
}

impl Category {
    /// Human-readable label ("bug_report" -> "bug report")
    pub fn label(&self) -> String {
        self.as_ref().replace('_', " ")
    }
}

/// Ticket priority. `Critical` is only ever produced by the upstream model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Whether a ticket at this priority must be routed to a person
    pub fn requires_human(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CustomerMood {
    Angry,
    Frustrated,
    Neutral,
    Happy,
    Urgent,
}

/// Marker for records that did not come from the upstream model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AiStatus {
    MockMode,
}

/// Parse an enum label leniently: surrounding whitespace and ASCII case are ignored.
pub fn parse_label<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Collapse every whitespace run (newlines included) into a single space.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ═══════════════════════════════════════
// CLASSIFICATION RECORD
// ═══════════════════════════════════════

/// Normalized classification of one support email.
///
/// `needs_human` is not stored: it is derived from `priority` and emitted on
/// serialization. Any `needs_human` value in incoming JSON is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RecordWire", from = "RecordWire")]
pub struct ClassificationRecord {
    pub category: Category,
    pub priority: Priority,
    pub sentiment: Sentiment,
    /// One-line summary (never empty on records produced by the pipeline)
    pub summary: String,
    pub key_points: Vec<String>,
    pub suggested_response: String,
    pub detected_issues: Vec<String>,
    pub customer_mood: CustomerMood,
    /// Present only on fallback-derived records
    pub ai_status: Option<AiStatus>,
}

impl ClassificationRecord {
    pub fn needs_human(&self) -> bool {
        self.priority.requires_human()
    }

    /// True when the record was produced by the keyword fallback
    pub fn is_fallback(&self) -> bool {
        self.ai_status.is_some()
    }
}

/// Serialized shape of a record, field order matches the public JSON schema
#[derive(Clone, Serialize, Deserialize)]
struct RecordWire {
    category: Category,
    priority: Priority,
    sentiment: Sentiment,
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    suggested_response: String,
    #[serde(default)]
    needs_human: bool,
    #[serde(default)]
    detected_issues: Vec<String>,
    customer_mood: CustomerMood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ai_status: Option<AiStatus>,
}

impl From<ClassificationRecord> for RecordWire {
    fn from(record: ClassificationRecord) -> Self {
        let needs_human = record.needs_human();
        Self {
            category: record.category,
            priority: record.priority,
            sentiment: record.sentiment,
            summary: record.summary,
            key_points: record.key_points,
            suggested_response: record.suggested_response,
            needs_human,
            detected_issues: record.detected_issues,
            customer_mood: record.customer_mood,
            ai_status: record.ai_status,
        }
    }
}

impl From<RecordWire> for ClassificationRecord {
    fn from(wire: RecordWire) -> Self {
        Self {
            category: wire.category,
            priority: wire.priority,
            sentiment: wire.sentiment,
            summary: single_line(&wire.summary),
            key_points: wire.key_points,
            suggested_response: wire.suggested_response,
            detected_issues: wire.detected_issues,
            customer_mood: wire.customer_mood,
            ai_status: wire.ai_status,
        }
    }
}

// ═══════════════════════════════════════
// STORED EMAILS & STATS
// ═══════════════════════════════════════

/// Inbound email exactly as the webhook received it.
///
/// Senders disagree on shapes (`from` may be a string or an address object,
/// `subject` may be null), so the object is kept verbatim and the fields the
/// pipeline needs are read leniently: anything that is not a string counts as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailPayload {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl EmailPayload {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("subject".into(), serde_json::Value::String(subject.into()));
        fields.insert("body".into(), serde_json::Value::String(body.into()));
        Self { fields }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(serde_json::Value::as_str)
    }

    /// Subject line, empty when missing or not a string
    pub fn subject(&self) -> &str {
        self.str_field("subject").unwrap_or_default()
    }

    /// Email body, preferring `body` over `text` (older senders use `text`)
    pub fn content(&self) -> &str {
        self.str_field("body")
            .or_else(|| self.str_field("text"))
            .unwrap_or_default()
    }

    /// Raw value of any received key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for EmailPayload {
    fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }
}

/// An analyzed email held by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEmail {
    pub id: u64,
    /// RFC 3339 receive time
    pub timestamp: String,
    pub original: EmailPayload,
    pub analysis: ClassificationRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }
}

/// Aggregate counts over all stored emails
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailStats {
    pub total_emails: usize,
    pub categories: BTreeMap<Category, usize>,
    pub priorities: BTreeMap<Priority, usize>,
    pub sentiment: SentimentCounts,
}

impl EmailStats {
    pub fn add(&mut self, analysis: &ClassificationRecord) {
        self.total_emails += 1;
        *self.categories.entry(analysis.category).or_default() += 1;
        *self.priorities.entry(analysis.priority).or_default() += 1;
        self.sentiment.add(analysis.sentiment);
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ClassificationRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.add(record);
        }
        stats
    }
}

// ═══════════════════════════════════════
// HTTP ENVELOPES
// ═══════════════════════════════════════

/// Body of `POST /analyze`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: ClassificationRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub data: ProcessedEmail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Landing document served at `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub message: String,
    pub dashboard: String,
    pub endpoints: Vec<String>,
}

/// Outcome of a raw connectivity probe against the completion API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub status_code: u16,
    /// Parsed JSON on success, the raw body as a string otherwise
    pub response: serde_json::Value,
}

impl ProbeReport {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn sample_record() -> ClassificationRecord {
        ClassificationRecord {
            category: Category::Billing,
            priority: Priority::Critical,
            sentiment: Sentiment::Negative,
            summary: "Double charge on invoice".to_string(),
            key_points: vec!["charged twice".to_string()],
            suggested_response: "We are refunding the duplicate charge.".to_string(),
            detected_issues: vec!["duplicate_charge".to_string()],
            customer_mood: CustomerMood::Angry,
            ai_status: None,
        }
    }

    // ============================================================================
    // Enum labels
    // ============================================================================

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(Category::BugReport.to_string(), "bug_report");
        assert_eq!(Category::TechnicalSupport.as_ref(), "technical_support");
        assert_eq!(Priority::Critical.to_string(), "critical");
        assert_eq!(CustomerMood::Urgent.to_string(), "urgent");
        assert_eq!(AiStatus::MockMode.to_string(), "mock_mode");
    }

    #[test]
    fn test_parse_label_is_lenient() {
        assert_eq!(parse_label::<Category>(" Bug_Report \n"), Some(Category::BugReport));
        assert_eq!(parse_label::<Priority>("HIGH"), Some(Priority::High));
        assert_eq!(parse_label::<Sentiment>("neutral"), Some(Sentiment::Neutral));
        assert_eq!(parse_label::<Category>("login_issue"), None);
        assert_eq!(parse_label::<CustomerMood>(""), None);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(Category::FeatureRequest.label(), "feature request");
        assert_eq!(Category::General.label(), "general");
    }

    #[test]
    fn test_requires_human() {
        let flagged: Vec<Priority> = Priority::iter().filter(|p| p.requires_human()).collect();
        assert_eq!(flagged, vec![Priority::Critical, Priority::High]);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  one\ntwo\t\tthree  "), "one two three");
        assert_eq!(single_line(" \n "), "");
    }

    // ============================================================================
    // ClassificationRecord serialization
    // ============================================================================

    #[test]
    fn test_record_serializes_derived_needs_human() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["category"], "billing");
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["needs_human"], true);
        assert_eq!(json["customer_mood"], "angry");
        assert!(json.get("ai_status").is_none());
    }

    #[test]
    fn test_record_serializes_ai_status_when_present() {
        let mut record = sample_record();
        record.priority = Priority::Low;
        record.ai_status = Some(AiStatus::MockMode);
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["ai_status"], "mock_mode");
        assert_eq!(json["needs_human"], false);
    }

    #[test]
    fn test_record_ignores_incoming_needs_human() {
        let json = r#"{
            "category": "general",
            "priority": "low",
            "sentiment": "positive",
            "summary": "Praise\nfor the team",
            "suggested_response": "Thanks!",
            "needs_human": true,
            "customer_mood": "happy"
        }"#;
        let record: ClassificationRecord = serde_json::from_str(json).unwrap();
        assert!(!record.needs_human());
        assert_eq!(record.summary, "Praise for the team");
        assert!(record.key_points.is_empty());
        assert!(!record.is_fallback());
    }

    // ============================================================================
    // EmailPayload
    // ============================================================================

    #[test]
    fn test_payload_prefers_body_over_text() {
        let payload: EmailPayload =
            serde_json::from_str(r#"{"subject": "s", "body": "b", "text": "t"}"#).unwrap();
        assert_eq!(payload.content(), "b");

        let payload: EmailPayload = serde_json::from_str(r#"{"text": "t"}"#).unwrap();
        assert_eq!(payload.content(), "t");
        assert_eq!(payload.subject(), "");

        let payload: EmailPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.content(), "");
    }

    #[test]
    fn test_payload_preserves_unknown_keys() {
        let payload: EmailPayload = serde_json::from_str(
            r#"{"subject": "Hi", "body": "x", "from": "ceo@company.com", "thread_id": 42}"#,
        )
        .unwrap();
        assert_eq!(payload.get("from"), Some(&serde_json::json!("ceo@company.com")));
        assert_eq!(payload.get("thread_id"), Some(&serde_json::json!(42)));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["thread_id"], 42);
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_payload_tolerates_non_string_fields() {
        let raw = serde_json::json!({
            "subject": null,
            "body": {"html": "<p>hi</p>"},
            "text": "plain body",
            "from": {"value": [{"address": "a@b.c", "name": "A"}], "text": "A <a@b.c>"}
        });
        let payload: EmailPayload = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(payload.subject(), "");
        assert_eq!(payload.content(), "plain body");
        // Re-serializes to exactly what was received
        assert_eq!(serde_json::to_value(&payload).unwrap(), raw);
    }

    #[test]
    fn test_payload_rejects_non_object() {
        assert!(serde_json::from_str::<EmailPayload>("[1, 2]").is_err());
    }

    // ============================================================================
    // EmailStats
    // ============================================================================

    #[test]
    fn test_stats_from_records() {
        let a = sample_record();
        let mut b = sample_record();
        b.category = Category::General;
        b.priority = Priority::Low;
        b.sentiment = Sentiment::Positive;

        let stats = EmailStats::from_records([&a, &b, &a]);
        assert_eq!(stats.total_emails, 3);
        assert_eq!(stats.categories[&Category::Billing], 2);
        assert_eq!(stats.categories[&Category::General], 1);
        assert_eq!(stats.priorities[&Priority::Critical], 2);
        assert_eq!(stats.sentiment.negative, 2);
        assert_eq!(stats.sentiment.positive, 1);
        assert_eq!(stats.sentiment.neutral, 0);
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = EmailStats::from_records([&sample_record()]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_emails"], 1);
        assert_eq!(json["categories"]["billing"], 1);
        assert_eq!(json["priorities"]["critical"], 1);
        assert_eq!(json["sentiment"]["neutral"], 0);
    }

    #[test]
    fn test_empty_stats_has_all_sentiments() {
        let json = serde_json::to_value(EmailStats::default()).unwrap();
        assert_eq!(json["total_emails"], 0);
        assert_eq!(json["sentiment"]["positive"], 0);
        assert!(json["categories"].as_object().unwrap().is_empty());
    }
}
