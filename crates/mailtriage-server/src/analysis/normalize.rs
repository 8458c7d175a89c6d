// crates/mailtriage-server/src/analysis/normalize.rs
// Model output -> validated ClassificationRecord, backfilling field by field

use mailtriage_types::{ClassificationRecord, parse_label, single_line};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::AnalysisError;
use super::fallback::fallback;
use super::fences::strip_code_fences;

/// A model-derived record plus the names of fields taken from the fallback
#[derive(Debug, Clone)]
pub struct Normalized {
    pub record: ClassificationRecord,
    pub backfilled: Vec<&'static str>,
}

/// Fallback record computed on first use, at most once per response
struct Backfill<'a> {
    subject: &'a str,
    body: &'a str,
    record: Option<ClassificationRecord>,
    used: Vec<&'static str>,
}

impl<'a> Backfill<'a> {
    fn new(subject: &'a str, body: &'a str) -> Self {
        Self {
            subject,
            body,
            record: None,
            used: Vec::new(),
        }
    }

    fn take(&mut self, field: &'static str) -> &ClassificationRecord {
        self.used.push(field);
        let (subject, body) = (self.subject, self.body);
        self.record.get_or_insert_with(|| fallback(subject, body))
    }
}

/// Enum field; absent, non-string and unknown labels all count as missing
fn label_field<T: FromStr>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)?.as_str().and_then(parse_label)
}

/// One-line text field; empty counts as missing
fn line_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    let text = single_line(map.get(key)?.as_str()?);
    (!text.is_empty()).then_some(text)
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    let text = map.get(key)?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// String list; a bare string becomes a one-item list, anything else is empty
fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    let keep = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).filter_map(keep).collect(),
        Some(Value::String(s)) => keep(s.as_str()).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Parse raw model text into a record.
///
/// Errors only when the text is not a JSON object; individual bad fields are
/// replaced from the keyword fallback for the same email.
pub fn normalize_response(raw: &str, subject: &str, body: &str) -> Result<Normalized, AnalysisError> {
    let cleaned = strip_code_fences(raw);
    let Value::Object(map) = serde_json::from_str::<Value>(cleaned)? else {
        return Err(AnalysisError::NotAnObject);
    };

    let mut backfill = Backfill::new(subject, body);

    let category = match label_field(&map, "category") {
        Some(v) => v,
        None => backfill.take("category").category,
    };
    let priority = match label_field(&map, "priority") {
        Some(v) => v,
        None => backfill.take("priority").priority,
    };
    let sentiment = match label_field(&map, "sentiment") {
        Some(v) => v,
        None => backfill.take("sentiment").sentiment,
    };
    let summary = match line_field(&map, "summary") {
        Some(v) => v,
        None => backfill.take("summary").summary.clone(),
    };
    let suggested_response = match text_field(&map, "suggested_response") {
        Some(v) => v,
        None => backfill.take("suggested_response").suggested_response.clone(),
    };
    let customer_mood = match label_field(&map, "customer_mood") {
        Some(v) => v,
        None => backfill.take("customer_mood").customer_mood,
    };

    let record = ClassificationRecord {
        category,
        priority,
        sentiment,
        summary,
        key_points: list_field(&map, "key_points"),
        suggested_response,
        detected_issues: list_field(&map, "detected_issues"),
        customer_mood,
        ai_status: None,
    };

    Ok(Normalized {
        record,
        backfilled: backfill.used,
    })
}
