// crates/mailtriage-server/src/analysis/fallback.rs
// Deterministic keyword classifier used whenever the model result is unusable

use mailtriage_types::{
    AiStatus, Category, ClassificationRecord, CustomerMood, Priority, Sentiment,
};

/// Keyword group and the value it selects. Groups are checked in order; first hit wins.
type Rule<T> = (&'static [&'static str], T);

const CATEGORY_RULES: &[Rule<Category>] = &[
    (&["bug", "error", "crash", "broken", "fix"], Category::BugReport),
    (&["feature", "add", "request", "want", "need"], Category::FeatureRequest),
    (&["payment", "billing", "charge", "subscription", "refund"], Category::Billing),
    (&["technical", "install", "setup", "config"], Category::TechnicalSupport),
];

const PRIORITY_RULES: &[Rule<Priority>] = &[
    (&["urgent", "asap", "critical", "emergency"], Priority::High),
    (&["important", "soon"], Priority::Medium),
];

const SENTIMENT_RULES: &[Rule<(Sentiment, CustomerMood)>] = &[
    (&["frustrated", "angry", "annoyed", "terrible"], (Sentiment::Negative, CustomerMood::Frustrated)),
    (&["happy", "great", "thank", "appreciate"], (Sentiment::Positive, CustomerMood::Happy)),
];

/// Substring match, so "add" also hits "address" and "thank" hits "thanks"
fn first_match<T: Copy>(text: &str, rules: &[Rule<T>], default: T) -> T {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

/// Classify an email from keywords alone. Total, pure and deterministic.
///
/// Never yields `Priority::Critical`; only the upstream model can.
pub fn fallback(subject: &str, body: &str) -> ClassificationRecord {
    let text = format!("{} {}", subject, body).to_lowercase();

    let category = first_match(&text, CATEGORY_RULES, Category::General);
    let priority = first_match(&text, PRIORITY_RULES, Priority::Low);
    let (sentiment, customer_mood) =
        first_match(&text, SENTIMENT_RULES, (Sentiment::Neutral, CustomerMood::Neutral));

    let label = category.label();

    ClassificationRecord {
        category,
        priority,
        sentiment,
        summary: format!("Customer inquiry about {}", label),
        key_points: vec![
            format!("Category: {}", label),
            format!("Priority: {}", priority),
        ],
        suggested_response: format!(
            "Thank you for contacting our support team. We understand your concern regarding {}. \
             Our team will review your request and get back to you within 24 hours.",
            label
        ),
        detected_issues: vec![category.to_string()],
        customer_mood,
        ai_status: Some(AiStatus::MockMode),
    }
}
