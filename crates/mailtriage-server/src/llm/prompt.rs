// crates/mailtriage-server/src/llm/prompt.rs
// Fixed classification prompt

use super::Message;

const SYSTEM_PROMPT: &str = "You are a support email analyzer. Always return valid JSON only.";

/// Schema block shown to the model; allowed values mirror the record enums
const SCHEMA_TEMPLATE: &str = r#"Return ONLY valid JSON with these fields:
{
    "category": "bug_report|feature_request|billing|general|technical_support",
    "priority": "critical|high|medium|low",
    "sentiment": "positive|neutral|negative",
    "summary": "one line summary",
    "key_points": ["point1", "point2"],
    "suggested_response": "a helpful response to the customer",
    "needs_human": true/false,
    "detected_issues": ["issue1", "issue2"],
    "customer_mood": "angry|frustrated|neutral|happy|urgent"
}"#;

/// Sampling temperature for classification (low: favor schema-following output)
pub const CLASSIFY_TEMPERATURE: f32 = 0.3;
/// Output cap for classification responses
pub const CLASSIFY_MAX_TOKENS: u32 = 500;

/// User prompt with subject and body embedded verbatim
pub fn classification_prompt(subject: &str, body: &str) -> String {
    format!(
        "Analyze this customer support email and return a JSON response:\n\n\
         Subject: {}\n\
         Body: {}\n\n\
         {}",
        subject, body, SCHEMA_TEMPLATE
    )
}

/// System + user messages for one classification call
pub fn classification_messages(subject: &str, body: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(classification_prompt(subject, body)),
    ]
}

/// Minimal request used to check connectivity and credentials
pub fn probe_messages() -> Vec<Message> {
    vec![Message::user("Say 'API Working' in JSON format")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_email_verbatim() {
        let prompt = classification_prompt("Refund {now}", "Line one\n\"quoted\" line two");
        assert!(prompt.contains("Subject: Refund {now}\n"));
        assert!(prompt.contains("Body: Line one\n\"quoted\" line two\n"));
    }

    #[test]
    fn test_prompt_lists_allowed_values() {
        let prompt = classification_prompt("", "");
        assert!(prompt.contains("bug_report|feature_request|billing|general|technical_support"));
        assert!(prompt.contains("critical|high|medium|low"));
        assert!(prompt.contains("angry|frustrated|neutral|happy|urgent"));
    }

    #[test]
    fn test_messages_shape() {
        let messages = classification_messages("s", "b");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
    }
}
