//! @ai:module:intent Validate idea submissions and contact messages
//! @ai:module:layer domain
//! @ai:module:public_api IdeaSubmission, ContactMessage, ValidationErrors, validate_submission, validate_contact, is_valid_email
//! @ai:module:stateless true

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Minimum number of words an idea needs for a meaningful evaluation
pub const MIN_IDEA_WORDS: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// @ai:intent A submitted idea awaiting evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaSubmission {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "idea", default)]
    pub idea_text: String,
}

/// @ai:intent A message for the site owner from the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// @ai:intent Topic families an idea must touch on, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordFamily {
    TargetAudience,
    Revenue,
    Market,
    Competition,
}

impl KeywordFamily {
    pub const ALL: [KeywordFamily; 4] = [
        KeywordFamily::TargetAudience,
        KeywordFamily::Revenue,
        KeywordFamily::Market,
        KeywordFamily::Competition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KeywordFamily::TargetAudience => "target audience",
            KeywordFamily::Revenue => "revenue",
            KeywordFamily::Market => "market",
            KeywordFamily::Competition => "competition",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordFamily::TargetAudience => &["target", "audience", "user"],
            KeywordFamily::Revenue => &["revenue", "price", "subscription"],
            KeywordFamily::Market => &["market"],
            KeywordFamily::Competition => &["competition", "competitor"],
        }
    }

    /// @ai:intent Check whether lowercased text mentions any keyword of this family
    /// @ai:pre text is already lowercased
    /// @ai:effects pure
    fn is_covered_by(&self, text: &str) -> bool {
        self.keywords().iter().any(|kw| text.contains(kw))
    }
}

/// @ai:intent Field name to human-readable message; empty when valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// @ai:intent Convert to Err when any field failed
    /// @ai:effects pure
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// @ai:intent Check an address against a permissive email shape
/// @ai:effects pure
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// @ai:intent Count whitespace-separated words
/// @ai:effects pure
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// @ai:intent List the keyword families an idea does not mention, in stable order
/// @ai:effects pure
pub fn missing_families(idea: &str) -> Vec<KeywordFamily> {
    let lower = idea.to_lowercase();
    KeywordFamily::ALL
        .into_iter()
        .filter(|family| !family.is_covered_by(&lower))
        .collect()
}

/// @ai:intent Validate an idea submission
/// @ai:post result is empty iff email is well formed, idea has >= 100 words and covers all four families
/// @ai:effects pure
pub fn validate_submission(email: &str, idea: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }

    if word_count(idea) < MIN_IDEA_WORDS {
        errors.insert(
            "idea",
            format!("Please enter at least {MIN_IDEA_WORDS} words for a thorough analysis"),
        );
    } else {
        let missing = missing_families(idea);
        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join(", ");
            errors.insert("idea", format!("Consider including information about: {names}"));
        }
    }

    errors
}

/// @ai:intent Validate a contact form message
/// @ai:effects pure
pub fn validate_contact(email: &str, message: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }
    if message.trim().is_empty() {
        errors.insert("message", "Please enter a message");
    }

    errors
}

impl IdeaSubmission {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_submission(&self.email, &self.idea_text).into_result()
    }
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_contact(&self.email, &self.message).into_result()
    }
}
