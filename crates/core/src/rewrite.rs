//! Rewrite request/result value objects.
//!
//! All of these are request-scoped: built when a rewrite starts and
//! dropped once the caller has the answer.

use serde::{Deserialize, Serialize};

use crate::text::{MIN_TARGET_WORDS, count_words};

/// Kind of document being rewritten.
///
/// Only `Email` changes behavior (subject line handling). Every other
/// name is carried verbatim into the model instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    Email,
    Other(String),
}

impl DocumentType {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentType::Email => "email",
            DocumentType::Other(name) => name,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, DocumentType::Email)
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Other("text".into())
    }
}

impl From<String> for DocumentType {
    fn from(name: String) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("email") {
            DocumentType::Email
        } else if trimmed.is_empty() {
            DocumentType::default()
        } else {
            DocumentType::Other(trimmed.to_string())
        }
    }
}

impl From<&str> for DocumentType {
    fn from(name: &str) -> Self {
        DocumentType::from(name.to_string())
    }
}

impl From<DocumentType> for String {
    fn from(doc: DocumentType) -> Self {
        doc.as_str().to_string()
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form description of the desired register, embedded verbatim in
/// the model instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneDescriptor(pub String);

impl ToneDescriptor {
    /// Tone used when the caller sends none.
    pub const DEFAULT: &'static str = "professional";

    pub fn new(tone: impl Into<String>) -> Self {
        let tone = tone.into();
        if tone.trim().is_empty() {
            Self(Self::DEFAULT.into())
        } else {
            Self(tone)
        }
    }

    /// Compose a tone label with persona attributes.
    pub fn with_persona(tone: &str, persona: &Persona) -> Self {
        Self::new(persona.describe(tone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ToneDescriptor {
    fn default() -> Self {
        Self(Self::DEFAULT.into())
    }
}

impl std::fmt::Display for ToneDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writing persona attributes folded into the tone descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub style: String,
    pub formality: String,
    pub context: String,
    pub traits: Vec<String>,
}

impl Persona {
    /// `"{tone} with {style} style, {formality} formality, in a {context} context, emphasizing {traits}"`.
    pub fn describe(&self, tone: &str) -> String {
        format!(
            "{tone} with {} style, {} formality, in a {} context, emphasizing {}",
            self.style,
            self.formality,
            self.context,
            self.traits.join(", ")
        )
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            style: "clear".into(),
            formality: "moderate".into(),
            context: "business".into(),
            traits: vec!["clarity".into(), "brevity".into()],
        }
    }
}

/// Named length choices offered alongside free resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreset {
    /// Half the source length.
    Concise,
    /// Same length as the source.
    #[default]
    Balanced,
    /// One and a half times the source length.
    Detailed,
}

impl LengthPreset {
    /// Target words for `source` under this preset, rounding half-up.
    pub fn target_words(self, source: &str) -> u32 {
        let current = u32::try_from(count_words(source)).unwrap_or(u32::MAX);
        match self {
            LengthPreset::Concise => current.div_ceil(2).max(MIN_TARGET_WORDS),
            LengthPreset::Balanced => current,
            LengthPreset::Detailed => {
                (current.saturating_mul(3).saturating_add(1) / 2).max(MIN_TARGET_WORDS)
            }
        }
    }
}

impl std::str::FromStr for LengthPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "concise" | "short" => Ok(LengthPreset::Concise),
            "balanced" | "same" => Ok(LengthPreset::Balanced),
            "detailed" | "long" => Ok(LengthPreset::Detailed),
            other => Err(format!(
                "Unknown length preset '{other}'. Use 'concise', 'balanced', or 'detailed'."
            )),
        }
    }
}

/// One rewrite to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub content: String,
    pub tone: ToneDescriptor,
    pub target_words: u32,
    #[serde(default)]
    pub document_type: DocumentType,
}

impl RewriteRequest {
    pub fn new(
        content: impl Into<String>,
        tone: ToneDescriptor,
        target_words: u32,
        document_type: DocumentType,
    ) -> Self {
        Self {
            content: content.into(),
            tone,
            target_words,
            document_type,
        }
    }

    /// Word count of the source content.
    pub fn current_words(&self) -> usize {
        count_words(&self.content)
    }
}

/// An accepted rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Words in `body` only; the subject never counts.
    pub word_count: usize,
}
