//! Model instruction construction.
//!
//! The system prompt sets a ceiling (the validator enforces
//! `ceil(target * 1.1)`), while the user content asks for the exact target
//! so the model aims at the number instead of merely staying under it.

use lengthwise_core::message::Message;
use lengthwise_core::rewrite::RewriteRequest;
use serde::Serialize;

/// The two halves of a rewrite instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInstruction {
    pub system: String,
    pub user: String,
}

impl ModelInstruction {
    /// System message first, then user message.
    pub fn into_messages(self) -> Vec<Message> {
        vec![Message::system(self.system), Message::user(self.user)]
    }
}

/// Which way the rewrite moves the length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteAction {
    Expand,
    Shorten,
}

impl RewriteAction {
    /// Expand only when the target is above the current count.
    pub fn for_counts(current_words: usize, target_words: u32) -> Self {
        if target_words as usize > current_words {
            RewriteAction::Expand
        } else {
            RewriteAction::Shorten
        }
    }

    pub fn as_upper(self) -> &'static str {
        match self {
            RewriteAction::Expand => "EXPAND",
            RewriteAction::Shorten => "SHORTEN",
        }
    }
}

/// Builds the system prompt and user content for one rewrite.
pub struct RewriteRequestBuilder;

impl RewriteRequestBuilder {
    pub fn build(request: &RewriteRequest) -> ModelInstruction {
        ModelInstruction {
            system: Self::system_prompt(request),
            user: Self::user_content(request),
        }
    }

    fn system_prompt(request: &RewriteRequest) -> String {
        let target = request.target_words;
        let doc = request.document_type.as_str();
        let tone = request.tone.as_str();
        let format = if request.document_type.is_email() {
            "Subject: [Your subject]\n\n[Your rewritten content]"
        } else {
            "[Your rewritten content]"
        };

        format!(
            "You are a writing assistant that rewrites text to a requested length.

CRITICAL INSTRUCTIONS:
1. Your output MUST NOT exceed {target} words
2. Being shorter than {target} words is acceptable if it maintains clarity
3. These each count as ONE word: \"Hello-world\", \"AI\", \"don't\", \"2024\", \"a\"
4. For emails, the \"Subject:\" line is NOT counted in the word limit
5. Focus on being clear and concise

Your task: Rewrite the following {doc} in {tone} tone, aiming for {target} words or fewer.

Format your response as:
{format}"
        )
    }

    fn user_content(request: &RewriteRequest) -> String {
        let target = request.target_words;
        let current = request.current_words();
        let action = RewriteAction::for_counts(current, target).as_upper();
        let tone = request.tone.as_str();
        let content = request.content.trim();
        let below = target.saturating_sub(1);
        let above = target.saturating_add(1);

        format!(
            "CRITICAL WORD COUNT REQUIREMENT: {target} WORDS EXACTLY

Current text ({current} words):
{content}

STRICT REQUIREMENTS:
1. Your response MUST be EXACTLY {target} words
2. Not {below} words
3. Not {above} words
4. EXACTLY {target} words

Word counting rules (these are exact, do not deviate):
- \"don't\" = ONE word
- \"2024\" = ONE word
- \"state-of-the-art\" = ONE word
- \"AI\" = ONE word
- \"high school\" = TWO words
- \"New York City\" = THREE words

Required action: {action} from {current} to {target} words

FORMAT:
- Plain text only
- No markdown
- No bullet points
- No numbered lists
- Natural paragraphs only

Tone: {tone}

REMEMBER: Count your words carefully. The output MUST be EXACTLY {target} words."
        )
    }
}
