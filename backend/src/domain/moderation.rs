//! Moderation reply previews.
//!
//! A preview drafts the reply an automated moderation workflow would post
//! for a customer message, so tenants can tune the tone before deploying.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tone used when the caller supplies none.
pub const DEFAULT_TONE: &str = "Professional and Empathetic";
/// Maximum customer message length in characters.
pub const MESSAGE_MAX: usize = 4_000;

/// Validation errors for moderation requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationValidationError {
    /// Message was blank.
    #[error("message must not be empty")]
    EmptyMessage,
    /// Message exceeded [`MESSAGE_MAX`] characters.
    #[error("message must be at most {max} characters")]
    MessageTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Sentiment label was not recognised.
    #[error("unknown sentiment: {0}")]
    UnknownSentiment(String),
}

/// Sentiment detected in a customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// Happy or appreciative message.
    Positive,
    /// Complaint or frustration.
    Negative,
    /// Anything else.
    Neutral,
}

impl Sentiment {
    /// Every label, in the order offered to the completion model.
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ModerationValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ModerationValidationError::UnknownSentiment(raw.to_owned()))
    }
}

/// Validated preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequest {
    message: String,
    tone: String,
}

impl ModerationRequest {
    /// Validate a message and optional tone.
    pub fn try_new(message: &str, tone: Option<&str>) -> Result<Self, ModerationValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ModerationValidationError::EmptyMessage);
        }
        if message.chars().count() > MESSAGE_MAX {
            return Err(ModerationValidationError::MessageTooLong { max: MESSAGE_MAX });
        }
        let tone = tone
            .map(str::trim)
            .filter(|tone| !tone.is_empty())
            .unwrap_or(DEFAULT_TONE);
        Ok(Self {
            message: message.to_owned(),
            tone: tone.to_owned(),
        })
    }

    /// Customer message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Desired reply tone.
    pub fn tone(&self) -> &str {
        &self.tone
    }

    /// Render the completion prompt.
    pub fn prompt(&self) -> String {
        format!(
            "You are a social media moderation AI for a business.\n\
             The business uses an automation workflow to auto-reply to customers.\n\
             \n\
             Customer Message: \"{message}\"\n\
             Desired Tone: {tone}\n\
             \n\
             Task:\n\
             1. Analyze the sentiment of the message.\n\
             2. Draft a response that answers the user or acknowledges their concern based on the desired tone.\n\
             3. Explain why you chose this response.\n",
            message = self.message,
            tone = self.tone,
        )
    }
}

/// Structured preview returned by the completion model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPreview {
    /// Detected sentiment.
    pub sentiment: Sentiment,
    /// Drafted reply.
    pub suggested_reply: String,
    /// Why the reply was chosen.
    pub reasoning: String,
}
