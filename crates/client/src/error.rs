//! Client-side failure taxonomy.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Backend URL is not configured. Set client.backend_url or LENGTHWISE_BACKEND_URL.")]
    NotConfigured,

    /// The health probe failed; no rewrite was attempted.
    #[error("Cannot connect to the server. Please try again later. ({0})")]
    Unreachable(String),

    /// The gateway answered with a failure body.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        draft: Option<String>,
        /// Subject line of a rejected email draft.
        subject: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode gateway response: {0}")]
    Decode(String),
}

impl ClientError {
    /// A too-long rejection: 400 with the rejected draft attached.
    pub fn is_too_long(&self) -> bool {
        matches!(
            self,
            ClientError::Rejected {
                status: 400,
                draft: Some(_),
                ..
            }
        )
    }

    /// The rejected draft, if the gateway sent one.
    pub fn draft(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { draft, .. } => draft.as_deref(),
            _ => None,
        }
    }

    pub fn draft_subject(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { subject, .. } => subject.as_deref(),
            _ => None,
        }
    }
}
