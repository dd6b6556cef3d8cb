use serde::Deserialize;

use crate::domain::entities::AgentCandidate;
use crate::domain::errors::{DomainError, DomainResult};

/// Standard `{success, data}` response envelope used by most endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> DomainResult<T> {
        if self.success {
            self.data.ok_or_else(|| {
                DomainError::Transport("response envelope missing data".to_string())
            })
        } else {
            Err(DomainError::Validation(self.failure_message()))
        }
    }

    fn failure_message(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "request failed".to_string())
    }
}

/// Bodyless acknowledgement (delete, disposition save).
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Ack {
    pub fn into_result(self) -> DomainResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(DomainError::Validation(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

/// The search endpoint has shipped both a bare array and the wrapped
/// envelope. Both decode here; anything else is an error rather than an
/// empty result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped {
        success: bool,
        #[serde(default)]
        data: Option<Vec<AgentCandidate>>,
        #[serde(default)]
        error: Option<String>,
    },
    Bare(Vec<AgentCandidate>),
}

impl SearchResponse {
    pub fn into_candidates(self) -> DomainResult<Vec<AgentCandidate>> {
        match self {
            SearchResponse::Bare(candidates) => Ok(candidates),
            SearchResponse::Wrapped {
                success: true,
                data: Some(candidates),
                ..
            } => Ok(candidates),
            SearchResponse::Wrapped {
                success: true,
                data: None,
                ..
            } => Err(DomainError::Transport(
                "search envelope missing data".to_string(),
            )),
            SearchResponse::Wrapped { error, .. } => Err(DomainError::Validation(
                error.unwrap_or_else(|| "agent search failed".to_string()),
            )),
        }
    }
}
