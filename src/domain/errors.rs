use thiserror::Error;

/// Marker the backend embeds in authentication failure messages; any error
/// carrying it forces a logout regardless of which call produced it.
pub const AUTH_REQUIRED_MARKER: &str = "Authentication required";

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Authentication required")]
    AuthRequired,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl DomainError {
    /// True when this error must terminate the session: a 401 from any
    /// endpoint, or a server message carrying the auth marker.
    pub fn is_auth_required(&self) -> bool {
        match self {
            DomainError::AuthRequired => true,
            DomainError::Forbidden(msg)
            | DomainError::NotFound(msg)
            | DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::Transport(msg) => msg.contains(AUTH_REQUIRED_MARKER),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_variant_is_auth_required() {
        assert!(DomainError::AuthRequired.is_auth_required());
    }

    #[test]
    fn marker_in_message_is_auth_required() {
        let err = DomainError::Transport("Authentication required - no token".to_string());
        assert!(err.is_auth_required());
    }

    #[test]
    fn ordinary_errors_are_not_auth() {
        assert!(!DomainError::NotFound("Booking 9 not found".to_string()).is_auth_required());
        assert!(!DomainError::Transport("connection reset".to_string()).is_auth_required());
    }
}
