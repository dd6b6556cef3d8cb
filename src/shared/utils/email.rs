use crate::domain::errors::{DomainError, DomainResult};

/// Validate a customer email before submission and normalize it for the
/// creation payload.
pub fn validate_and_normalize_email(email: &str) -> DomainResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(DomainError::Validation(
            "Invalid email format. Must be in format user@domain.tld".to_string(),
        ));
    }

    // The backend's customer lookup keys on email; require a TLD so a bare
    // hostname never creates a duplicate customer record.
    if let Some(at_pos) = trimmed.find('@') {
        let domain_part = &trimmed[at_pos + 1..];
        if !domain_part.contains('.') {
            return Err(DomainError::Validation(
                "Invalid email format. Domain must include a TLD (e.g., .com, .org)".to_string(),
            ));
        }
    }

    Ok(trimmed.to_lowercase())
}
