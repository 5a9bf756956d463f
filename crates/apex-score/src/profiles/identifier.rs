use super::seed::normalize_identifier;

/// Upper bound on identifier length (the practical limit for an email address).
pub const MAX_IDENTIFIER_LEN: usize = 254;

/// Which rule set an identifier was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Name,
}

/// Input validation for profile identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPolicy {
    allowed_domains: Vec<String>,
}

impl IdentifierPolicy {
    pub fn new<I, S>(allowed_domains: I) -> Result<Self, IdentifierPolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_domains: Vec<String> = allowed_domains
            .into_iter()
            .map(|domain| normalize_identifier(domain.as_ref()))
            .filter(|domain| !domain.is_empty())
            .collect();

        if allowed_domains.is_empty() {
            return Err(IdentifierPolicyError::EmptyDomainAllowList);
        }

        Ok(Self { allowed_domains })
    }

    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    /// Validates and normalizes an identifier, returning the cache key form.
    pub fn validate(&self, raw: &str) -> Result<(String, IdentifierKind), IdentifierError> {
        let identifier = normalize_identifier(raw);
        if identifier.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if identifier.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong {
                max: MAX_IDENTIFIER_LEN,
            });
        }

        if identifier.contains('@') {
            self.validate_email(&identifier)?;
            Ok((identifier, IdentifierKind::Email))
        } else {
            validate_name(&identifier)?;
            Ok((identifier, IdentifierKind::Name))
        }
    }

    fn validate_email(&self, identifier: &str) -> Result<(), IdentifierError> {
        let mut parts = identifier.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IdentifierError::MalformedEmail);
        };

        if local.is_empty() || local.chars().any(char::is_whitespace) {
            return Err(IdentifierError::MalformedEmail);
        }

        if !self.allowed_domains.iter().any(|allowed| allowed == domain) {
            return Err(IdentifierError::DomainNotAllowed {
                domain: domain.to_string(),
            });
        }

        Ok(())
    }
}

fn validate_name(identifier: &str) -> Result<(), IdentifierError> {
    let permitted = |ch: char| ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '.' | '_' | '\'');
    if !identifier.chars().any(char::is_alphabetic) || !identifier.chars().all(permitted) {
        return Err(IdentifierError::MalformedName);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier exceeds {max} characters")]
    TooLong { max: usize },
    #[error("email identifier must contain exactly one '@' and a non-empty local part")]
    MalformedEmail,
    #[error("email domain '{domain}' is not in the allow-list")]
    DomainNotAllowed { domain: String },
    #[error("name identifier must contain letters and only letters, digits, spaces or -._'")]
    MalformedName,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierPolicyError {
    #[error("the email domain allow-list is empty")]
    EmptyDomainAllowList,
}
