use email_address::EmailAddress;
use url::Url;

use crate::errors::SocialError;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the provided string parses as a URL with a scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Returns `true` if the string still has content once surrounding whitespace is removed.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Rejects a blank identifier with `InvalidOperation`.
pub(crate) fn require_id(value: &str, what: &'static str) -> Result<(), SocialError> {
    if is_present(value) {
        Ok(())
    } else {
        Err(SocialError::invalid(format!("{what} is required")))
    }
}
