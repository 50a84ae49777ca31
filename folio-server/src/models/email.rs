//! Email address validation
//!
//! Syntactic check only: dot-atom local part, dotted hostname domain.
//! Internationalized addresses (UTF-8 local parts and domains) and
//! punycode labels are accepted.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for email addresses (column width)
pub const MAX_EMAIL_LEN: usize = 255;

/// Maximum length of the local part, in characters
const MAX_LOCAL_LEN: usize = 64;

/// Local part: dot-separated atoms of RFC 5322 atext or non-ASCII characters
static LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]|[^\x00-\x7F\s])+(?:\.(?:[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]|[^\x00-\x7F\s])+)*$")
        .expect("invalid local-part regex")
});

/// Maximum length of one domain label, in characters
const MAX_LABEL_LEN: usize = 63;

/// Domain: at least two labels, no leading/trailing hyphen; the TLD is
/// alphabetic or a punycode `xn--` label. Label length is checked separately.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+(?:\p{L}{2,}|xn--[A-Za-z0-9-]+)$")
        .expect("invalid domain regex")
});

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address.
    ///
    /// # Example
    /// ```
    /// use folio_server::models::EmailAddress;
    ///
    /// assert!(EmailAddress::new("jane@example.com").is_ok());
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if s.chars().count() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        let invalid = ValidationError::InvalidFormat {
            field: "email",
            reason: "value is not a valid email address",
        };

        let (local, domain) = s.rsplit_once('@').ok_or_else(|| invalid.clone())?;
        let long_label = domain
            .split('.')
            .any(|label| label.chars().count() > MAX_LABEL_LEN);
        if local.chars().count() > MAX_LOCAL_LEN
            || long_label
            || !LOCAL_RE.is_match(local)
            || !DOMAIN_RE.is_match(domain)
        {
            return Err(invalid);
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_addresses() {
        assert!(EmailAddress::new("user@example.com").is_ok());
        assert!(EmailAddress::new("user.name+tag@example.co.uk").is_ok());
        assert!(EmailAddress::new("o'neil@sub.example.org").is_ok());
    }

    #[test]
    fn accepts_punycode_tld() {
        assert!(EmailAddress::new("user@example.xn--p1ai").is_ok());
        assert!(EmailAddress::new("user@xn--bcher-kva.de").is_ok());
    }

    #[test]
    fn accepts_internationalized_addresses() {
        assert!(EmailAddress::new("jöhn@example.com").is_ok());
        assert!(EmailAddress::new("user@bücher.de").is_ok());
        assert!(EmailAddress::new("用户@例子.广告").is_ok());
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "not-an-email",
            "user@",
            "@example.com",
            "user@example",
            "user@@example.com",
            "user..name@example.com",
            ".user@example.com",
            "user@-example.com",
            "user name@example.com",
            "user\u{0}@example.com",
            "user@example.xn--",
            "user@example.123",
        ] {
            let err = EmailAddress::new(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_oversized_parts() {
        let long_local = format!("{}@example.com", "a".repeat(MAX_LOCAL_LEN + 1));
        let long_label = format!("user@{}.com", "b".repeat(MAX_LABEL_LEN + 1));
        for bad in [long_local, long_label] {
            assert!(matches!(
                EmailAddress::new(&bad),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn rejects_empty() {
        let err = EmailAddress::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "email" }));
    }

    #[test]
    fn max_length() {
        let long = format!("{}@{}.com", "a".repeat(60), "b".repeat(200));
        let err = EmailAddress::new(&long).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }
}
