//! Domain validation and normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// At least two labels, one optional trailing dot. Letters are matched in
/// both cases explicitly so non-ASCII case folds never slip through.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+\.?$").expect("domain regex is valid")
});

/// A validated, lowercase domain name without a trailing dot.
///
/// The only way to obtain one is through [`normalize_domain`] or
/// [`str::parse`], so every `Domain` in the program satisfies
/// [`is_valid_domain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::Empty);
        }
        normalize_domain(s).ok_or_else(|| DomainError::Invalid(s.trim().to_string()))
    }
}

/// Check a domain against the blocklist grammar.
///
/// Letters, digits and hyphens in at least two dot-separated labels, with
/// one optional trailing dot. Surrounding whitespace is not accepted.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

/// Normalize a domain token.
///
/// Trims surrounding whitespace, validates, strips a single trailing dot and
/// lowercases. Returns `None` for anything that is not a domain.
///
/// ```
/// use bindhole::normalize_domain;
///
/// let domain = normalize_domain("  Example.COM.  ").unwrap();
/// assert_eq!(domain.as_str(), "example.com");
/// assert!(normalize_domain("not a domain").is_none());
/// ```
pub fn normalize_domain(domain: &str) -> Option<Domain> {
    let domain = domain.trim();
    if !is_valid_domain(domain) {
        return None;
    }
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    Some(Domain(domain.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("Example.COM"));
        assert!(is_valid_domain("a.b.c.example.com"));
        assert!(is_valid_domain("0008d6ba2e.com"));
        assert!(is_valid_domain("eu1.clevertap-prod.com"));
        assert!(is_valid_domain("example.com."));
    }

    #[test]
    fn test_invalid_domains() {
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("localhost"));
        assert!(!is_valid_domain("example.com.."));
        assert!(!is_valid_domain(".example.com"));
        assert!(!is_valid_domain("example..com"));
        assert!(!is_valid_domain("not a domain"));
        assert!(!is_valid_domain(" example.com"));
        assert!(!is_valid_domain("exa_mple.com"));
        assert!(!is_valid_domain("*.example.com"));
        assert!(!is_valid_domain("::1"));
        // Kelvin sign folds to 'k' under Unicode case-insensitivity
        assert!(!is_valid_domain("\u{212A}.com"));
    }

    #[test]
    fn test_normalize() {
        let domain = normalize_domain("  Example.COM.  ").unwrap();
        assert_eq!(domain.as_str(), "example.com");

        let domain = normalize_domain("ck.getcookiestxt.com").unwrap();
        assert_eq!(domain.to_string(), "ck.getcookiestxt.com");

        assert!(normalize_domain("not a domain").is_none());
        assert!(normalize_domain("   ").is_none());
        assert!(normalize_domain("example.com..").is_none());
    }

    #[test]
    fn test_normalized_output_is_valid() {
        for raw in ["A.B.C", "x-y.Z.", "\tfoo.bar\n", "123.456.789.000"] {
            let domain = normalize_domain(raw).unwrap();
            assert!(is_valid_domain(domain.as_str()));
            assert!(!domain.as_str().ends_with('.'));
            assert_eq!(domain.as_str(), domain.as_str().to_lowercase());
        }
    }

    #[test]
    fn test_from_str() {
        let domain: Domain = "WWW.Example.org".parse().unwrap();
        assert_eq!(domain.as_str(), "www.example.org");

        assert_eq!("".parse::<Domain>(), Err(DomainError::Empty));
        assert_eq!(
            " bad domain ".parse::<Domain>(),
            Err(DomainError::Invalid("bad domain".to_string()))
        );
    }
}
