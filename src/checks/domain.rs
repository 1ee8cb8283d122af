use crate::products::unexpected::DomainError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};


lazy_static! {
    /// Dot separated labels of 1-63 alphanumerics or hyphens (no hyphen at label edges),
    /// ending with a letter-only TLD of at least 2 characters
    static ref DOMAIN_NAME: Regex =
        Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
            .expect("Domain name pattern has to compile");
}


#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Validated, lower-cased host name of a monitored domain
pub struct DomainName(String);


/// Domains type
pub type Domains = Vec<DomainName>;


impl DomainName {
    /// Domain name as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}


impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim().to_lowercase();
        if DOMAIN_NAME.is_match(&name) {
            Ok(DomainName(name))
        } else {
            Err(DomainError::Invalid(raw.trim().to_string()))
        }
    }
}


impl TryFrom<String> for DomainName {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}


impl From<DomainName> for String {
    fn from(domain: DomainName) -> String {
        domain.0
    }
}


impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_valid_domains_are_normalized() {
        let domain: DomainName = "  WWW.Example.COM ".parse().unwrap();
        assert_eq!(domain.as_str(), "www.example.com");
        assert!("a-b.c-d.example.org".parse::<DomainName>().is_ok());
        assert!("xn--80ak6aa92e.com".parse::<DomainName>().is_ok());
        assert!("123.example.io".parse::<DomainName>().is_ok());
    }


    #[test]
    fn test_invalid_domains_are_rejected() {
        for raw in [
            "",
            "localhost",
            "-bad.example.com",
            "bad-.example.com",
            "under_score.example.com",
            "example.c0m",
            "example.c",
            "double..dot.com",
            "127.0.0.1",
            "https://example.com",
        ] {
            assert_eq!(
                raw.parse::<DomainName>(),
                Err(DomainError::Invalid(raw.to_string())),
                "{} should be rejected",
                raw
            );
        }
        let too_long_label = format!("{}.com", "a".repeat(64));
        assert!(too_long_label.parse::<DomainName>().is_err());
        let longest_label = format!("{}.com", "a".repeat(63));
        assert!(longest_label.parse::<DomainName>().is_ok());
    }


    #[test]
    fn test_domain_name_serde_validates() {
        let domains: Domains = serde_json::from_str(r#"["example.com", "Docs.RS"]"#).unwrap();
        assert_eq!(domains[1].as_str(), "docs.rs");
        assert_eq!(serde_json::to_string(&domains).unwrap(), r#"["example.com","docs.rs"]"#);
        assert!(serde_json::from_str::<Domains>(r#"["not a domain"]"#).is_err());
    }
}
