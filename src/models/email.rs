use garde::Validate;
use serde::Serialize;

use super::validate::report_messages;

const MAX_LABEL_LENGTH: usize = 63;
const PUNYCODE_PREFIX: &str = "xn--";

#[derive(Validate)]
struct EmailCandidate {
    #[garde(email)]
    address: String,
}

/// A syntactically valid email address. The domain part is lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Checks the address with garde's `email` rule, then requires a dotted
    /// domain with a real top-level label.
    pub fn parse(raw: &str) -> Result<Self, Vec<String>> {
        let raw = raw.trim();

        let candidate = EmailCandidate {
            address: raw.to_string(),
        };
        candidate
            .validate()
            .map_err(|report| report_messages(&report))?;

        let (local, domain) = match raw.rsplit_once('@') {
            Some(parts) => parts,
            None => return Err(vec!["an email address must have an @-sign".to_string()]),
        };

        check_local(local).map_err(|e| vec![e])?;
        check_domain(domain).map_err(|e| vec![e])?;

        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_local(local: &str) -> Result<(), String> {
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err("the part before the @-sign has a misplaced period".to_string());
    }
    Ok(())
}

fn check_domain(domain: &str) -> Result<(), String> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err("the part after the @-sign is not valid, it should have a period".to_string());
    }

    for label in &labels {
        if label.is_empty() {
            return Err("the part after the @-sign has a misplaced period".to_string());
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err("the part after the @-sign has a label that is too long".to_string());
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("a label after the @-sign cannot start or end with a hyphen".to_string());
        }
        if let Some(c) = label
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(format!(
                "the part after the @-sign contains an invalid character '{c}'"
            ));
        }
    }

    let tld = labels.last().copied().unwrap_or_default();
    if !is_top_level_label(tld) {
        return Err("the part after the @-sign is not a valid domain name".to_string());
    }

    Ok(())
}

/// Alphabetic labels of two or more letters, or punycode (`xn--...`).
fn is_top_level_label(label: &str) -> bool {
    let lower = label.to_ascii_lowercase();
    match lower.strip_prefix(PUNYCODE_PREFIX) {
        Some(encoded) => !encoded.is_empty(),
        None => lower.len() >= 2 && lower.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for raw in [
            "jane@example.com",
            "jane.doe+metro@mail.kochimetro.org",
            "o'brien@example.co.in",
            "a_b-c@sub-domain.example.io",
            "user@example.xn--p1ai",
        ] {
            assert!(Email::parse(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_lowercases_domain_only() {
        let email = Email::parse("Jane.Doe@Example.COM").unwrap();
        assert_eq!(email.as_str(), "Jane.Doe@example.com");
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for raw in [
            "",
            "plainaddress",
            "@example.com",
            "jane@",
            "jane@@example.com",
            "jane@example",
            "jane@example.c",
            "jane@exa mple.com",
            "jane..doe@example.com",
            ".jane@example.com",
            "jane@-example.com",
            "jane@example..com",
            "jane@example.123",
            "jane@example.xn--",
            "ja ne@example.com",
        ] {
            assert!(Email::parse(raw).is_err(), "{raw:?} should be invalid");
        }
    }

    #[test]
    fn test_reports_reasons() {
        let reasons = Email::parse("jane.example.com").unwrap_err();
        assert!(!reasons.is_empty());
        assert!(reasons.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("jane@example.com").unwrap();
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!("jane@example.com")
        );
    }
}
