use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating reporter email addresses
    /// Basic `local@domain.tld` shape with no whitespace
    /// - Valid: "a@b.co", "student.42@campus.edu"
    /// - Invalid: "not-an-email", "a@b", "a b@c.de"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex_valid() {
        assert!(EMAIL_REGEX.is_match("a@b.co"));
        assert!(EMAIL_REGEX.is_match("student.42@campus.edu"));
        assert!(EMAIL_REGEX.is_match("first+tag@sub.domain.org"));
    }

    #[test]
    fn test_email_regex_invalid() {
        assert!(!EMAIL_REGEX.is_match("not-an-email")); // no @
        assert!(!EMAIL_REGEX.is_match("a@b")); // no tld
        assert!(!EMAIL_REGEX.is_match("a b@c.de")); // whitespace in local part
        assert!(!EMAIL_REGEX.is_match("a@b c.de")); // whitespace in domain
        assert!(!EMAIL_REGEX.is_match("@b.co")); // empty local part
        assert!(!EMAIL_REGEX.is_match("")); // empty
    }
}
