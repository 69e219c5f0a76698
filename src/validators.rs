//! Field validation and sanitization
//!
//! Pure helpers consumed by the state machine. None of these allocate an
//! error: invalid input is an expected, recoverable condition answered with
//! a re-prompt, so everything here returns plain bools and strings.

use once_cell::sync::Lazy;
use regex::Regex;

/// RFC 5321 caps the full address at 254 octets in practice.
const MAX_EMAIL_LEN: usize = 254;

/// Longest text fragment ever stored, matching the inquiry field cap.
const MAX_SANITIZED_LEN: usize = 500;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

/// Whether `email` looks like a deliverable address and fits the length cap.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

/// Whether `text`, once trimmed, has between `min` and `max` characters
/// (inclusive). Counts characters, not bytes: accented names count as the
/// user typed them.
pub fn is_valid_text(text: &str, min: usize, max: usize) -> bool {
    let len = text.trim().chars().count();
    len >= min && len <= max
}

/// Trims, strips the markup-significant characters `< > " ' &`, and caps the
/// result at 500 characters. Total: any input produces a (possibly empty)
/// string, never an error.
pub fn sanitize_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .take(MAX_SANITIZED_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("usuario@dominio.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("nombre.apellido+tag@sub.dominio.com.ar"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("sin@tld"));
        assert!(!is_valid_email("dos@@dominio.com"));
        assert!(!is_valid_email("espacio en@dominio.com"));
    }

    #[test]
    fn rejects_overlong_addresses() {
        let local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{local}@dominio.com")));
    }

    #[test]
    fn text_bounds_use_trimmed_character_count() {
        assert!(is_valid_text("  Jo  ", 2, 50));
        assert!(!is_valid_text(" J ", 2, 50));
        assert!(is_valid_text("José", 4, 4));
        assert!(!is_valid_text(&"x".repeat(51), 2, 50));
    }

    #[test]
    fn sanitize_strips_markup_characters() {
        assert_eq!(sanitize_text("  <script>\"hola\" & 'chau'  "), "scripthola  chau");
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn sanitize_caps_length_at_five_hundred() {
        let long = "a".repeat(600);
        assert_eq!(sanitize_text(&long).chars().count(), 500);
    }
}
