//! Input sanitizing for submitted form fields.
//!
//! Sanitizers clean values for storage. HTML escaping is not their job: templates escape on
//! render, so stored values stay exactly what the operator typed (minus the noise below).

/// Cleans a raw submitted string before it is validated or stored.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, raw: &str) -> String;
}

/// Trims surrounding whitespace and drops control characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimSanitizer;

impl Sanitizer for TrimSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        raw.trim().chars().filter(|c| !c.is_control()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_sanitizer() {
        let sanitizer = TrimSanitizer;
        assert_eq!(sanitizer.sanitize("  M-001 \n"), "M-001");
        assert_eq!(sanitizer.sanitize("Floor\u{0} A"), "Floor A");
        assert_eq!(sanitizer.sanitize("   "), "");
        // Markup is left for the template layer to escape
        assert_eq!(sanitizer.sanitize("<b>VIP</b>"), "<b>VIP</b>");
    }
}
