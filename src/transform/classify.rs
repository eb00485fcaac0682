//! Content type classification.
//!
//! Decides whether a response body is eligible for HTML rewriting. The
//! check is a case-insensitive substring match rather than a strict MIME
//! parse so that charset suffixes like `text/html; charset=utf-8` stay
//! transformable.

/// Returns true when the declared content type is eligible for rewriting.
///
/// An absent content type is never transformable.
pub fn should_transform(content_type: Option<&str>, transformable: &[String]) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let content_type = content_type.to_lowercase();
    transformable
        .iter()
        .any(|token| content_type.contains(&token.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_only() -> Vec<String> {
        vec!["text/html".to_string()]
    }

    #[test]
    fn html_with_charset_suffix_is_transformable() {
        assert!(should_transform(
            Some("text/html; charset=utf-8"),
            &html_only()
        ));
    }

    #[test]
    fn json_is_not_transformable() {
        assert!(!should_transform(Some("application/json"), &html_only()));
    }

    #[test]
    fn absent_content_type_is_not_transformable() {
        assert!(!should_transform(None, &html_only()));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(should_transform(Some("Text/HTML"), &html_only()));
    }
}
