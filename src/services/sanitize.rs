//! HTML sanitization and slug normalization
//!
//! Every user-supplied text field passes through here before it is persisted,
//! regardless of any filtering the client claims to have done.
//!
//! Two cleaners are built once and shared:
//! - a plain-text cleaner with an empty tag allow-list, used for titles and
//!   tag tokens. Disallowed tags are unwrapped to their text, except tags
//!   whose content is itself unsafe (`<script>`, `<style>`), which are
//!   dropped entirely.
//! - a rich-text cleaner for post content, restricted to a fixed set of
//!   structural and inline tags plus `href`/`title`/`target` attributes.

use std::collections::HashSet;

/// Tags allowed in post content
const CONTENT_TAGS: [&str; 18] = [
    "p", "br", "strong", "em", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "a",
    "blockquote", "code", "pre",
];

/// Attributes allowed on any content tag
const CONTENT_ATTRIBUTES: [&str; 3] = ["href", "title", "target"];

/// Shared allow-list sanitizer for post fields
pub struct Sanitizer {
    plain: ammonia::Builder<'static>,
    rich: ammonia::Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut plain = ammonia::Builder::default();
        plain
            .tags(HashSet::new())
            .generic_attributes(HashSet::new())
            .strip_comments(true);

        let mut rich = ammonia::Builder::default();
        rich.tags(HashSet::from_iter(CONTENT_TAGS))
            .generic_attributes(HashSet::from_iter(CONTENT_ATTRIBUTES))
            .link_rel(None)
            .strip_comments(true);

        Self { plain, rich }
    }

    /// Reduce input to bare text: no tags survive
    pub fn clean_plain(&self, input: &str) -> String {
        self.plain.clean(input).to_string()
    }

    /// Reduce input to the allow-listed HTML subset
    pub fn clean_rich(&self, input: &str) -> String {
        self.rich.clean(input).to_string()
    }

    /// Sanitize each tag token down to bare text
    pub fn clean_tags(&self, tags: &[String]) -> Vec<String> {
        tags.iter().map(|tag| self.clean_plain(tag)).collect()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize arbitrary text into a URL-safe slug token.
///
/// Lowercases the input and replaces every character outside `[a-z0-9-]`
/// with a hyphen. Deliberately does NOT collapse or trim hyphens: collisions
/// and dangling dashes are left to the store's uniqueness constraint.
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Slug normalization tests
    // ========================================================================

    #[test]
    fn test_normalize_slug_simple() {
        assert_eq!(normalize_slug("hello-world"), "hello-world");
    }

    #[test]
    fn test_normalize_slug_lowercases() {
        assert_eq!(normalize_slug("Hello-World"), "hello-world");
    }

    #[test]
    fn test_normalize_slug_replaces_punctuation() {
        // No collapsing: every rejected character becomes its own hyphen
        assert_eq!(normalize_slug("My Post!"), "my-post-");
    }

    #[test]
    fn test_normalize_slug_keeps_consecutive_hyphens() {
        assert_eq!(normalize_slug("a  b"), "a--b");
        assert_eq!(normalize_slug("--a--"), "--a--");
    }

    #[test]
    fn test_normalize_slug_non_ascii() {
        assert_eq!(normalize_slug("café"), "caf-");
    }

    #[test]
    fn test_normalize_slug_empty() {
        assert_eq!(normalize_slug(""), "");
    }

    // ========================================================================
    // Plain-text sanitization tests
    // ========================================================================

    #[test]
    fn test_clean_plain_strips_tags_keeps_text() {
        let s = Sanitizer::new();
        assert_eq!(s.clean_plain("<b>Hi</b>"), "Hi");
        assert_eq!(s.clean_plain("<em>Hello</em> world"), "Hello world");
    }

    #[test]
    fn test_clean_plain_drops_script_with_content() {
        let s = Sanitizer::new();
        let out = s.clean_plain("before<script>alert('xss')</script>after");
        assert_eq!(out, "beforeafter");
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn test_clean_plain_drops_style_with_content() {
        let s = Sanitizer::new();
        assert_eq!(s.clean_plain("a<style>p{color:red}</style>b"), "ab");
    }

    #[test]
    fn test_clean_plain_leaves_plain_text_alone() {
        let s = Sanitizer::new();
        assert_eq!(s.clean_plain("just a title"), "just a title");
    }

    #[test]
    fn test_clean_tags_sanitizes_each_token() {
        let s = Sanitizer::new();
        let tags = vec!["rust".to_string(), "<i>web</i>".to_string()];
        assert_eq!(s.clean_tags(&tags), vec!["rust", "web"]);
    }

    // ========================================================================
    // Rich-text sanitization tests
    // ========================================================================

    #[test]
    fn test_clean_rich_keeps_allowed_tags() {
        let s = Sanitizer::new();
        let input = "<p>Hello <strong>world</strong></p><ul><li>one</li></ul>";
        assert_eq!(s.clean_rich(input), input);
    }

    #[test]
    fn test_clean_rich_unwraps_disallowed_tag_keeps_text() {
        let s = Sanitizer::new();
        // <div> is not allow-listed, but its text content survives
        let out = s.clean_rich("<div><p>kept</p></div>");
        assert!(out.contains("<p>kept</p>"));
        assert!(!out.contains("<div"));
    }

    #[test]
    fn test_clean_rich_drops_script_entirely() {
        let s = Sanitizer::new();
        let out = s.clean_rich("<p>ok</p><script>document.cookie</script>");
        assert_eq!(out, "<p>ok</p>");
    }

    #[test]
    fn test_clean_rich_filters_attributes() {
        let s = Sanitizer::new();
        let out = s.clean_rich(r#"<a href="https://example.com" onclick="evil()" title="t">x</a>"#);
        assert!(out.contains(r#"href="https://example.com""#));
        assert!(out.contains(r#"title="t""#));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn test_clean_rich_rejects_javascript_href() {
        let s = Sanitizer::new();
        let out = s.clean_rich(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.contains("javascript:"));
    }

    #[test]
    fn test_clean_rich_keeps_headings_and_pre() {
        let s = Sanitizer::new();
        let input = "<h1>Title</h1><pre><code>let x = 1;</code></pre><blockquote>q</blockquote>";
        assert_eq!(s.clean_rich(input), input);
    }

    #[test]
    fn test_clean_rich_event_attribute_on_allowed_tag() {
        let s = Sanitizer::new();
        let out = s.clean_rich(r#"<p onmouseover="steal()">text</p>"#);
        assert_eq!(out, "<p>text</p>");
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    proptest! {
        /// Slugs only ever contain [a-z0-9-], and normalization is a pure
        /// function of its input.
        #[test]
        fn property_slug_alphabet_and_purity(raw in ".*") {
            let once = normalize_slug(&raw);
            prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert_eq!(&once, &normalize_slug(&raw));
        }

        /// Slug normalization is idempotent: a normalized slug is already in
        /// the target alphabet, so a second pass changes nothing.
        #[test]
        fn property_slug_idempotent(raw in ".*") {
            let once = normalize_slug(&raw);
            prop_assert_eq!(normalize_slug(&once), once);
        }

        /// Script elements never survive title sanitization, while the plain
        /// text around them is preserved.
        #[test]
        fn property_title_script_removed(
            prefix in "[a-zA-Z0-9 ]{0,20}",
            payload in "[a-zA-Z0-9 ]{0,20}",
            suffix in "[a-zA-Z0-9 ]{0,20}",
        ) {
            let s = Sanitizer::new();
            let input = format!("{prefix}<script>{payload}</script>{suffix}");
            let out = s.clean_plain(&input);
            prop_assert!(!out.contains("<script"));
            prop_assert_eq!(out, format!("{prefix}{suffix}"));
        }

        /// Sanitizing already-sanitized content is a no-op.
        #[test]
        fn property_rich_sanitization_idempotent(input in ".*") {
            let s = Sanitizer::new();
            let once = s.clean_rich(&input);
            prop_assert_eq!(s.clean_rich(&once), once);
        }

        /// Plain-text output never contains a tag at all.
        #[test]
        fn property_plain_output_has_no_tags(input in ".*") {
            let s = Sanitizer::new();
            let out = s.clean_plain(&input);
            // Markup is escaped on the way out, so no literal '<' remains
            prop_assert!(!out.contains('<'));
            prop_assert_eq!(s.clean_plain(&out), out);
        }
    }
}
