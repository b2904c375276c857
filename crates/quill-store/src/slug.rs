//! Slug derivation for post URLs.

/// Derive a URL slug from a post title.
///
/// Lowercases the title, keeps ASCII alphanumerics and CJK ideographs, and
/// collapses every other run of characters to a single dash. Leading and
/// trailing dashes are dropped. Uniqueness is the caller's concern (post
/// creation appends a timestamp suffix).
#[must_use]
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c) {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
    }

    #[test]
    fn test_slugify_keeps_cjk() {
        assert_eq!(slugify("我的博客 post"), "我的博客-post");
    }

    #[test]
    fn test_slugify_symbol_only_title_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
