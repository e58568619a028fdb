//! Reference paths correlate catalog records with navigation nodes.
//!
//! Both sides go through [`normalize_href`], so a record built from
//! `groupSlug`/`slug` and a node rendered with `/group/item/` agree on
//! `group/item`.

/// Strips one leading `/` and the first `/` that sits right before a `#`
/// fragment marker or at the end of the string.
pub fn normalize_href(href: &str) -> String {
    let trimmed = href.strip_prefix('/').unwrap_or(href);
    let bytes = trimmed.as_bytes();
    let cut = (0..bytes.len())
        .find(|&idx| bytes[idx] == b'/' && matches!(bytes.get(idx + 1), None | Some(&b'#')));
    match cut {
        Some(idx) => {
            let mut out = String::with_capacity(trimmed.len().saturating_sub(1));
            out.push_str(&trimmed[..idx]);
            out.push_str(&trimmed[idx + 1..]);
            out
        }
        None => trimmed.to_string(),
    }
}

/// Canonical `group/item` path for a record.
pub fn reference_path(group_slug: &str, slug: &str) -> String {
    format!("{group_slug}/{slug}")
}

/// Lowercase, URL-safe slug: `[a-z0-9]` is kept and every run of anything
/// else, punctuation and non-ASCII letters included, becomes a single `-`.
/// Never starts or ends with `-`, so `"Queen's (Dark)"` becomes
/// `queen-s-dark`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Href the page renders for a primary catalog item.
pub fn item_href(group_slug: &str, slug: &str) -> String {
    format!("/{group_slug}/{slug}/")
}

/// Href the page renders for a nested entry under a primary item.
pub fn fragment_href(group_slug: &str, slug: &str, fragment: &str) -> String {
    format!("/{group_slug}/{slug}/#{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rendered_item_href_matches_record_path() {
        assert_eq!(
            normalize_href("/manipulators/maiden/"),
            reference_path("manipulators", "maiden")
        );
        assert_eq!(
            normalize_href(&item_href("manipulators", "maiden")),
            "manipulators/maiden"
        );
    }

    #[test]
    fn slash_before_fragment_is_dropped() {
        assert_eq!(
            normalize_href("/manipulators/maiden/#the-seductress"),
            "manipulators/maiden#the-seductress"
        );
    }

    #[test]
    fn only_first_trailing_slash_candidate_is_removed() {
        assert_eq!(normalize_href("/a/b#x/"), "a/b#x");
        assert_eq!(normalize_href("a/b"), "a/b");
        assert_eq!(normalize_href("//a/"), "/a");
        assert_eq!(normalize_href(""), "");
        assert_eq!(normalize_href("/"), "");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Manipulative Maiden"), "manipulative-maiden");
        assert_eq!(slugify("  The  Queen's (Dark) / Side -- "), "the-queen-s-dark-side");
        assert_eq!(slugify("Über Mind"), "ber-mind");
        assert_eq!(slugify("Mind-Über_Matter 2"), "mind-ber-matter-2");
        assert_eq!(slugify("---"), "");
    }
}
