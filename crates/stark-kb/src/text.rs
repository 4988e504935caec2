//! Text cleanup for scraped product attributes.

/// Entities decoded by [`clean_text`].
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    // Last, so `&amp;lt;` decodes to `&lt;` rather than `<`.
    ("&amp;", "&"),
];

/// Cleans a scraped attribute value.
///
/// Decodes common HTML entities, drops `<...>` tags, collapses whitespace runs to single spaces
/// and trims the result.
pub fn clean_text(s: &str) -> String {
    let mut decoded = s.to_string();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    collapse_whitespace(&strip_tags(&decoded))
}

/// Cleans every element and drops the ones that end up empty.
pub fn clean_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| clean_text(v.as_ref()))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Flattens a multi-line document into one line with single spaces.
pub fn compact_text(s: &str) -> String {
    collapse_whitespace(s)
}

/// Removes `<...>` tags. An unterminated `<` is kept as text.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(len) => {
                // Tags separate words.
                out.push(' ');
                rest = &rest[start + len + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collapses whitespace runs into one space and trims.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entities() {
        assert_eq!(
            clean_text("Tom &amp; Jerry&#39;s &quot;best&quot;"),
            "Tom & Jerry's \"best\""
        );
        assert_eq!(clean_text("1 &lt; 2&nbsp;&nbsp;ok"), "1 < 2 ok");
        assert_eq!(clean_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strips_tags_and_whitespace() {
        assert_eq!(
            clean_text("  <span class=\"a\">Bold</span>\n\n<br/>text\t here "),
            "Bold text here"
        );
        assert_eq!(clean_text("a < b"), "a < b");
    }

    #[test]
    fn clean_list_drops_empty() {
        let cleaned = clean_list(&["<p></p>", " Durable ", "", "Light&nbsp;weight"]);
        assert_eq!(cleaned, vec!["Durable", "Light weight"]);
    }

    #[test]
    fn compact_joins_lines() {
        assert_eq!(
            compact_text("- product: Tent\n- features: \n#1: Big\n"),
            "- product: Tent - features: #1: Big"
        );
    }
}
