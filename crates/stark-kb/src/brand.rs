//! Brand name normalization.

/// Characters trimmed from both ends of a raw brand.
const STRIP_CHARS: &[char] = &[
    ' ', '"', '.', '*', '+', ',', '-', '_', '!', '@', '#', '$', '%', '^', '&', '(', ')', ';', '\\',
    '/', '|', '<', '>', '\'', '\t', '\n', '\r',
];

/// Brands longer than this many characters are cut to their first word.
const MAX_BRAND_CHARS: usize = 100;

/// Normalizes a scraped brand string.
///
/// Trims punctuation and whitespace, then drops a leading `by `, a trailing `.com` and a
/// leading `www.`, each only when the brand is long enough to keep something. Very long values
/// are usually scraped sentences; only their first word is kept.
pub fn normalize_brand(raw: &str) -> String {
    let mut brand = raw.trim_matches(STRIP_CHARS);

    if brand.chars().count() > 3 {
        brand = brand.strip_prefix("by ").unwrap_or(brand);
    }
    if brand.chars().count() > 4 {
        brand = brand.strip_suffix(".com").unwrap_or(brand);
    }
    if brand.chars().count() > 4 {
        brand = brand.strip_prefix("www.").unwrap_or(brand);
    }
    if brand.chars().count() > MAX_BRAND_CHARS {
        brand = brand.split(' ').next().unwrap_or(brand);
    }
    brand.to_string()
}

/// Whether a normalized brand is worth keeping on a product.
pub fn is_meaningful_brand(brand: &str) -> bool {
    brand.chars().count() > 1
}

/// Compares two brands, ignoring case, a trailing `.com` and surrounding double quotes.
pub fn brands_match(a: &str, b: &str) -> bool {
    comparable(a) == comparable(b)
}

/// Reduces a brand to its comparison form.
fn comparable(brand: &str) -> String {
    let brand = if brand.chars().count() > 4 {
        brand.strip_suffix(".com").unwrap_or(brand)
    } else {
        brand
    };
    brand.to_lowercase().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_table() {
        let cases = [
            ("  Coleman  ", "Coleman"),
            ("\"Coleman\"", "Coleman"),
            ("***Coleman!!", "Coleman"),
            ("by Coleman", "Coleman"),
            ("by ", "by"),
            ("Coleman.com", "Coleman"),
            ("www.coleman", "coleman"),
            ("www.coleman.com", "coleman"),
            ("a.com", "a"),
            (".com", "com"),
            ("\tUnder Armour\r\n", "Under Armour"),
            ("", ""),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_brand(raw), expected, "input {raw:?}");
        }
    }

    #[test]
    fn long_brands_keep_first_word() {
        let raw = format!("Acme {}", "x".repeat(120));
        assert_eq!(normalize_brand(&raw), "Acme");
    }

    #[test]
    fn lengths_count_characters() {
        // 62 characters but over 100 bytes.
        let raw = format!("{} x", "é".repeat(60));
        assert_eq!(normalize_brand(&raw), raw);
    }

    #[test]
    fn meaningful_brand_needs_two_chars() {
        assert!(!is_meaningful_brand("X"));
        assert!(!is_meaningful_brand(""));
        assert!(is_meaningful_brand("3M"));
    }

    #[test]
    fn brand_matching() {
        assert!(brands_match("Coleman", "coleman.com"));
        assert!(brands_match("\"Coleman\"", "COLEMAN"));
        assert!(!brands_match("Coleman", "Stanley"));
    }
}
