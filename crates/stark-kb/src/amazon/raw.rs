//! Readers for the raw Amazon dumps.
//!
//! Review and metadata dumps hold one JSON object per line; Q&A dumps hold one Python dict
//! literal per line. Every file is gzip-compressed. Field types in the dumps drift between
//! categories (a description may be a string or a list, votes may be strings or numbers), so
//! the record types deserialize through lenient helpers rather than failing on shape changes.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{error::KbError, pyliteral};

/// Path of a category's review dump.
pub fn review_file(raw_dir: &Path, category: &str) -> PathBuf {
    raw_dir.join(format!("{category}.json.gz"))
}

/// Path of a category's metadata dump.
pub fn meta_file(raw_dir: &Path, category: &str) -> PathBuf {
    raw_dir.join(format!("meta_{category}.json.gz"))
}

/// Path of a category's Q&A dump.
pub fn qa_file(raw_dir: &Path, category: &str) -> PathBuf {
    raw_dir.join(format!("qa_{category}.json.gz"))
}

/// Reads a gzip-compressed file of JSON lines.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, KbError> {
    read_lines(path, |line| {
        serde_json::from_str::<Value>(line).map_err(|e| e.to_string())
    })
}

/// Reads a gzip-compressed file of Python literal lines.
pub fn read_python_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, KbError> {
    read_lines(path, |line| {
        pyliteral::parse_line(line).map_err(|e| e.to_string())
    })
}

/// Decompresses `path` and converts each non-blank line with `parse` into a `T`.
fn read_lines<T, F>(path: &Path, parse: F) -> Result<Vec<T>, KbError>
where
    T: DeserializeOwned,
    F: Fn(&str) -> Result<Value, String>,
{
    if !path.exists() {
        return Err(KbError::MissingRawFile {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| KbError::io(path, e))?;
    let mut reader = BufReader::new(GzDecoder::new(file));

    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| KbError::io(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        // Scraped text occasionally carries invalid UTF-8.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = |message: String| KbError::MalformedLine {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };
        let value = parse(line).map_err(malformed)?;
        let record = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
        records.push(record);
    }
    debug!(path = %path.display(), records = records.len(), "read raw file");
    Ok(records)
}

/// One row of a metadata dump.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawMeta {
    /// Product identifier.
    #[serde(deserialize_with = "string_lenient")]
    pub asin: String,
    /// Product title, possibly containing HTML.
    #[serde(deserialize_with = "string_lenient")]
    pub title: String,
    /// Category path.
    #[serde(deserialize_with = "string_or_list")]
    pub category: Vec<String>,
    /// Listed price.
    #[serde(deserialize_with = "optional_string")]
    pub price: Option<String>,
    /// Raw brand text.
    #[serde(deserialize_with = "string_lenient")]
    pub brand: String,
    /// Feature bullet points.
    #[serde(deserialize_with = "string_or_list")]
    pub feature: Vec<String>,
    /// Sales rank text.
    #[serde(deserialize_with = "optional_string")]
    pub rank: Option<String>,
    /// Flattened product details.
    #[serde(deserialize_with = "flat_details")]
    pub details: BTreeMap<String, String>,
    /// Description paragraphs.
    #[serde(deserialize_with = "string_or_list")]
    pub description: Vec<String>,
    /// ASINs bought together with this product.
    #[serde(deserialize_with = "string_or_list")]
    pub also_buy: Vec<String>,
    /// ASINs viewed together with this product.
    #[serde(deserialize_with = "string_or_list")]
    pub also_view: Vec<String>,
}

/// One row of a review dump.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawReview {
    /// Reviewed product.
    #[serde(deserialize_with = "string_lenient")]
    pub asin: String,
    /// Reviewer identifier.
    #[serde(rename = "reviewerID", deserialize_with = "string_lenient")]
    pub reviewer_id: String,
    /// Review headline.
    #[serde(deserialize_with = "string_lenient")]
    pub summary: String,
    /// Review body.
    #[serde(rename = "reviewText", deserialize_with = "string_lenient")]
    pub review_text: String,
    /// Helpfulness votes, string or number in the dumps.
    #[serde(deserialize_with = "optional_string")]
    pub vote: Option<String>,
    /// Star rating.
    pub overall: Option<f64>,
    /// Verified purchase flag.
    pub verified: Option<bool>,
    /// Review date.
    #[serde(rename = "reviewTime", deserialize_with = "optional_string")]
    pub review_time: Option<String>,
}

/// One row of a Q&A dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawQa {
    /// Product the question is about.
    #[serde(deserialize_with = "string_lenient")]
    pub asin: String,
    /// Question type.
    #[serde(rename = "questionType", deserialize_with = "optional_string")]
    pub question_type: Option<String>,
    /// Answer type.
    #[serde(rename = "answerType", deserialize_with = "optional_string")]
    pub answer_type: Option<String>,
    /// Question text.
    #[serde(deserialize_with = "string_lenient")]
    pub question: String,
    /// Answer text.
    #[serde(deserialize_with = "string_lenient")]
    pub answer: String,
    /// Answer date.
    #[serde(rename = "answerTime", deserialize_with = "optional_string")]
    pub answer_time: Option<String>,
}

/// Renders a scalar JSON value as text. Arrays join their elements with `, `.
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_string).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
    }
}

/// Deserializes any scalar as an optional string.
fn optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Deserializes any scalar as a string, empty when absent.
fn string_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

/// Deserializes a string or a list of scalars as a list of strings.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_to_string).collect(),
        other => value_to_string(other).into_iter().collect(),
    })
}

/// Deserializes a details object, flattening nested objects into snake_case keys.
fn flat_details<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let mut out = BTreeMap::new();
    if let Value::Object(map) = Value::deserialize(deserializer)? {
        flatten_into(&mut out, "", map);
    }
    Ok(out)
}

/// Inserts the entries of `map` into `out` with `prefix`-joined keys.
fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, map: Map<String, Value>) {
    for (key, value) in map {
        let key = snake_case(&key);
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(out, &key, nested),
            other => {
                if let Some(text) = value_to_string(other) {
                    out.insert(key, text);
                }
            }
        }
    }
}

/// Normalizes a free-form label such as `Product Dimensions:` into `product_dimensions`.
pub fn snake_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::fixtures::write_gz_lines;

    #[test]
    fn snake_case_labels() {
        assert_eq!(snake_case("Product Dimensions:"), "product_dimensions");
        assert_eq!(snake_case("  Item model number: "), "item_model_number");
        assert_eq!(snake_case("ASIN"), "asin");
        assert_eq!(snake_case("\u{200e}Shipping Weight"), "shipping_weight");
    }

    #[test]
    fn meta_fields_are_lenient() {
        let row: RawMeta = serde_json::from_value(serde_json::json!({
            "asin": "B01",
            "title": "Tent",
            "category": "Sports",
            "description": ["a", 2],
            "rank": ["#3 in Sports", "#1 in Tents"],
            "price": 19.5,
            "details": {
                "Product Dimensions:": "1 x 2 x 3 inches ; 4 pounds",
                "Shipping": {"Weight:": "5 pounds"},
                "empty": null
            },
            "also_buy": ["B02"],
            "similar_item": "ignored"
        }))
        .unwrap();
        assert_eq!(row.category, vec!["Sports"]);
        assert_eq!(row.description, vec!["a", "2"]);
        assert_eq!(row.rank.as_deref(), Some("#3 in Sports, #1 in Tents"));
        assert_eq!(row.price.as_deref(), Some("19.5"));
        assert_eq!(
            row.details["product_dimensions"],
            "1 x 2 x 3 inches ; 4 pounds"
        );
        assert_eq!(row.details["shipping_weight"], "5 pounds");
        assert!(!row.details.contains_key("empty"));
        assert!(row.also_view.is_empty());
        assert!(row.feature.is_empty());
    }

    #[test]
    fn review_vote_number_or_string() {
        let a: RawReview =
            serde_json::from_str(r#"{"asin": "B01", "vote": "1,024", "reviewerID": "R1"}"#)
                .unwrap();
        let b: RawReview = serde_json::from_str(r#"{"asin": "B01", "vote": 3}"#).unwrap();
        assert_eq!(a.vote.as_deref(), Some("1,024"));
        assert_eq!(a.reviewer_id, "R1");
        assert_eq!(b.vote.as_deref(), Some("3"));
        assert_eq!(b.review_text, "");
    }

    #[test]
    fn reads_gzipped_json_lines_skipping_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sports.json.gz");
        write_gz_lines(
            &path,
            &[
                r#"{"asin": "B01", "summary": "ok"}"#,
                "",
                r#"{"asin": "B02", "summary": "great"}"#,
            ],
        );
        let rows: Vec<RawReview> = read_json_lines(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].summary, "great");
    }

    #[test]
    fn reads_gzipped_python_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa_Sports.json.gz");
        write_gz_lines(
            &path,
            &["{'asin': 'B01', 'questionType': 'yes/no', 'question': 'Big?', 'answer': 'Yes', 'unixTime': 1}"],
        );
        let rows: Vec<RawQa> = read_python_lines(&path).unwrap();
        assert_eq!(rows[0].question_type.as_deref(), Some("yes/no"));
        assert_eq!(rows[0].answer, "Yes");
    }

    #[test]
    fn malformed_line_names_file_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json.gz");
        write_gz_lines(&path, &[r#"{"asin": "B01"}"#, "{not json"]);
        let err = read_json_lines::<RawReview>(&path).unwrap_err();
        match err {
            KbError::MalformedLine { line, path: p, .. } => {
                assert_eq!(line, 2);
                assert_eq!(p, path);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json_lines::<RawReview>(&dir.path().join("nope.json.gz")).unwrap_err();
        assert!(matches!(err, KbError::MissingRawFile { .. }));
    }
}
