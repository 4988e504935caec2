//! Gzip fixtures shaped like the Amazon dumps.

use std::{fs, io::Write, path::Path};

use flate2::{Compression, write::GzEncoder};

/// Category used by the sample dumps.
pub const CATEGORY: &str = "Sports_and_Outdoors";

/// Writes `lines` to a gzip file, one per line.
pub fn write_gz_lines(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::fast());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();
}

/// Writes a small review, metadata and Q&A dump for [`CATEGORY`] into `raw_dir`.
///
/// Products after processing:
/// - id 0, `B01` tent: three reviews, two questions, brand `Coleman`
/// - id 1, `B02` stove: one review, brand `Coleman`
/// - id 2, `B03` lantern: one review, brand dropped (single character)
///
/// `B04` has metadata but no reviews, `B05` has reviews but no metadata, and a second `B01`
/// metadata row must lose to the first.
pub fn write_sample_raw(raw_dir: &Path) {
    write_gz_lines(
        &raw_dir.join(format!("meta_{CATEGORY}.json.gz")),
        &[
            r#"{"asin": "B01", "title": "Dome &amp; Tunnel Tent", "brand": "by Coleman", "category": ["Sports &amp; Outdoors", "Camping"], "feature": ["Sleeps 4", "", "Replacement poles: ASIN B0POLES", "Waterproof fly"], "description": ["Roomy tent.", "Sets up in minutes."], "details": {"Product Dimensions:": "84 x 60 x 48 inches ; 9.5 pounds"}, "price": "$89.99", "also_buy": ["B02", "B99"], "also_view": ["B03"]}"#,
            r#"{"asin": "B02", "title": "Camp Stove", "brand": "Coleman.com", "category": ["Sports &amp; Outdoors", "Cooking"], "feature": "Two burners", "also_view": ["B01"]}"#,
            r#"{"asin": "B03", "title": "LED Lantern", "brand": "X", "category": ["Camping"], "description": "<b>Bright</b> light."}"#,
            r#"{"asin": "B04", "title": "Unreviewed Cooler", "brand": "Igloo", "also_buy": ["B01"]}"#,
            r#"{"asin": "B01", "title": "Duplicate Tent Row", "brand": "Other"}"#,
        ],
    );
    write_gz_lines(
        &raw_dir.join(format!("{CATEGORY}.json.gz")),
        &[
            r#"{"asin": "B01", "reviewerID": "R1", "summary": "Okay", "reviewText": "Fine tent.", "overall": 3.0}"#,
            r#"{"asin": "B02", "reviewerID": "R2", "summary": "Hot", "reviewText": "Boils fast.", "vote": "2", "overall": 5.0}"#,
            r#"{"asin": "B01", "reviewerID": "R3", "summary": "Great", "reviewText": "Stayed dry in a storm.", "vote": "1,204", "verified": true}"#,
            "",
            r#"{"asin": "B05", "reviewerID": "R4", "summary": "Orphan", "reviewText": "No metadata."}"#,
            r#"{"asin": "B03", "reviewerID": "R5", "summary": "Bright", "reviewText": "Lights the whole site.", "vote": 7}"#,
            r#"{"asin": "B01", "reviewerID": "R6", "summary": "Leaky", "reviewText": "Seams leaked.", "vote": "15"}"#,
        ],
    );
    write_gz_lines(
        &raw_dir.join(format!("qa_{CATEGORY}.json.gz")),
        &[
            "{'questionType': 'yes/no', 'asin': 'B01', 'answerType': 'Y', 'question': 'Does it fit a queen mattress?', 'answer': 'Yes, easily.'}",
            "{'questionType': 'open-ended', 'asin': 'B04', 'question': 'How cold?', 'answer': 'Very.'}",
            "{'questionType': 'open-ended', 'asin': 'B01', 'question': \"What's the pole material?\", 'answer': 'Fiberglass.', 'answerTime': 'Jun 3, 2014'}",
        ],
    );
}
