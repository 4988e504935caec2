//! Node attribute records.
//!
//! A knowledge base node is either a product, carrying the textual attributes collected from
//! the metadata, review and Q&A dumps, or an entity created from an attribute value by a meta
//! link (for example a brand).

use std::{cmp::Reverse, collections::BTreeMap};

use serde::{Deserialize, Serialize};

/// Attributes of one knowledge base node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeInfo {
    /// A product with text attributes.
    Product(Product),
    /// An entity derived from an attribute value.
    Entity(Entity),
}

impl NodeInfo {
    /// Returns the product attributes, if this is a product node.
    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Self::Product(p) => Some(p),
            Self::Entity(_) => None,
        }
    }

    /// Returns the entity attributes, if this is an entity node.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            Self::Product(_) => None,
        }
    }

    /// Short human-readable label: the product title or the entity name.
    pub fn label(&self) -> &str {
        match self {
            Self::Product(p) => &p.title,
            Self::Entity(e) => &e.name,
        }
    }
}

/// An entity node created by a meta link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Link type that produced the entity (`brand`, `category`).
    pub kind: String,
    /// Attribute value shared by the linked products.
    pub name: String,
}

/// A product node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Amazon standard identification number.
    pub asin: String,
    /// Product title.
    pub title: String,
    /// Top-level category the product was loaded from, with spaces.
    pub global_category: String,
    /// Category path from the metadata.
    pub category: Vec<String>,
    /// Listed price, verbatim.
    pub price: Option<String>,
    /// Normalized brand, present only when longer than one character.
    pub brand: Option<String>,
    /// Feature bullet points.
    pub feature: Vec<String>,
    /// Sales rank text.
    pub rank: Option<String>,
    /// Flattened product details with snake_case keys.
    pub details: BTreeMap<String, String>,
    /// Description paragraphs.
    pub description: Vec<String>,
    /// Customer reviews in file order.
    pub review: Vec<Review>,
    /// Question-answer pairs in file order.
    pub qa: Vec<QaEntry>,
}

impl Product {
    /// Splits the product dimensions detail into `(dimensions, weight)`.
    ///
    /// Reads the `product_dimensions` detail, or its raw `Product Dimensions:` spelling. The value
    /// has the form `"<dimensions> ; <weight>"`; any other shape yields `None`.
    pub fn dimensions_and_weight(&self) -> Option<(&str, &str)> {
        let value = self
            .details
            .iter()
            .find(|(key, _)| {
                key.as_str() == "product_dimensions" || key.as_str() == "Product Dimensions:"
            })
            .map(|(_, value)| value.as_str())?;
        let mut parts = value.split(" ; ");
        match (parts.next(), parts.next(), parts.next()) {
            (Some(dimensions), Some(weight), None) => Some((dimensions, weight)),
            _ => None,
        }
    }

    /// Features worth showing, with their 1-based position in the original list.
    ///
    /// Empty features and features mentioning an ASIN are skipped.
    pub fn visible_features(&self) -> impl Iterator<Item = (usize, &str)> {
        self.feature
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_empty() && !f.to_lowercase().contains("asin"))
            .map(|(i, f)| (i + 1, f.as_str()))
    }

    /// Reviews ordered by helpfulness votes, most voted first.
    ///
    /// Ties keep file order. Each review is paired with its index in file order.
    pub fn reviews_by_votes(&self) -> Vec<(usize, &Review)> {
        let mut ranked: Vec<(usize, &Review)> = self.review.iter().enumerate().collect();
        ranked.sort_by_key(|(_, r)| Reverse(r.vote_count()));
        ranked
    }

    /// Description paragraphs joined by spaces, trimmed of surrounding spaces.
    pub fn description_text(&self) -> String {
        self.description.join(" ").trim_matches(' ').to_string()
    }
}

/// A customer review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// Reviewer identifier.
    pub reviewer_id: String,
    /// Review headline.
    pub summary: String,
    /// Review body.
    pub review_text: String,
    /// Helpfulness votes as written in the dump (may contain thousands separators).
    pub vote: Option<String>,
    /// Star rating.
    pub overall: Option<f64>,
    /// Whether the purchase was verified.
    pub verified: Option<bool>,
    /// Review date text.
    pub review_time: Option<String>,
}

impl Review {
    /// Helpfulness votes as a number; missing or unparsable votes count as zero.
    pub fn vote_count(&self) -> u64 {
        self.vote
            .as_deref()
            .and_then(|v| v.replace(',', "").trim().parse().ok())
            .unwrap_or(0)
    }
}

/// A question-answer pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaEntry {
    /// Question type (`yes/no`, `open-ended`).
    pub question_type: Option<String>,
    /// Answer type (`Y`, `N`, `?`).
    pub answer_type: Option<String>,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Answer date text.
    pub answer_time: Option<String>,
}
