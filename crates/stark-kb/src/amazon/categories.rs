//! Amazon product categories.
//!
//! Reviews and metadata come from the 2018 review dump, questions from the older Q&A dump.
//! The two use different category sets; only categories present in both can be requested
//! individually.

use crate::error::KbError;

/// Categories with review and metadata files.
pub const REVIEW_CATEGORIES: [&str; 29] = [
    "Amazon_Fashion",
    "All_Beauty",
    "Appliances",
    "Arts_Crafts_and_Sewing",
    "Automotive",
    "Books",
    "CDs_and_Vinyl",
    "Cell_Phones_and_Accessories",
    "Clothing_Shoes_and_Jewelry",
    "Digital_Music",
    "Electronics",
    "Gift_Cards",
    "Grocery_and_Gourmet_Food",
    "Home_and_Kitchen",
    "Industrial_and_Scientific",
    "Kindle_Store",
    "Luxury_Beauty",
    "Magazine_Subscriptions",
    "Movies_and_TV",
    "Musical_Instruments",
    "Office_Products",
    "Patio_Lawn_and_Garden",
    "Pet_Supplies",
    "Prime_Pantry",
    "Software",
    "Sports_and_Outdoors",
    "Tools_and_Home_Improvement",
    "Toys_and_Games",
    "Video_Games",
];

/// Categories with single-answer Q&A files.
pub const QA_CATEGORIES: [&str; 19] = [
    "Appliances",
    "Arts_Crafts_and_Sewing",
    "Automotive",
    "Baby",
    "Beauty",
    "Cell_Phones_and_Accessories",
    "Clothing_Shoes_and_Jewelry",
    "Electronics",
    "Grocery_and_Gourmet_Food",
    "Health_and_Personal_Care",
    "Home_and_Kitchen",
    "Musical_Instruments",
    "Office_Products",
    "Patio_Lawn_and_Garden",
    "Pet_Supplies",
    "Sports_and_Outdoors",
    "Tools_and_Home_Improvement",
    "Toys_and_Games",
    "Video_Games",
];

/// Categories present in both dumps.
pub const COMMON_CATEGORIES: [&str; 16] = [
    "Appliances",
    "Arts_Crafts_and_Sewing",
    "Automotive",
    "Cell_Phones_and_Accessories",
    "Clothing_Shoes_and_Jewelry",
    "Electronics",
    "Grocery_and_Gourmet_Food",
    "Home_and_Kitchen",
    "Musical_Instruments",
    "Office_Products",
    "Patio_Lawn_and_Garden",
    "Pet_Supplies",
    "Sports_and_Outdoors",
    "Tools_and_Home_Improvement",
    "Toys_and_Games",
    "Video_Games",
];

/// Selector that expands to every category of each dump.
pub const ALL: &str = "all";

/// The review and Q&A categories to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    /// Categories whose review and metadata files are read.
    pub review: Vec<String>,
    /// Categories whose Q&A files are read.
    pub qa: Vec<String>,
}

/// Expands requested categories into per-dump selections.
///
/// `all` anywhere in the list selects every category of each dump. Otherwise every requested
/// category must be in [`COMMON_CATEGORIES`], and both dumps use the list as given.
pub fn resolve_categories<S: AsRef<str>>(requested: &[S]) -> Result<CategorySelection, KbError> {
    if requested.iter().any(|c| c.as_ref() == ALL) {
        return Ok(CategorySelection {
            review: REVIEW_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
            qa: QA_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
        });
    }

    let invalid: Vec<String> = requested
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !COMMON_CATEGORIES.contains(c))
        .map(str::to_string)
        .collect();
    if !invalid.is_empty() {
        return Err(KbError::InvalidCategories {
            categories: invalid,
        });
    }

    let categories: Vec<String> = requested.iter().map(|c| c.as_ref().to_string()).collect();
    Ok(CategorySelection {
        review: categories.clone(),
        qa: categories,
    })
}

/// Display form of a category name, as stored in `global_category`.
pub fn display_name(category: &str) -> String {
    category.replace('_', " ")
}
