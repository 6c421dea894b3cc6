//! # Category Module
//!
//! Static lookup from an item name to the tag shown next to it on a
//! breakdown row. No rules beyond the table below.

use crate::types::LineItem;

/// Tag for items that match nothing in the table.
pub const DEFAULT_CATEGORY: &str = "🛒";

/// Keyword table. Order matters: the first keyword contained in a name wins,
/// so "pineapple" lands on 🍎 via "apple".
const CATEGORY_TABLE: &[(&str, &str)] = &[
    ("bread", "🍞"),
    ("milk", "🥛"),
    ("cheese", "🧀"),
    ("egg", "🥚"),
    ("eggs", "🥚"),
    ("tamago", "🥚"),
    ("yogurt", "🥣"),
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("orange", "🍊"),
    ("vegetable", "🥬"),
    ("vegetables", "🥬"),
    ("fruit", "🍎"),
    ("fruits", "🍎"),
    ("meat", "🥩"),
    ("chicken", "🍗"),
    ("fish", "🐟"),
    ("rice", "🍚"),
    ("noodle", "🍜"),
    ("noodles", "🍜"),
    ("pasta", "🍝"),
    ("water", "💧"),
    ("juice", "🧃"),
    ("beer", "🍺"),
    ("wine", "🍷"),
    ("coffee", "☕"),
    ("tea", "🍵"),
    ("chocolate", "🍫"),
    ("cookie", "🍪"),
    ("cookies", "🍪"),
    ("cake", "🍰"),
    ("icecream", "🍦"),
    ("ice cream", "🍦"),
    ("candy", "🍬"),
    ("snack", "🍿"),
    ("snacks", "🍿"),
    ("chip", "🍪"),
    ("chips", "🍪"),
    ("plastic bag", "🛍️"),
    ("bag", "🛍️"),
    ("tissue", "🧻"),
    ("paper", "📄"),
    ("tofu", "🧊"),
    ("sauce", "🧂"),
    ("oil", "🫗"),
    ("spice", "🌶️"),
    ("spices", "🌶️"),
    ("seafood", "🦐"),
    ("shrimp", "🦐"),
    ("crab", "🦀"),
    ("onion", "🧅"),
    ("garlic", "🧄"),
    ("tomato", "🍅"),
    ("potato", "🥔"),
    ("carrot", "🥕"),
    ("cucumber", "🥒"),
    ("avocado", "🥑"),
    ("corn", "🌽"),
    ("mushroom", "🍄"),
    ("mushrooms", "🍄"),
    ("lemon", "🍋"),
    ("strawberry", "🍓"),
    ("strawberries", "🍓"),
    ("pineapple", "🍍"),
    ("watermelon", "🍉"),
];

/// Looks a name up: exact match first, then the first contained keyword.
///
/// ## Example
/// ```rust
/// use picsplit_core::category::classify;
///
/// assert_eq!(classify("Milk"), "🥛");
/// assert_eq!(classify("Whole Wheat Bread"), "🍞");
/// assert_eq!(classify("Batteries"), "🛒");
/// ```
pub fn classify(name: &str) -> &'static str {
    let lower = name.to_lowercase();

    if let Some((_, tag)) = CATEGORY_TABLE.iter().find(|(key, _)| *key == lower) {
        return *tag;
    }

    CATEGORY_TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, tag)| *tag)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Category for a line item. A non-blank tag supplied by bill recognition
/// wins over the table.
pub fn category_for(item: &LineItem) -> String {
    match item.emoji.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => classify(&item.normalized_name).to_string(),
    }
}
