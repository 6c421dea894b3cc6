//! # Bill Module
//!
//! The bill-parse result handed over by recognition, and the clean-up it
//! needs before items can serve as identity keys.
//!
//! ## Normalisation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recognised lines                    normalised items                   │
//! │  ─────────────────                   ────────────────                   │
//! │  Milk            198                 Milk 1   198                       │
//! │  Milk            198       dedupe    Milk 2   198  discount 20          │
//! │  code128割引      -20  ──► + merge ──►                                   │
//! │  Bread           157                 Bread    157                       │
//! │                                                                         │
//! │  1. dedupe: repeated names become "<name> 1", "<name> 2", ...           │
//! │  2. merge:  a discount-marker line folds into the line above it        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::money::Amount;
use crate::types::LineItem;
use crate::DEFAULT_DISCOUNT_MARKER;

// =============================================================================
// Bill
// =============================================================================

/// A recognised bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    /// Items in receipt order, which is also display order.
    pub items: Vec<LineItem>,

    /// Total printed on the receipt.
    #[serde(default)]
    pub total_bill: Amount,
}

impl Bill {
    /// Parses the JSON produced by bill recognition.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies the enabled normalisation steps in order.
    pub fn normalize(&mut self, options: &NormalizeOptions) {
        if options.dedupe_item_names {
            dedupe_item_names(&mut self.items);
        }
        if options.merge_discount_lines {
            merge_discount_lines(&mut self.items, &options.discount_marker);
        }
    }
}

/// Which normalisation steps to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    #[serde(default = "default_true")]
    pub dedupe_item_names: bool,

    #[serde(default = "default_true")]
    pub merge_discount_lines: bool,

    #[serde(default = "default_discount_marker")]
    pub discount_marker: String,
}

fn default_true() -> bool {
    true
}

fn default_discount_marker() -> String {
    DEFAULT_DISCOUNT_MARKER.to_string()
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            dedupe_item_names: true,
            merge_discount_lines: true,
            discount_marker: default_discount_marker(),
        }
    }
}

// =============================================================================
// Steps
// =============================================================================

/// Renames repeated normalized names to `"<name> 1"`, `"<name> 2"`, ... in
/// receipt order. Names that occur once are left alone.
pub fn dedupe_item_names(items: &mut [LineItem]) {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for item in items.iter() {
        *frequency.entry(item.normalized_name.clone()).or_default() += 1;
    }

    let mut occurrence: HashMap<String, usize> = HashMap::new();
    for item in items.iter_mut() {
        if frequency.get(&item.normalized_name).copied().unwrap_or(0) > 1 {
            let n = occurrence.entry(item.normalized_name.clone()).or_default();
            *n += 1;
            item.normalized_name = format!("{} {}", item.normalized_name, n);
        }
    }
}

/// Folds every discount line into the line directly above it.
///
/// A line is a discount line when its original text contains `marker`
/// (case-insensitive). Its `discount_amount` replaces the previous item's and
/// the discount line itself is dropped. A discount line with no line above
/// it is kept as is.
pub fn merge_discount_lines(items: &mut Vec<LineItem>, marker: &str) {
    let marker = marker.to_lowercase();
    if marker.is_empty() {
        return;
    }

    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
    let mut pending = std::mem::take(items).into_iter().peekable();

    while let Some(mut current) = pending.next() {
        let next_is_discount = pending
            .peek()
            .is_some_and(|next| next.original_name.to_lowercase().contains(&marker));

        if next_is_discount {
            if let Some(discount) = pending.next() {
                tracing::debug!(
                    item = %current.normalized_name,
                    discount = discount.discount_amount.value(),
                    "Merged discount line"
                );
                current.discount_amount = discount.discount_amount;
            }
        }
        merged.push(current);
    }

    *items = merged;
}

// =============================================================================
// Unit Tests
// =============================================================================
