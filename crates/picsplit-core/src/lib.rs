//! # picsplit-core: Pure Settlement Engine for PicSplit
//!
//! This crate is the **heart** of PicSplit. It takes a parsed bill, a roster
//! of people and their per-item share assignments, and turns them into a
//! per-person settlement. All logic is pure: zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PicSplit Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Bill recognition (external) / picsplit CLI               │   │
//! │  │    image ──► parsed items ──► roster + shares ──► report        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ picsplit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   share   │  │  pricing  │  │ allocation │  │settlement │  │   │
//! │  │   │  "1/3"    │  │  tax 8%   │  │  sum == qty│  │ per-person│  │   │
//! │  │   │  "0.5"    │  │  bag 10%  │  │  gate      │  │ totals    │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Participant, TaxRate)
//! - [`money`] - Amount type used for every monetary value
//! - [`share`] - Share token parsing (`"0.5"`, `"1/3"`)
//! - [`pricing`] - Tax rate selection and effective cost
//! - [`allocation`] - Per-item share assignments and their validation
//! - [`settlement`] - Bill-level gate and per-person settlement
//! - [`category`] - Display category lookup for breakdown rows
//! - [`bill`] - Bill-parse result and its normalisation
//! - [`validation`] - Roster and line-item sanity checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use picsplit_core::{settle, AllocationBook, Amount, LineItem, Participant};
//!
//! let items = vec![LineItem::new("Milk", Amount::new(100.0))];
//! let roster = vec![Participant::new(1, "Alice"), Participant::new(2, "Bob")];
//!
//! let mut book = AllocationBook::new();
//! book.sync_items(&items, &roster);
//! book.set_quantity("Milk", 2).unwrap();
//! book.set_share("Milk", &roster[0].id, "1").unwrap();
//! book.set_share("Milk", &roster[1].id, "1").unwrap();
//!
//! let settlement = settle(&items, &book, &roster).unwrap();
//! assert_eq!(settlement.get(&roster[0].id).unwrap().total.to_string(), "54.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod bill;
pub mod category;
pub mod error;
pub mod money;
pub mod pricing;
pub mod settlement;
pub mod share;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{Allocation, AllocationBook, ValidatedAllocation};
pub use bill::{Bill, NormalizeOptions};
pub use error::{FieldError, SettlementError, ShareParseError, ShareProblem, ValidationError};
pub use money::Amount;
pub use settlement::{
    prepare_bill, settle, settle_with, validate_bill, ItemShare, NegativeCostPolicy,
    NegativeCostWarning, SettleOptions, Settlement, SettlementEntry, ValidatedBill,
};
pub use share::{parse_share, Share};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Absolute tolerance when comparing the sum of an item's shares with its
/// declared quantity. A difference strictly greater than this fails.
pub const SHARE_TOLERANCE: f64 = 0.001;

/// Tax rate applied to every item that is not a plastic bag (8%).
pub const STANDARD_TAX_BPS: u32 = 800;

/// Tax rate applied to plastic bags (10%).
pub const PLASTIC_BAG_TAX_BPS: u32 = 1000;

/// Marker found in the original text of a receipt line that carries the
/// discount for the line directly above it.
pub const DEFAULT_DISCOUNT_MARKER: &str = "code128割引";

/// A bill is always split between at least this many people.
pub const MIN_PARTICIPANTS: usize = 1;
