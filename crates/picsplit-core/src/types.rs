//! # Domain Types
//!
//! Core domain types shared by every stage of the engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │      LineItem        │   │   Participant   │   │    TaxRate      │  │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │  │
//! │  │  normalized_name     │   │  id             │   │  bps (u32)      │  │
//! │  │  original_name       │   │  display_name   │   │  800  = 8%      │  │
//! │  │  price_before_tax    │   └─────────────────┘   │  1000 = 10%     │  │
//! │  │  discount_amount     │                         └─────────────────┘  │
//! │  │  emoji (optional)    │                                              │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - A line item is identified within a bill by its `normalized_name`.
//! - A participant is identified by `id`, which may arrive as a number or a
//!   string from the caller and is always held as a string.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Amount;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (standard consumption tax), 1000 bps = 10% (plastic bags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (0.08 for 800 bps).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Participant Id
// =============================================================================

/// Stable identifier of a participant for the length of a session.
///
/// Callers hand in either integers (`1`, `2`, ...) or strings; both end up
/// as the same textual key so `1` and `"1"` name the same person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        ParticipantId(id)
    }
}

impl From<i32> for ParticipantId {
    fn from(id: i32) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<u32> for ParticipantId {
    fn from(id: u32) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<usize> for ParticipantId {
    fn from(id: usize) -> Self {
        ParticipantId(id.to_string())
    }
}

/// Accepts both JSON numbers and strings.
impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = ParticipantId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a participant id (integer or string)")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ParticipantId::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ParticipantId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ParticipantId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ParticipantId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A person taking part in the split.
///
/// Presentation attributes (avatar colour, icon) live with the caller; the
/// engine only needs the id and the name printed on the settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Participant {
    /// Unique, stable id.
    pub id: ParticipantId,

    /// Name shown on the settlement. Must be non-empty before settling.
    #[serde(alias = "name")]
    pub display_name: String,
}

impl Participant {
    /// Creates a participant.
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced entry on a bill, as produced by bill recognition.
///
/// Read-only to the engine. `discount_amount` is not checked against the
/// taxed price upstream, so an item's effective cost may come out negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Canonical display name; the item's identity key within a bill.
    pub normalized_name: String,

    /// Text as recognised on the receipt (display only).
    #[serde(default)]
    pub original_name: String,

    /// Price before tax.
    pub price_before_tax: Amount,

    /// Discount subtracted after tax. Zero when the receipt shows none.
    #[serde(default)]
    pub discount_amount: Amount,

    /// Category tag suggested by the recogniser, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub emoji: Option<String>,
}

impl LineItem {
    /// Creates an undiscounted item whose original name equals its
    /// normalized name.
    pub fn new(name: impl Into<String>, price_before_tax: Amount) -> Self {
        let name = name.into();
        LineItem {
            original_name: name.clone(),
            normalized_name: name,
            price_before_tax,
            discount_amount: Amount::zero(),
            emoji: None,
        }
    }

    /// Sets the discount (builder style).
    pub fn with_discount(mut self, discount: Amount) -> Self {
        self.discount_amount = discount;
        self
    }

    /// Sets the original receipt text (builder style).
    pub fn with_original_name(mut self, original: impl Into<String>) -> Self {
        self.original_name = original.into();
        self
    }

    /// Identity key of the item within its bill.
    #[inline]
    pub fn name(&self) -> &str {
        &self.normalized_name
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
