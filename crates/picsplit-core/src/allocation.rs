//! # Allocation Module
//!
//! Who takes how much of each item, and whether that adds up.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Allocation Book Operations                           │
//! │                                                                         │
//! │  Event                         Book change                              │
//! │  ─────                         ───────────                              │
//! │  Bill parsed ────────────────► sync_items(): new items get qty 1,       │
//! │                                every participant "0"                    │
//! │  Item removed ───────────────► sync_items(): allocation dropped         │
//! │  Participant removed ────────► remove_participant(): key deleted        │
//! │                                everywhere (sums may now be off)         │
//! │  Roster replaced ────────────► reset_for_roster(): all re-initialised   │
//! │  "Share equally" clicked ────► share_equally(): everyone "1/n"          │
//! │  "Share everything" ─────────► share_all_equally(): same, every item    │
//! │  Token typed ────────────────► set_share()                              │
//! │                                                                         │
//! │  Between edits the book may violate sum == quantity. Only              │
//! │  Allocation::validate() (and the settlement gate) enforce it.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{FieldError, FieldResult, ShareProblem, ValidationError};
use crate::share::{parse_share, Share};
use crate::types::{LineItem, Participant, ParticipantId};
use crate::SHARE_TOLERANCE;

// =============================================================================
// Allocation
// =============================================================================

/// Raw, user-entered allocation for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Allocation {
    /// Number of units the item's cost is divided into.
    pub total_quantity: u32,

    /// Share token per participant. Missing participants count as "0".
    #[serde(default)]
    pub shares: BTreeMap<ParticipantId, String>,
}

impl Allocation {
    /// Quantity 1, every participant on "0".
    pub fn unassigned(roster: &[Participant]) -> Self {
        Allocation {
            total_quantity: 1,
            shares: roster
                .iter()
                .map(|p| (p.id.clone(), "0".to_string()))
                .collect(),
        }
    }

    /// Everyone gets "1/n" of the item, whatever its quantity.
    ///
    /// This mirrors the "share equally" button: it is only self-consistent
    /// when the quantity is 1.
    pub fn share_equally(&mut self, roster: &[Participant]) {
        let token = Share::even_split(1, roster.len()).to_string();
        self.shares = roster
            .iter()
            .map(|p| (p.id.clone(), token.clone()))
            .collect();
    }

    /// Everyone gets `total_quantity / n`, which always sums to the quantity.
    pub fn split_evenly(&mut self, roster: &[Participant]) {
        let token = Share::even_split(self.total_quantity, roster.len()).to_string();
        self.shares = roster
            .iter()
            .map(|p| (p.id.clone(), token.clone()))
            .collect();
    }

    /// Validates this allocation for `item`.
    ///
    /// Every token is parsed and every problem collected before reporting.
    /// On success the parsed shares are attached so nothing downstream parses
    /// again.
    ///
    /// ## Example
    /// ```rust
    /// use picsplit_core::{Allocation, Participant};
    ///
    /// let roster = vec![Participant::new(1, "A"), Participant::new(2, "B")];
    /// let mut allocation = Allocation::unassigned(&roster);
    /// allocation.share_equally(&roster);
    ///
    /// let validated = allocation.validate("Milk").unwrap();
    /// assert!((validated.share_of(&roster[0].id).value() - 0.5).abs() < 1e-12);
    /// ```
    pub fn validate(&self, item: &str) -> Result<ValidatedAllocation, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.total_quantity == 0 {
            errors.push(ValidationError::ZeroQuantity {
                item: item.to_string(),
            });
        }

        let mut problems = Vec::new();
        let mut shares = BTreeMap::new();
        let mut sum = 0.0_f64;

        for (participant, token) in &self.shares {
            match parse_share(token) {
                Ok(share) => {
                    sum += share.value();
                    shares.insert(participant.clone(), share);
                }
                Err(error) => problems.push(ShareProblem {
                    participant: participant.clone(),
                    error,
                }),
            }
        }

        if !problems.is_empty() {
            errors.push(ValidationError::InvalidShareFormat {
                item: item.to_string(),
                problems,
            });
        } else if self.total_quantity > 0
            && (sum - self.total_quantity as f64).abs() > SHARE_TOLERANCE
        {
            errors.push(ValidationError::QuantityMismatch {
                item: item.to_string(),
                sum,
                total_quantity: self.total_quantity,
            });
        }

        if !errors.is_empty() {
            tracing::debug!(item, count = errors.len(), "Allocation rejected");
            return Err(errors);
        }

        Ok(ValidatedAllocation {
            item: item.to_string(),
            total_quantity: self.total_quantity,
            shares,
        })
    }
}

// =============================================================================
// Validated Allocation
// =============================================================================

/// An allocation whose shares parsed and sum to its quantity.
///
/// Only [`Allocation::validate`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAllocation {
    item: String,
    total_quantity: u32,
    shares: BTreeMap<ParticipantId, Share>,
}

impl ValidatedAllocation {
    /// Name of the item this allocation belongs to.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Quantity, always at least 1.
    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    /// Share held by `participant`; zero when they have none.
    pub fn share_of(&self, participant: &ParticipantId) -> Share {
        self.shares.get(participant).copied().unwrap_or(Share::ZERO)
    }
}

// =============================================================================
// Allocation Book
// =============================================================================

/// Every item's allocation, keyed by the item's normalized name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllocationBook(BTreeMap<String, Allocation>);

impl AllocationBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocation for `item`, if any.
    pub fn get(&self, item: &str) -> Option<&Allocation> {
        self.0.get(item)
    }

    /// Inserts or replaces the allocation for `item`.
    pub fn insert(&mut self, item: impl Into<String>, allocation: Allocation) {
        self.0.insert(item.into(), allocation);
    }

    /// Number of allocations held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no allocation is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates allocations in item-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Allocation)> {
        self.0.iter()
    }

    /// Brings the book in line with the bill: items seen for the first time
    /// get an unassigned allocation, allocations for removed items go.
    pub fn sync_items(&mut self, items: &[LineItem], roster: &[Participant]) {
        self.0
            .retain(|name, _| items.iter().any(|item| item.name() == name));

        for item in items {
            self.0
                .entry(item.name().to_string())
                .or_insert_with(|| Allocation::unassigned(roster));
        }
    }

    /// Re-initialises every item's allocation for a new roster.
    pub fn reset_for_roster(&mut self, items: &[LineItem], roster: &[Participant]) {
        self.0 = items
            .iter()
            .map(|item| (item.name().to_string(), Allocation::unassigned(roster)))
            .collect();
    }

    /// Deletes `participant`'s share from every allocation.
    ///
    /// Sums are not repaired; re-validate before settling.
    pub fn remove_participant(&mut self, participant: &ParticipantId) {
        for allocation in self.0.values_mut() {
            allocation.shares.remove(participant);
        }
    }

    /// Records `participant`'s share token for `item`. The token is stored
    /// as typed; it is only parsed at validation.
    pub fn set_share(
        &mut self,
        item: &str,
        participant: &ParticipantId,
        token: impl Into<String>,
    ) -> FieldResult<()> {
        let allocation = self.get_mut(item)?;
        allocation.shares.insert(participant.clone(), token.into());
        Ok(())
    }

    /// Sets the number of units `item` is divided into.
    pub fn set_quantity(&mut self, item: &str, total_quantity: u32) -> FieldResult<()> {
        if total_quantity == 0 {
            return Err(FieldError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        self.get_mut(item)?.total_quantity = total_quantity;
        Ok(())
    }

    /// Gives every participant "1/n" of `item`.
    pub fn share_equally(&mut self, item: &str, roster: &[Participant]) -> FieldResult<()> {
        self.get_mut(item)?.share_equally(roster);
        Ok(())
    }

    /// Gives every participant "1/n" of every item in the book.
    pub fn share_all_equally(&mut self, roster: &[Participant]) {
        for allocation in self.0.values_mut() {
            allocation.share_equally(roster);
        }
    }

    fn get_mut(&mut self, item: &str) -> FieldResult<&mut Allocation> {
        self.0.get_mut(item).ok_or_else(|| FieldError::Unknown {
            field: "item".to_string(),
            value: item.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
