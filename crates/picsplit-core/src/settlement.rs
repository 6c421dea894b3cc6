//! # Settlement Module
//!
//! The bill-level gate and the per-person settlement.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items + book + roster                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  check_inputs()        roster non-empty, ids unique, names set,        │
//! │        │               prices finite and ≥ 0   ──► InvalidInput        │
//! │        ▼                                                                │
//! │  validate_bill()       every item, in bill order, every error          │
//! │        │               collected                ──► ValidationFailed   │
//! │        ▼                                                                │
//! │  settle_validated()    per item:                                       │
//! │                          effective = price × (1 + tax) − discount      │
//! │                          unit      = effective / quantity              │
//! │                          cost      = share × unit   (per person)       │
//! │                          cost ≠ 0  ──► breakdown row + running total   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Settlement            one entry per participant, roster order         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gate is all-or-nothing: one bad item refuses the whole bill.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::allocation::{AllocationBook, ValidatedAllocation};
use crate::category::category_for;
use crate::error::{FieldError, SettlementError, SettlementResult, ValidationError};
use crate::money::Amount;
use crate::pricing::effective_cost;
use crate::types::{LineItem, Participant, ParticipantId};
use crate::validation::{validate_line_items, validate_roster};

// =============================================================================
// Options
// =============================================================================

/// What to do with an item whose discount exceeds its taxed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NegativeCostPolicy {
    /// Charge the negative amount, i.e. credit the people holding shares.
    #[default]
    Propagate,
    /// Treat the item as free.
    Clamp,
}

impl fmt::Display for NegativeCostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegativeCostPolicy::Propagate => write!(f, "propagate"),
            NegativeCostPolicy::Clamp => write!(f, "clamp"),
        }
    }
}

impl FromStr for NegativeCostPolicy {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "propagate" => Ok(NegativeCostPolicy::Propagate),
            "clamp" | "clamp_to_zero" => Ok(NegativeCostPolicy::Clamp),
            other => Err(FieldError::Unknown {
                field: "negative cost policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Knobs for [`settle_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettleOptions {
    #[serde(default)]
    pub negative_cost: NegativeCostPolicy,
}

// =============================================================================
// Output Types
// =============================================================================

/// One row of a participant's itemised breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ItemShare {
    /// Item name.
    pub name: String,
    /// Display category tag.
    pub category: String,
    /// Share as entered, normalised ("1/3", "0.5").
    pub share: String,
    /// Numeric share.
    pub share_value: f64,
    /// Cost of one unit of the item.
    pub unit_cost: Amount,
    /// What this participant owes for the item.
    pub cost: Amount,
}

/// A participant's final bill.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SettlementEntry {
    pub participant_id: ParticipantId,
    pub name: String,
    pub total: Amount,
    pub items: Vec<ItemShare>,
}

/// An item whose discount exceeded its taxed price.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct NegativeCostWarning {
    pub item: String,
    pub effective_cost: Amount,
    pub policy: NegativeCostPolicy,
}

/// Result of a successful settlement.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Settlement {
    /// One entry per participant, in roster order.
    pub entries: Vec<SettlementEntry>,
    /// Items that priced below zero.
    pub warnings: Vec<NegativeCostWarning>,
}

impl Settlement {
    /// Entry for `participant`.
    pub fn get(&self, participant: &ParticipantId) -> Option<&SettlementEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.participant_id == participant)
    }

    /// Entries in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &SettlementEntry> {
        self.entries.iter()
    }

    /// Number of participants settled.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty roster (never produced by [`settle`]).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every participant's total.
    pub fn grand_total(&self) -> Amount {
        self.entries.iter().map(|entry| entry.total).sum()
    }

    /// Settled grand total minus the total printed on the bill.
    ///
    /// Rounding on the receipt usually leaves a few hundredths either way.
    pub fn discrepancy(&self, bill_total: Amount) -> Amount {
        self.grand_total() - bill_total
    }
}

// =============================================================================
// Validation Gate
// =============================================================================

/// A bill whose every item has a validated allocation.
#[derive(Debug, Clone)]
pub struct ValidatedBill<'a> {
    lines: Vec<(&'a LineItem, ValidatedAllocation)>,
}

impl<'a> ValidatedBill<'a> {
    /// Items with their allocations, in bill order.
    pub fn lines(&self) -> &[(&'a LineItem, ValidatedAllocation)] {
        &self.lines
    }
}

/// Validates every item's allocation against the roster.
///
/// Errors are collected in bill order; within an item, unknown participants
/// come first, then the allocation's own errors with share problems in
/// roster order.
pub fn validate_bill<'a>(
    items: &'a [LineItem],
    book: &AllocationBook,
    roster: &[Participant],
) -> Result<ValidatedBill<'a>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let name = item.name();

        let Some(allocation) = book.get(name) else {
            errors.push(ValidationError::MissingAllocation {
                item: name.to_string(),
            });
            continue;
        };

        let mut item_errors: Vec<ValidationError> = allocation
            .shares
            .keys()
            .filter(|id| !roster.iter().any(|p| &p.id == *id))
            .map(|id| ValidationError::UnknownParticipant {
                item: name.to_string(),
                participant: id.clone(),
            })
            .collect();

        match allocation.validate(name) {
            Ok(validated) if item_errors.is_empty() => lines.push((item, validated)),
            Ok(_) => {}
            Err(mut allocation_errors) => {
                order_problems_by_roster(&mut allocation_errors, roster);
                item_errors.append(&mut allocation_errors);
            }
        }

        errors.append(&mut item_errors);
    }

    if errors.is_empty() {
        Ok(ValidatedBill { lines })
    } else {
        tracing::warn!(count = errors.len(), "Bill failed allocation validation");
        Err(errors)
    }
}

/// Share problems follow the roster; ids not on it keep their id order at
/// the end.
fn order_problems_by_roster(errors: &mut [ValidationError], roster: &[Participant]) {
    for error in errors.iter_mut() {
        if let ValidationError::InvalidShareFormat { problems, .. } = error {
            problems.sort_by_key(|problem| {
                roster
                    .iter()
                    .position(|p| p.id == problem.participant)
                    .unwrap_or(usize::MAX)
            });
        }
    }
}

fn check_inputs(items: &[LineItem], roster: &[Participant]) -> SettlementResult<()> {
    let mut problems: Vec<FieldError> = validate_roster(roster);
    problems.extend(validate_line_items(items));

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SettlementError::InvalidInput(problems))
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Settles a bill with default options (negative costs propagate).
pub fn settle(
    items: &[LineItem],
    book: &AllocationBook,
    roster: &[Participant],
) -> SettlementResult<Settlement> {
    settle_with(items, book, roster, &SettleOptions::default())
}

/// Settles a bill.
///
/// Refuses outright, before any pricing, if the inputs are unusable or any
/// item fails validation. Never returns a partial settlement.
pub fn settle_with(
    items: &[LineItem],
    book: &AllocationBook,
    roster: &[Participant],
    options: &SettleOptions,
) -> SettlementResult<Settlement> {
    let bill = prepare_bill(items, book, roster)?;
    Ok(settle_validated(&bill, roster, options))
}

/// Runs every check `settle_with` runs without pricing anything.
pub fn prepare_bill<'a>(
    items: &'a [LineItem],
    book: &AllocationBook,
    roster: &[Participant],
) -> SettlementResult<ValidatedBill<'a>> {
    check_inputs(items, roster)?;
    validate_bill(items, book, roster).map_err(SettlementError::ValidationFailed)
}

/// Distributes every item's cost. Infallible once the bill is validated.
pub fn settle_validated(
    bill: &ValidatedBill<'_>,
    roster: &[Participant],
    options: &SettleOptions,
) -> Settlement {
    let mut entries: Vec<SettlementEntry> = roster
        .iter()
        .map(|p| SettlementEntry {
            participant_id: p.id.clone(),
            name: p.display_name.clone(),
            total: Amount::zero(),
            items: Vec::new(),
        })
        .collect();
    let mut warnings = Vec::new();

    for (item, allocation) in bill.lines() {
        let mut effective = effective_cost(item);

        if effective.is_negative() {
            tracing::warn!(
                item = %item.normalized_name,
                effective = effective.value(),
                policy = %options.negative_cost,
                "Discount exceeds taxed price"
            );
            warnings.push(NegativeCostWarning {
                item: item.normalized_name.clone(),
                effective_cost: effective,
                policy: options.negative_cost,
            });
            if options.negative_cost == NegativeCostPolicy::Clamp {
                effective = effective.clamp_non_negative();
            }
        }

        let unit_cost = effective.divide_by_quantity(allocation.total_quantity());
        let category = category_for(item);

        for entry in entries.iter_mut() {
            let share = allocation.share_of(&entry.participant_id);
            let cost = unit_cost.scale(share.value());

            // Zero shares never clutter the receipt
            let charged = cost.is_positive()
                || (cost.is_negative() && options.negative_cost == NegativeCostPolicy::Propagate);
            if !charged {
                continue;
            }

            entry.total += cost;
            entry.items.push(ItemShare {
                name: item.normalized_name.clone(),
                category: category.clone(),
                share: share.to_string(),
                share_value: share.value(),
                unit_cost,
                cost,
            });
        }

        tracing::debug!(
            item = %item.normalized_name,
            effective = effective.value(),
            unit = unit_cost.value(),
            "Distributed item"
        );
    }

    Settlement { entries, warnings }
}

// =============================================================================
// Unit Tests
// =============================================================================
