//! # Validation Module
//!
//! Sanity checks on the roster and the line items, run before any share is
//! looked at.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Bill recognition / UI                                        │
//! │  ├── Names entered, prices extracted                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Roster: at least one person, unique ids, non-blank names          │
//! │  └── Items: non-blank unique names, finite non-negative amounts        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Allocation validation (allocation.rs)                        │
//! │  └── Tokens parse, shares sum to quantity                              │
//! │                                                                         │
//! │  Every layer reports all of its problems, not just the first.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::{FieldError, FieldResult};
use crate::money::Amount;
use crate::types::{LineItem, Participant};
use crate::MIN_PARTICIPANTS;

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates a participant's display name.
///
/// ## Example
/// ```rust
/// use picsplit_core::validation::validate_display_name;
///
/// assert!(validate_display_name("Aiko").is_ok());
/// assert!(validate_display_name("   ").is_err());
/// ```
pub fn validate_display_name(name: &str) -> FieldResult<()> {
    if name.trim().is_empty() {
        return Err(FieldError::Required {
            field: "participant name".to_string(),
        });
    }
    Ok(())
}

/// Validates a monetary input: finite and not below zero.
pub fn validate_amount(field: &str, amount: Amount) -> FieldResult<()> {
    if !amount.is_finite() {
        return Err(FieldError::NotFinite {
            field: field.to_string(),
        });
    }
    if amount.is_negative() {
        return Err(FieldError::MustBeNonNegative {
            field: field.to_string(),
            value: amount.value(),
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Checks the roster and returns every problem found.
pub fn validate_roster(roster: &[Participant]) -> Vec<FieldError> {
    let mut problems = Vec::new();

    if roster.len() < MIN_PARTICIPANTS {
        problems.push(FieldError::TooFew {
            field: "participant(s)".to_string(),
            min: MIN_PARTICIPANTS,
        });
    }

    let mut seen = HashSet::new();
    for participant in roster {
        if !seen.insert(&participant.id) {
            problems.push(FieldError::Duplicate {
                field: "participant id".to_string(),
                value: participant.id.to_string(),
            });
        }
        if let Err(e) = validate_display_name(&participant.display_name) {
            problems.push(e);
        }
    }

    problems
}

/// Checks one line item and returns every problem found.
pub fn validate_line_item(item: &LineItem) -> Vec<FieldError> {
    let mut problems = Vec::new();

    if item.normalized_name.trim().is_empty() {
        problems.push(FieldError::Required {
            field: "item name".to_string(),
        });
    }

    let name = &item.normalized_name;
    if let Err(e) = validate_amount(&format!("{name} price"), item.price_before_tax) {
        problems.push(e);
    }
    if let Err(e) = validate_amount(&format!("{name} discount"), item.discount_amount) {
        problems.push(e);
    }

    problems
}

/// Checks every line item, plus name uniqueness across the bill.
pub fn validate_line_items(items: &[LineItem]) -> Vec<FieldError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        problems.extend(validate_line_item(item));
        if !seen.insert(item.name()) {
            problems.push(FieldError::Duplicate {
                field: "item name".to_string(),
                value: item.name().to_string(),
            });
        }
    }

    problems
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Ben").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name(" \t").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("price", Amount::new(0.0)).is_ok());
        assert!(validate_amount("price", Amount::new(198.0)).is_ok());
        assert!(matches!(
            validate_amount("price", Amount::new(-1.0)),
            Err(FieldError::MustBeNonNegative { .. })
        ));
        assert!(matches!(
            validate_amount("price", Amount::new(f64::INFINITY)),
            Err(FieldError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_roster() {
        assert!(validate_roster(&[Participant::new(1, "A")]).is_empty());
        assert_eq!(
            validate_roster(&[]),
            vec![FieldError::TooFew {
                field: "participant(s)".to_string(),
                min: 1
            }]
        );

        let problems = validate_roster(&[
            Participant::new(1, "A"),
            Participant::new(1, "B"),
            Participant::new(2, ""),
        ]);
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], FieldError::Duplicate { .. }));
        assert!(matches!(problems[1], FieldError::Required { .. }));
    }

    #[test]
    fn test_validate_line_items() {
        let items = vec![
            LineItem::new("Milk", Amount::new(100.0)),
            LineItem::new("Milk", Amount::new(-5.0)),
            LineItem::new(" ", Amount::new(1.0)).with_discount(Amount::new(f64::NAN)),
        ];
        let problems = validate_line_items(&items);
        assert_eq!(problems.len(), 4);
        assert!(matches!(problems[0], FieldError::MustBeNonNegative { .. }));
        assert!(matches!(problems[1], FieldError::Duplicate { .. }));
        assert!(matches!(problems[2], FieldError::Required { .. }));
        assert!(matches!(problems[3], FieldError::NotFinite { .. }));
    }
}
