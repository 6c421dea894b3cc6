//! # Error Types
//!
//! Domain-specific error types for picsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ShareParseError     - one share token ("1/0", "abc", "-1")            │
//! │        │                                                                │
//! │        ▼  collected per item, never fail-fast                           │
//! │  ValidationError     - one item (bad tokens, sum != quantity, ...)     │
//! │        │                                                                │
//! │        ▼  collected across the whole bill, in item order               │
//! │  SettlementError     - the bill-level gate                             │
//! │        ├── ValidationFailed(Vec<ValidationError>)                      │
//! │        └── InvalidInput(Vec<FieldError>)   roster / item sanity        │
//! │                                                                         │
//! │  Flow: ShareParseError → ValidationError → SettlementError → caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, participant, token)
//! 3. Errors are values; malformed input never panics the engine
//! 4. Errors serialize so a front end can list every problem at once

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::types::ParticipantId;

// =============================================================================
// Share Parse Error
// =============================================================================

/// A share token that cannot be turned into a non-negative number.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareParseError {
    /// Token contains `/` but is not `<number>/<non-zero number>`.
    #[error("'{token}' is not a valid fraction")]
    MalformedFraction { token: String },

    /// Token is neither blank, a fraction, nor a number.
    #[error("'{token}' is not a number")]
    NotANumber { token: String },

    /// Token parses but is below zero.
    #[error("'{token}' is negative; shares cannot be negative")]
    NegativeShare { token: String },
}

/// Convenience type alias for share parsing.
pub type ShareResult<T> = Result<T, ShareParseError>;

/// A share token problem tied to the participant who entered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareProblem {
    pub participant: ParticipantId,
    pub error: ShareParseError,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why one item's allocation cannot be settled.
///
/// ## User Workflow
/// ```text
/// Item "Milk", quantity 2, shares { A: "1", B: "0.5" }
///      │
///      ▼
/// sum = 1.5, |1.5 - 2| > 0.001
///      │
///      ▼
/// QuantityMismatch { item: "Milk", sum: 1.5, total_quantity: 2 }
///      │
///      ▼
/// UI shows: "Milk: Total allocated (1.50) should equal 2"
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// One or more share tokens failed to parse.
    #[error("{item}: invalid share format ({})", describe_problems(.problems))]
    InvalidShareFormat {
        item: String,
        problems: Vec<ShareProblem>,
    },

    /// Parsed shares do not add up to the declared quantity.
    #[error("{item}: Total allocated ({sum:.2}) should equal {total_quantity}")]
    QuantityMismatch {
        item: String,
        sum: f64,
        total_quantity: u32,
    },

    /// Quantity must be at least 1.
    #[error("{item}: quantity must be at least 1")]
    ZeroQuantity { item: String },

    /// The bill lists the item but no allocation was supplied for it.
    #[error("{item}: no allocation supplied")]
    MissingAllocation { item: String },

    /// A share is keyed by someone who is not on the roster.
    #[error("{item}: share assigned to unknown participant '{participant}'")]
    UnknownParticipant {
        item: String,
        participant: ParticipantId,
    },
}

impl ValidationError {
    /// The item this error belongs to.
    pub fn item(&self) -> &str {
        match self {
            ValidationError::InvalidShareFormat { item, .. }
            | ValidationError::QuantityMismatch { item, .. }
            | ValidationError::ZeroQuantity { item }
            | ValidationError::MissingAllocation { item }
            | ValidationError::UnknownParticipant { item, .. } => item,
        }
    }
}

fn describe_problems(problems: &[ShareProblem]) -> String {
    problems
        .iter()
        .map(|p| format!("{}: {}", p.participant, p.error))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Field Error
// =============================================================================

/// Input sanity errors for the roster and the line items themselves.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Duplicate value where values must be unique.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative (got {value})")]
    MustBeNonNegative { field: String, value: f64 },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value must be at least 1.
    #[error("{field} must be at least 1")]
    MustBePositive { field: String },

    /// Collection has fewer entries than required.
    #[error("at least {min} {field} required")]
    TooFew { field: String, min: usize },

    /// Reference to something that does not exist.
    #[error("unknown {field} '{value}'")]
    Unknown { field: String, value: String },
}

/// Convenience type alias for field checks.
pub type FieldResult<T> = Result<T, FieldError>;

// =============================================================================
// Settlement Error
// =============================================================================

/// Bill-level refusal to settle. No partial settlement is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// At least one item failed validation. Carries every item's errors in
    /// bill order.
    #[error("Allocation errors:\n{}", join_lines(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// The roster or the line items are unusable.
    #[error("Invalid input:\n{}", join_lines(.0))]
    InvalidInput(Vec<FieldError>),
}

impl SettlementError {
    /// Number of individual problems reported.
    pub fn problem_count(&self) -> usize {
        match self {
            SettlementError::ValidationFailed(errors) => errors.len(),
            SettlementError::InvalidInput(errors) => errors.len(),
        }
    }
}

fn join_lines<T: fmt::Display>(errors: &[T]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience type alias for Results with SettlementError.
pub type SettlementResult<T> = Result<T, SettlementError>;

// =============================================================================
// Unit Tests
// =============================================================================
