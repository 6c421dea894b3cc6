//! # Report Rendering
//!
//! Turns engine results into what the user reads.
//!
//! ```text
//! Aiko                                   ¥55.50
//!   🥛 Milk               1/2 × ¥54.00 = ¥27.00
//!   🍞 Bread              1 × ¥28.50   = ¥28.50
//!
//! Grand total ¥213.84  Bill total ¥213.84  Difference ¥0.00
//! ```
//!
//! Amounts are rounded here and nowhere else in the CLI.

use picsplit_core::{Amount, NegativeCostPolicy, Settlement, SettlementError};
use serde_json::json;
use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// Formats an amount with the currency symbol, sign first.
pub fn money(symbol: &str, amount: Amount) -> String {
    if amount.round_to_minor() < 0 {
        format!("-{}{}", symbol, -amount)
    } else {
        format!("{}{}", symbol, amount)
    }
}

// =============================================================================
// Settlement
// =============================================================================

pub fn render_settlement(
    settlement: &Settlement,
    bill_total: Amount,
    format: OutputFormat,
    symbol: &str,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "settlement": settlement,
                "grand_total": settlement.grand_total(),
                "total_bill": bill_total,
                "discrepancy": settlement.discrepancy(bill_total),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Text => Ok(settlement_text(settlement, bill_total, symbol)),
    }
}

fn settlement_text(settlement: &Settlement, bill_total: Amount, symbol: &str) -> String {
    let mut out = String::new();

    for entry in settlement.iter() {
        let _ = writeln!(out, "{:<30} {:>12}", entry.name, money(symbol, entry.total));
        for row in &entry.items {
            let _ = writeln!(
                out,
                "  {} {:<20} {} × {} = {}",
                row.category,
                row.name,
                row.share,
                money(symbol, row.unit_cost),
                money(symbol, row.cost)
            );
        }
        out.push('\n');
    }

    if !settlement.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for warning in &settlement.warnings {
            let action = match warning.policy {
                NegativeCostPolicy::Propagate => "credited to its sharers",
                NegativeCostPolicy::Clamp => "treated as free",
            };
            let _ = writeln!(
                out,
                "  ! {}: discount exceeds price ({}), {}",
                warning.item,
                money(symbol, warning.effective_cost),
                action
            );
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Grand total {}  Bill total {}  Difference {}",
        money(symbol, settlement.grand_total()),
        money(symbol, bill_total),
        money(symbol, settlement.discrepancy(bill_total))
    );

    out
}

// =============================================================================
// Refusals
// =============================================================================

/// Renders why a bill cannot be settled. Every problem is listed.
pub fn render_refusal(error: &SettlementError, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(error.to_string()),
        OutputFormat::Json => {
            let value = match error {
                SettlementError::ValidationFailed(errors) => json!({
                    "valid": false,
                    "kind": "validation_failed",
                    "errors": errors,
                }),
                SettlementError::InvalidInput(errors) => json!({
                    "valid": false,
                    "kind": "invalid_input",
                    "errors": errors,
                }),
            };
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

/// Renders a successful validation.
pub fn render_valid(item_count: usize, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(format!("All {item_count} items are fully allocated")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(
            &json!({ "valid": true, "items": item_count }),
        )?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picsplit_core::{settle, AllocationBook, LineItem, Participant, ValidationError};

    fn milk_settlement() -> Settlement {
        let items = vec![LineItem::new("Milk", Amount::new(100.0))];
        let roster = vec![Participant::new(1, "Aiko"), Participant::new(2, "Ben")];
        let mut book = AllocationBook::new();
        book.sync_items(&items, &roster);
        book.set_quantity("Milk", 2).unwrap();
        book.set_share("Milk", &roster[0].id, "1").unwrap();
        book.set_share("Milk", &roster[1].id, "1").unwrap();
        settle(&items, &book, &roster).unwrap()
    }

    #[test]
    fn test_money_sign_before_symbol() {
        assert_eq!(money("¥", Amount::new(9.2)), "¥9.20");
        assert_eq!(money("¥", Amount::new(-9.2)), "-¥9.20");
        assert_eq!(money("$", Amount::new(-0.001)), "$0.00");
    }

    #[test]
    fn test_text_settlement() {
        let text =
            render_settlement(&milk_settlement(), Amount::new(108.0), OutputFormat::Text, "¥")
                .unwrap();
        assert!(text.contains("Aiko"));
        assert!(text.contains("🥛 Milk"));
        assert!(text.contains("1 × ¥54.00 = ¥54.00"));
        assert!(text.contains("Difference ¥0.00"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_json_settlement() {
        let out =
            render_settlement(&milk_settlement(), Amount::new(110.0), OutputFormat::Json, "¥")
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let grand_total = value["grand_total"].as_f64().unwrap();
        let discrepancy = value["discrepancy"].as_f64().unwrap();
        assert!((grand_total - 108.0).abs() < 1e-9);
        assert!((discrepancy + 2.0).abs() < 1e-9);
        assert_eq!(value["settlement"]["entries"][1]["name"], "Ben");
    }

    #[test]
    fn test_refusal_lists_every_problem() {
        let error = SettlementError::ValidationFailed(vec![
            ValidationError::ZeroQuantity { item: "Milk".into() },
            ValidationError::MissingAllocation { item: "Bread".into() },
        ]);

        let text = render_refusal(&error, OutputFormat::Text).unwrap();
        assert!(text.contains("Milk: quantity must be at least 1"));
        assert!(text.contains("Bread: no allocation supplied"));

        let json_out = render_refusal(&error, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(value["valid"], json!(false));
        assert_eq!(value["errors"][1]["kind"], "missing_allocation");
    }
}
