//! # PicSplit CLI
//!
//! Command-line front end for the bill-splitting engine.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  bill.json (recognised receipt)                                         │
//! │      │                                                                  │
//! │      ├──► picsplit normalize   dedupe names, fold discount lines        │
//! │      │                                                                  │
//! │      └──► picsplit init        roster + empty (or equal) allocations    │
//! │               │                                                         │
//! │               ▼                                                         │
//! │          session.json  ◄── edit shares by hand                          │
//! │               │                                                         │
//! │               ├──► picsplit validate   every problem, exit 1 if any     │
//! │               └──► picsplit settle     per-person totals                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so stdout stays pipeable.

mod cli;
mod config;
mod error;
mod report;
mod session;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use picsplit_core::{prepare_bill, settle_with, Bill, SettleOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::session::{read_json, write_file, Session};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (config, load_report) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.output.log_level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    load_report.log();
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Normalize { bill } => {
            let mut bill: Bill = read_json(&bill)?;
            bill.normalize(&config.bill);
            println!("{}", serde_json::to_string_pretty(&bill)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init {
            bill,
            people,
            equal,
            output,
        } => {
            let mut bill: Bill = read_json(&bill)?;
            bill.normalize(&config.bill);

            let session = Session::start(bill, &people, equal);
            let json = session.to_json()?;
            match output {
                Some(path) => {
                    write_file(&path, &json)?;
                    info!(?path, "Session written");
                }
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { session, format } => {
            let format = format.unwrap_or(config.output.format);
            let session = Session::load(&session)?;

            match prepare_bill(&session.bill.items, &session.allocations, &session.participants) {
                Ok(prepared) => {
                    println!("{}", report::render_valid(prepared.lines().len(), format)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(refusal) => {
                    println!("{}", report::render_refusal(&refusal, format)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Settle {
            session,
            format,
            negative_cost,
        } => {
            let format = format.unwrap_or(config.output.format);
            let options = SettleOptions {
                negative_cost: negative_cost
                    .map(Into::into)
                    .unwrap_or(config.settlement.negative_cost),
            };
            let session = Session::load(&session)?;

            match settle_with(
                &session.bill.items,
                &session.allocations,
                &session.participants,
                &options,
            ) {
                Ok(settlement) => {
                    info!(
                        participants = settlement.len(),
                        warnings = settlement.warnings.len(),
                        "Bill settled"
                    );
                    let rendered = report::render_settlement(
                        &settlement,
                        session.bill.total_bill,
                        format,
                        &config.output.currency_symbol,
                    )?;
                    println!("{rendered}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(refusal) => {
                    println!("{}", report::render_refusal(&refusal, format)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
