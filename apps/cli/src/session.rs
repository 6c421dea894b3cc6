//! # Session Files
//!
//! A session is everything the engine needs for one bill, saved as JSON so
//! the allocation can be edited between runs.
//!
//! ```json
//! {
//!   "bill": { "items": [ ... ], "total_bill": 213.84 },
//!   "participants": [ { "id": 1, "display_name": "Aiko" } ],
//!   "allocations": { "Milk": { "total_quantity": 1, "shares": { "1": "1" } } }
//! }
//! ```

use std::path::Path;

use picsplit_core::{AllocationBook, Bill, Participant};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub bill: Bill,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub allocations: AllocationBook,
}

impl Session {
    /// Starts a session: participants get ids 1..=n in the order given and
    /// every item is either unassigned or shared equally.
    pub fn start(bill: Bill, names: &[String], share_equally: bool) -> Self {
        let participants: Vec<Participant> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .enumerate()
            .map(|(i, name)| Participant::new(i + 1, name))
            .collect();

        let mut allocations = AllocationBook::new();
        allocations.sync_items(&bill.items, &participants);

        if share_equally {
            allocations.share_all_equally(&participants);
        }

        info!(
            items = bill.items.len(),
            participants = participants.len(),
            "Session started"
        );

        Session {
            bill,
            participants,
            allocations,
        }
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        read_json(path)
    }

    pub fn to_json(&self) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads and deserialises a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `contents` to `path`.
pub fn write_file(path: &Path, contents: &str) -> CliResult<()> {
    std::fs::write(path, contents).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
