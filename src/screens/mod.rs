//! The dashboard's data screens. Each one fetches a full collection in a
//! fixed order, filters it locally, and renders a [`ListView`].

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::backend::{Backend, BackendError, BackendResult, Query};
use crate::middleware::Notice;

pub mod bookings;
pub mod customers;
pub mod list;
pub mod models;
pub mod payments;
pub mod tours;

pub use list::{ListState, ListView, LoadPhase, Searchable};
pub use models::*;

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> BackendResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string())))
        .collect()
}

/// Run `query` and load the decoded rows into a fresh list. A failed read
/// leaves the list empty with an error notice rather than failing the
/// request.
pub async fn load_list<T>(
    backend: &dyn Backend,
    access_token: &str,
    noun: &'static str,
    query: &Query,
) -> ListState<T>
where
    T: DeserializeOwned + Searchable + Serialize,
{
    let state = ListState::loading(noun);
    let result = match backend.query(Some(access_token), query).await {
        Ok(rows) => decode_rows(rows),
        Err(e) => Err(e),
    };

    match result {
        Ok(rows) => {
            tracing::debug!("Loaded {} {}", rows.len(), noun);
            state.loaded(rows)
        }
        Err(e) => {
            tracing::warn!("Error fetching {}: {}", noun, e);
            state.failed(Notice::error(format!("Error fetching {}", noun)))
        }
    }
}
