// handlers/protected/mod.rs - Dashboard handlers (signed-in session required)
//
// Security Level: authenticated admin
// Route Prefix: the configured protected root (`/dashboard/*`)
// Session: attached by the session guard, taken with `CurrentSession`

use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::middleware::ApiResponse;
use crate::screens::{ListState, Searchable};

pub mod bookings;
pub mod customers;
pub mod dashboard;
pub mod payments;
pub mod session;
pub mod tours;

/// `?search=` on every list screen.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

fn list_response<T: Searchable + Serialize>(list: &ListState<T>) -> Response {
    ApiResponse::success(list.view()).into_response()
}

/*
LIST SCREEN PATTERN:

GET /dashboard/{customers,bookings,payments,tours}[?search=text]

1. fetch the whole collection in the screen's fixed order
2. filter locally, case-insensitively, over the screen's search fields
3. render a `ListView`: rows, total, empty-state text, and an error notice
   when the fetch failed (the request itself still succeeds)
*/
