// handlers/protected/bookings.rs - GET /dashboard/bookings

use axum::{
    extract::{Query, State},
    response::Response,
};

use super::{list_response, SearchParams};
use crate::app::AppState;
use crate::screens::bookings::{self, BookingRow};
use crate::screens::load_list;
use crate::session::CurrentSession;

/// Newest bookings first, joined with customer and tour names. Each row
/// carries the tone its status is shown in.
pub async fn bookings_get(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<SearchParams>,
) -> Response {
    let list = load_list::<BookingRow>(state.backend.as_ref(), session.access_token(), bookings::NOUN, &bookings::query())
        .await
        .with_search(params.search);

    list_response(&list)
}
