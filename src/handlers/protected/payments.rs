// handlers/protected/payments.rs - GET /dashboard/payments

use axum::{
    extract::{Query, State},
    response::Response,
};

use super::{list_response, SearchParams};
use crate::app::AppState;
use crate::screens::{load_list, payments, PaymentWithBooking};
use crate::session::CurrentSession;

pub async fn payments_get(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<SearchParams>,
) -> Response {
    let list = load_list::<PaymentWithBooking>(
        state.backend.as_ref(),
        session.access_token(),
        payments::NOUN,
        &payments::query(),
    )
    .await
    .with_search(params.search);

    list_response(&list)
}
