// handlers/protected/customers.rs - GET /dashboard/customers

use axum::{
    extract::{Query, State},
    response::Response,
};

use super::{list_response, SearchParams};
use crate::app::AppState;
use crate::screens::{customers, load_list, Customer};
use crate::session::CurrentSession;

/// Customers by last name, read-only.
pub async fn customers_get(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<SearchParams>,
) -> Response {
    let list = load_list::<Customer>(state.backend.as_ref(), session.access_token(), customers::NOUN, &customers::query())
        .await
        .with_search(params.search);

    list_response(&list)
}
