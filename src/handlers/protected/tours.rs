// handlers/protected/tours.rs - Tour list, create, edit and delete

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{list_response, SearchParams};
use crate::app::AppState;
use crate::error::ApiError;
use crate::forms::Navigation;
use crate::middleware::{ApiResponse, ApiResult, Notice};
use crate::screens::tours::{self, DeletePrompt, TourDraft, TourInput};
use crate::screens::{load_list, Tour};
use crate::session::CurrentSession;

const TOUR_FIELDS: [&str; 5] = ["tour_name", "description", "region", "duration_days", "base_price"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Serialize)]
pub struct TourForm {
    pub mode: FormMode,
    pub tour: Option<Tour>,
    pub fields: [&'static str; 5],
    pub submit: String,
    pub cancel: String,
}

/// Result of a write: what to tell the user and where to go next.
#[derive(Debug, Serialize)]
pub struct TourSaved {
    pub tour: Option<Tour>,
    pub notice: Notice,
    pub navigation: Navigation,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteResult {
    ConfirmationRequired(DeletePrompt),
    Deleted(TourSaved),
}

fn tours_path(state: &AppState) -> String {
    format!("{}/tours", state.config.routes.protected_root)
}

/// GET /dashboard/tours - tours by name
pub async fn tours_get(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<SearchParams>,
) -> Response {
    let list = load_list::<Tour>(state.backend.as_ref(), session.access_token(), tours::NOUN, &tours::query())
        .await
        .with_search(params.search);

    list_response(&list)
}

/// GET /dashboard/tours/new - empty create form
pub async fn tour_new_get(State(state): State<AppState>) -> ApiResponse<TourForm> {
    let list = tours_path(&state);

    ApiResponse::success(TourForm {
        mode: FormMode::Create,
        tour: None,
        fields: TOUR_FIELDS,
        submit: list.clone(),
        cancel: list,
    })
}

/**
 * POST /dashboard/tours - Create a tour
 *
 * Expected Input:
 * ```json
 * {
 *   "tour_name": "Glacier Walk",
 *   "description": "",
 *   "region": "Patagonia",
 *   "duration_days": "7",
 *   "base_price": "1299.99"
 * }
 * ```
 *
 * Duration must parse as a whole number above zero and price as a decimal
 * above zero; anything else is a 400 with `field_errors` and nothing is
 * sent to the backend. Blank description and region are stored as null.
 */
pub async fn tours_post(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(input): Json<TourInput>,
) -> ApiResult<TourSaved> {
    let draft = TourDraft::try_from(input)?;
    let tour = tours::create_tour(state.backend.as_ref(), session.access_token(), &draft).await?;

    tracing::info!("Tour {} created by {}", tour.tour_id, session.0.user.id);

    Ok(ApiResponse::created(TourSaved {
        notice: Notice::success(format!(
            "Tour created successfully. The tour \"{}\" has been added.",
            tour.tour_name
        )),
        tour: Some(tour),
        navigation: Navigation::to(tours_path(&state)),
    }))
}

/// GET /dashboard/tours/:id - edit form for one tour
pub async fn tour_get(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(tour_id): Path<Uuid>,
) -> ApiResult<TourForm> {
    let tour = tours::fetch_tour(state.backend.as_ref(), session.access_token(), tour_id).await?;
    let list = tours_path(&state);

    Ok(ApiResponse::success(TourForm {
        mode: FormMode::Edit,
        submit: format!("{}/{}", list, tour.tour_id),
        tour: Some(tour),
        fields: TOUR_FIELDS,
        cancel: list,
    }))
}

/// PUT /dashboard/tours/:id - replace a tour's editable fields
pub async fn tour_put(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(tour_id): Path<Uuid>,
    Json(input): Json<TourInput>,
) -> ApiResult<TourSaved> {
    let draft = TourDraft::try_from(input)?;
    tours::update_tour(state.backend.as_ref(), session.access_token(), tour_id, &draft).await?;

    tracing::info!("Tour {} updated by {}", tour_id, session.0.user.id);

    Ok(ApiResponse::success(TourSaved {
        tour: None,
        notice: Notice::success(format!(
            "Tour updated successfully. The tour \"{}\" has been updated.",
            draft.tour_name
        )),
        navigation: Navigation::to(tours_path(&state)),
    }))
}

/// DELETE /dashboard/tours/:id[?confirm=true]
///
/// Without `confirm=true` nothing is deleted; the response is the prompt
/// the user has to accept first.
pub async fn tour_delete(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(tour_id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<ApiResponse<DeleteResult>, ApiError> {
    let backend = state.backend.as_ref();

    if !params.confirm {
        let tour = tours::fetch_tour(backend, session.access_token(), tour_id).await?;
        let path = format!("{}/{}", tours_path(&state), tour_id);
        return Ok(ApiResponse::success(DeleteResult::ConfirmationRequired(
            DeletePrompt::for_tour(&tour, &path),
        )));
    }

    tours::delete_tour(backend, session.access_token(), tour_id).await?;
    tracing::info!("Tour {} deleted by {}", tour_id, session.0.user.id);

    Ok(ApiResponse::success(DeleteResult::Deleted(TourSaved {
        tour: None,
        notice: Notice::success("Tour deleted. The tour has been successfully removed."),
        navigation: Navigation::to(tours_path(&state)),
    })))
}
