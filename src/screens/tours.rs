use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::{Backend, BackendError, Key, Query, SortDirection};
use crate::error::ApiError;

use super::decode_rows;
use super::list::Searchable;
use super::models::Tour;

pub const NOUN: &str = "tours";
pub const TABLE: &str = "tours";

pub const NAME_REQUIRED: &str = "Tour name is required";
pub const INVALID_DURATION: &str = "Duration must be a positive number";
pub const INVALID_PRICE: &str = "Base price must be a positive number";

pub fn query() -> Query {
    Query::from(TABLE)
        .select("*")
        .order("tour_name", SortDirection::Asc)
}

impl Searchable for Tour {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.tour_name.as_str()];
        fields.extend(self.region.as_deref());
        fields
    }
}

/// Numeric form fields arrive as typed text or as JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    fn text(&self) -> String {
        match self {
            NumberInput::Number(n) => n.to_string(),
            NumberInput::Text(s) => s.trim().to_string(),
        }
    }
}

/// Raw tour form as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct TourInput {
    #[serde(default)]
    pub tour_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub duration_days: Option<NumberInput>,
    pub base_price: Option<NumberInput>,
}

/// A validated tour, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourDraft {
    pub tour_name: String,
    pub description: Option<String>,
    pub region: Option<String>,
    pub duration_days: i32,
    pub base_price: Decimal,
}

impl TryFrom<TourInput> for TourDraft {
    type Error = ApiError;

    fn try_from(input: TourInput) -> Result<Self, Self::Error> {
        let tour_name = input.tour_name.trim().to_string();
        if tour_name.is_empty() {
            return Err(ApiError::field_error("tour_name", NAME_REQUIRED));
        }

        // Fractional days are cut to whole days.
        let duration_days = input
            .duration_days
            .as_ref()
            .and_then(|n| Decimal::from_str(&n.text()).ok())
            .and_then(|days| days.trunc().to_i32())
            .filter(|days| *days > 0)
            .ok_or_else(|| ApiError::field_error("duration_days", INVALID_DURATION))?;

        let base_price = input
            .base_price
            .as_ref()
            .and_then(|n| Decimal::from_str(&n.text()).ok())
            .filter(|price| *price > Decimal::ZERO)
            .ok_or_else(|| ApiError::field_error("base_price", INVALID_PRICE))?;

        Ok(TourDraft {
            tour_name,
            description: blank_to_none(input.description),
            region: blank_to_none(input.region),
            duration_days,
            base_price,
        })
    }
}

impl TourDraft {
    pub fn to_record(&self) -> Value {
        json!({
            "tour_name": self.tour_name,
            "description": self.description,
            "region": self.region,
            "duration_days": self.duration_days,
            "base_price": self.base_price,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn key(tour_id: Uuid) -> Key {
    Key::new("tour_id", tour_id)
}

pub async fn fetch_tour(backend: &dyn Backend, access_token: &str, tour_id: Uuid) -> Result<Tour, ApiError> {
    let query = Query::from(TABLE).select("*").eq("tour_id", tour_id).limit(1);
    let rows = backend.query(Some(access_token), &query).await?;
    decode_rows::<Tour>(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Error fetching tour"))
}

pub async fn create_tour(backend: &dyn Backend, access_token: &str, draft: &TourDraft) -> Result<Tour, ApiError> {
    let row = backend.insert(Some(access_token), TABLE, &draft.to_record()).await?;
    let tour = serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(tour)
}

pub async fn update_tour(
    backend: &dyn Backend,
    access_token: &str,
    tour_id: Uuid,
    draft: &TourDraft,
) -> Result<(), ApiError> {
    backend.update(Some(access_token), TABLE, &key(tour_id), &draft.to_record()).await?;
    Ok(())
}

pub async fn delete_tour(backend: &dyn Backend, access_token: &str, tour_id: Uuid) -> Result<(), ApiError> {
    backend.delete(Some(access_token), TABLE, &key(tour_id)).await?;
    Ok(())
}

/// Shown instead of deleting when the request was not confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletePrompt {
    pub tour_id: Uuid,
    pub tour_name: String,
    pub message: String,
    pub confirm: String,
}

impl DeletePrompt {
    pub fn for_tour(tour: &Tour, path: &str) -> Self {
        Self {
            tour_id: tour.tour_id,
            tour_name: tour.tour_name.clone(),
            message: format!(
                "This will permanently delete the tour \"{}\". This action cannot be undone.",
                tour.tour_name
            ),
            confirm: format!("{}?confirm=true", path),
        }
    }
}
