use serde::{Deserialize, Serialize};

use crate::backend::{Query, SortDirection};

use super::list::Searchable;
use super::models::{BookingWithDetails, StatusTone};

pub const NOUN: &str = "bookings";

pub fn query() -> Query {
    Query::from("bookings")
        .select(
            r#"
            *,
            customer:customer_id(customer_id, first_name, last_name, email),
            tour:tour_id(tour_id, tour_name)
            "#,
        )
        .order("booking_date", SortDirection::Desc)
}

/// A booking as listed, with the colour its status renders in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BookingWithDetails")]
pub struct BookingRow {
    #[serde(flatten)]
    pub details: BookingWithDetails,
    pub status_tone: StatusTone,
}

impl From<BookingWithDetails> for BookingRow {
    fn from(details: BookingWithDetails) -> Self {
        let status_tone = details.booking.status().tone();
        Self { details, status_tone }
    }
}

impl Searchable for BookingRow {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(4);
        if let Some(customer) = &self.details.customer {
            fields.push(customer.first_name.as_str());
            fields.push(customer.last_name.as_str());
        }
        if let Some(tour) = &self.details.tour {
            fields.push(tour.tour_name.as_str());
        }
        fields.push(self.details.booking.status.as_str());
        fields
    }
}
