use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub tour_id: Uuid,
    pub tour_name: String,
    pub description: Option<String>,
    pub region: Option<String>,
    pub duration_days: i32,
    pub base_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Booking state as understood for rendering. Rows keep the stored text;
/// this is derived from it without regard to case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
    Unknown,
}

/// Colour family a status is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl BookingStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "pending" => BookingStatus::Pending,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Unknown,
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            BookingStatus::Confirmed => StatusTone::Success,
            BookingStatus::Pending => StatusTone::Warning,
            BookingStatus::Cancelled => StatusTone::Danger,
            BookingStatus::Unknown => StatusTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub tour_id: Uuid,
    #[serde(with = "calendar_date")]
    pub booking_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub travel_date: NaiveDate,
    pub number_of_travelers: i32,
    pub total_price: Decimal,
    pub status: String,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: Uuid,
    pub booking_id: Uuid,
    #[serde(with = "calendar_date")]
    pub payment_date: NaiveDate,
    pub amount_paid: Decimal,
    pub payment_method: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Customer columns embedded in booking and payment rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSummary {
    pub tour_id: Uuid,
    pub tour_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub customer: Option<CustomerSummary>,
    pub tour: Option<TourSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub customer: Option<CustomerSummary>,
    pub tour: Option<TourSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWithBooking {
    #[serde(flatten)]
    pub payment: Payment,
    pub booking: Option<BookingSummary>,
}

// Date columns come back as `YYYY-MM-DD` or as full timestamps depending
// on the column type; only the calendar date is kept.
mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let day = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(D::Error::custom)
    }
}
