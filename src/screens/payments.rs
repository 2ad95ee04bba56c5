use crate::backend::{Query, SortDirection};

use super::list::Searchable;
use super::models::PaymentWithBooking;

pub const NOUN: &str = "payments";

pub fn query() -> Query {
    Query::from("payments")
        .select(
            r#"
            *,
            booking:booking_id(
                booking_id,
                customer:customer_id(customer_id, first_name, last_name),
                tour:tour_id(tour_id, tour_name)
            )
            "#,
        )
        .order("payment_date", SortDirection::Desc)
}

impl Searchable for PaymentWithBooking {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(4);
        if let Some(customer) = self.booking.as_ref().and_then(|b| b.customer.as_ref()) {
            fields.push(customer.first_name.as_str());
            fields.push(customer.last_name.as_str());
        }
        fields.push(self.payment.payment_method.as_str());
        if let Some(transaction_id) = &self.payment.transaction_id {
            fields.push(transaction_id.as_str());
        }
        fields
    }
}
