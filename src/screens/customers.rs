use crate::backend::{Query, SortDirection};

use super::list::Searchable;
use super::models::Customer;

pub const NOUN: &str = "customers";

pub fn query() -> Query {
    Query::from("customers")
        .select("*")
        .order("last_name", SortDirection::Asc)
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.first_name, &self.last_name, &self.email]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ListState;
    use uuid::Uuid;

    fn customer(first: &str, last: &str, email: &str) -> Customer {
        Customer {
            customer_id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone_number: None,
            street_address: None,
            city: Some("Oslo".into()),
            postal_code: None,
            country: None,
        }
    }

    #[test]
    fn ordered_by_last_name() {
        let params = query().to_params();
        assert!(params.contains(&("order".to_string(), "last_name.asc".to_string())));
    }

    #[test]
    fn search_covers_names_and_email_only() {
        let mut state = ListState::loading(NOUN).loaded(vec![
            customer("Ada", "Lovelace", "ada@example.com"),
            customer("Grace", "Hopper", "grace@navy.mil"),
        ]);

        state.set_search("NAVY");
        assert_eq!(state.filtered().len(), 1);

        // City is displayed elsewhere but not searched
        state.set_search("oslo");
        assert!(state.filtered().is_empty());
    }
}
