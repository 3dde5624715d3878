use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PromoCode {
    pub code: String,
    pub discount_percent: f64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub sales_open_at: DateTime<Utc>,
    pub sales_close_at: DateTime<Utc>,
    pub ticket_price: f64,
    pub max_tickets: i32,
    pub per_user_limit: i32,
    pub tickets_booked: i32,
    pub promo_codes: Json<Vec<PromoCode>>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn tickets_remaining(&self) -> i32 {
        self.max_tickets - self.tickets_booked
    }
}
