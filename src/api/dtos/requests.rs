use crate::domain::models::event::PromoCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub sales_open_at: DateTime<Utc>,
    pub sales_close_at: DateTime<Utc>,
    pub ticket_price: f64,
    pub max_tickets: i32,
    pub per_user_limit: i32,
    pub promo_codes: Option<Vec<PromoCode>>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub sales_open_at: Option<DateTime<Utc>>,
    pub sales_close_at: Option<DateTime<Utc>>,
    pub ticket_price: Option<f64>,
    pub max_tickets: Option<i32>,
    pub per_user_limit: Option<i32>,
    pub promo_codes: Option<Vec<PromoCode>>,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub quantity: i32,
    pub promo_code: Option<String>,
}

#[derive(Deserialize)]
pub struct PurchaseTicketRequest {
    pub quantity: i32,
    pub promo_code: Option<String>,
}
