use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Validation {
    pub validated: bool,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Ticket {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub quantity: i32,
    pub purchased_at: DateTime<Utc>,
    pub promo_code: Option<String>,
    pub discount: f64,
    pub total_price: f64,
    pub validations: Json<HashMap<String, Validation>>,
}

pub struct NewTicketParams {
    pub event_id: String,
    pub user_id: String,
    pub quantity: i32,
    pub promo_code: Option<String>,
    pub discount: f64,
    pub total_price: f64,
}

impl Ticket {
    pub fn new(params: NewTicketParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            user_id: params.user_id,
            quantity: params.quantity,
            purchased_at: Utc::now(),
            promo_code: params.promo_code,
            discount: params.discount,
            total_price: params.total_price,
            validations: Json(HashMap::new()),
        }
    }

    pub fn earliest_validation(&self) -> Option<&Validation> {
        self.validations.0.values().min_by_key(|v| v.validated_at)
    }
}
