use crate::domain::services::pricing::{PriceBreakdown, PromoOutcome};
use serde::Serialize;

#[derive(Serialize)]
pub struct QuoteResponse {
    pub quantity: i32,
    pub subtotal: f64,
    pub discount: f64,
    pub convenience_fee: f64,
    pub total: f64,
    pub promo_status: String,
    pub promo_code: Option<String>,
}

impl QuoteResponse {
    pub fn from_breakdown(quantity: i32, breakdown: &PriceBreakdown) -> Self {
        let (promo_status, promo_code) = match &breakdown.promo {
            PromoOutcome::NotRequested => ("NONE".to_string(), None),
            PromoOutcome::Applied { code, .. } => ("APPLIED".to_string(), Some(code.clone())),
            PromoOutcome::Invalid { code } => ("INVALID".to_string(), Some(code.clone())),
        };

        Self {
            quantity,
            subtotal: breakdown.subtotal,
            discount: breakdown.discount,
            convenience_fee: breakdown.convenience_fee,
            total: breakdown.total,
            promo_status,
            promo_code,
        }
    }
}
