use crate::domain::models::event::{Event, PromoCode};

pub const CONVENIENCE_FEE_RATE: f64 = 0.5;
pub const CONVENIENCE_FEE_CAP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PromoOutcome {
    NotRequested,
    Applied { code: String, discount_percent: f64 },
    Invalid { code: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub subtotal: f64,
    pub discount: f64,
    pub convenience_fee: f64,
    pub total: f64,
    pub promo: PromoOutcome,
}

pub fn find_promo<'a>(event: &'a Event, code: &str) -> Option<&'a PromoCode> {
    event.promo_codes.0.iter().find(|p| p.code.eq_ignore_ascii_case(code))
}

/// Quotes a purchase. An unknown promo code never fails the quote, it is
/// reported back as `PromoOutcome::Invalid` with a zero discount.
pub fn compute_price(event: &Event, quantity: i32, promo_code: Option<&str>) -> PriceBreakdown {
    let subtotal = event.ticket_price * quantity as f64;

    let promo = match promo_code {
        None => PromoOutcome::NotRequested,
        Some(raw) => match find_promo(event, raw) {
            Some(p) => PromoOutcome::Applied {
                code: p.code.clone(),
                discount_percent: p.discount_percent,
            },
            None => PromoOutcome::Invalid { code: raw.to_string() },
        },
    };

    let discount = match &promo {
        PromoOutcome::Applied { discount_percent, .. } => subtotal * (discount_percent / 100.0),
        _ => 0.0,
    };

    // Fee applies to the undiscounted subtotal and is capped at a flat amount.
    let convenience_fee = (subtotal * CONVENIENCE_FEE_RATE).min(CONVENIENCE_FEE_CAP);

    PriceBreakdown {
        subtotal,
        discount,
        convenience_fee,
        total: subtotal - discount + convenience_fee,
        promo,
    }
}
