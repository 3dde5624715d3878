use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::user::UserContext;
use crate::api::dtos::requests::{PurchaseTicketRequest, QuoteRequest};
use crate::api::dtos::responses::QuoteResponse;
use crate::domain::services::pricing::{compute_price, PromoOutcome};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_eligibility(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event '{}' not found", event_id)))?;

    let eligibility = state.admission_engine.load_eligibility(&event, &user_id).await?;
    Ok(Json(eligibility))
}

pub async fn quote_booking(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<QuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event '{}' not found", event_id)))?;

    if payload.quantity < 1 {
        return Err(AppError::InvalidQuantity("Quantity must be at least 1".into()));
    }

    let breakdown = compute_price(&event, payload.quantity, payload.promo_code.as_deref());
    Ok(Json(QuoteResponse::from_breakdown(payload.quantity, &breakdown)))
}

pub async fn purchase_tickets(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(event_id): Path<String>,
    Json(payload): Json<PurchaseTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("purchase_tickets: user {} requests {} for event {}", user_id, payload.quantity, event_id);

    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event '{}' not found", event_id)))?;

    if payload.quantity < 1 {
        return Err(AppError::InvalidQuantity("Quantity must be at least 1".into()));
    }

    // The price is always recomputed server-side; the client never sends
    // amounts. An unknown promo code books at full price.
    let breakdown = compute_price(&event, payload.quantity, payload.promo_code.as_deref());
    let promo_code = match &breakdown.promo {
        PromoOutcome::Applied { code, .. } => Some(code.clone()),
        _ => None,
    };

    let ticket = state.admission_engine
        .confirm_booking(
            &event,
            &user_id,
            payload.quantity,
            promo_code,
            breakdown.discount,
            breakdown.total,
        )
        .await?;

    Ok(Json(ticket))
}
