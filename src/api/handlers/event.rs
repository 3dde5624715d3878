use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{user::UserContext, maybe_user::MaybeUserContext};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::{Event, PromoCode};
use crate::error::AppError;
use std::sync::Arc;
use uuid::Uuid;
use chrono::Utc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating event: {} by organizer: {}", payload.title, user_id);

    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if payload.ticket_price < 0.0 {
        return Err(AppError::Validation("Ticket price cannot be negative".into()));
    }
    if payload.max_tickets < 1 {
        return Err(AppError::Validation("max_tickets must be at least 1".into()));
    }
    if payload.per_user_limit < 1 {
        return Err(AppError::Validation("per_user_limit must be at least 1".into()));
    }
    if payload.sales_close_at <= payload.sales_open_at {
        return Err(AppError::Validation("Sales must close after they open".into()));
    }

    let promo_codes = payload.promo_codes.unwrap_or_default();
    validate_promo_codes(&promo_codes)?;

    let event = Event {
        id: Uuid::new_v4().to_string(),
        organizer_id: user_id,
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        location: payload.location,
        starts_at: payload.starts_at,
        sales_open_at: payload.sales_open_at,
        sales_close_at: payload.sales_close_at,
        ticket_price: payload.ticket_price,
        max_tickets: payload.max_tickets,
        per_user_limit: payload.per_user_limit,
        tickets_booked: 0,
        promo_codes: sqlx::types::Json(promo_codes),
        created_at: Utc::now(),
    };

    let created = state.event_repo.create(&event).await?;
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    MaybeUserContext(maybe_user): MaybeUserContext,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;

    let views = events
        .iter()
        .map(|event| event_view(event, maybe_user.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(views))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeUserContext(maybe_user): MaybeUserContext,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event '{}' not found", event_id)))?;

    Ok(Json(event_view(&event, maybe_user.as_deref())?))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::EventNotFound("Event not found".into()))?;

    if event.organizer_id != user_id {
        return Err(AppError::Forbidden("Only the organizer can update this event".into()));
    }

    if let Some(val) = payload.title { event.title = val; }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.location { event.location = val; }
    if let Some(val) = payload.starts_at { event.starts_at = val; }
    if let Some(val) = payload.sales_open_at { event.sales_open_at = val; }
    if let Some(val) = payload.sales_close_at { event.sales_close_at = val; }
    if let Some(val) = payload.ticket_price { event.ticket_price = val; }
    if let Some(val) = payload.max_tickets { event.max_tickets = val; }
    if let Some(val) = payload.per_user_limit { event.per_user_limit = val; }
    if let Some(val) = payload.promo_codes {
        validate_promo_codes(&val)?;
        event.promo_codes = sqlx::types::Json(val);
    }

    if event.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if event.ticket_price < 0.0 {
        return Err(AppError::Validation("Ticket price cannot be negative".into()));
    }
    if event.max_tickets < 1 {
        return Err(AppError::Validation("max_tickets must be at least 1".into()));
    }
    if event.per_user_limit < 1 {
        return Err(AppError::Validation("per_user_limit must be at least 1".into()));
    }
    if event.sales_close_at <= event.sales_open_at {
        return Err(AppError::Validation("Sales must close after they open".into()));
    }
    if event.max_tickets < event.tickets_booked {
        return Err(AppError::Validation(format!(
            "max_tickets cannot drop below the {} tickets already booked",
            event.tickets_booked
        )));
    }

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", event_id);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::EventNotFound("Event not found".into()))?;

    if event.organizer_id != user_id {
        return Err(AppError::Forbidden("Only the organizer can delete this event".into()));
    }

    let tickets = state.ticket_repo.list_by_event(&event.id).await?;
    if !tickets.is_empty() {
        return Err(AppError::Conflict("Event has sold tickets and cannot be deleted".into()));
    }

    state.event_repo.delete(&event.id).await?;
    info!("Event deleted: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

// Promo codes are only visible to the organizer; everyone sees the
// derived remaining capacity.
fn event_view(event: &Event, viewer: Option<&str>) -> Result<serde_json::Value, AppError> {
    let mut view = serde_json::to_value(event).map_err(|_| AppError::Internal)?;

    view["tickets_remaining"] = serde_json::json!(event.tickets_remaining());

    let is_organizer = viewer.is_some_and(|id| id == event.organizer_id);
    if !is_organizer {
        if let Some(map) = view.as_object_mut() {
            map.remove("promo_codes");
        }
    }

    Ok(view)
}

fn validate_promo_codes(codes: &[PromoCode]) -> Result<(), AppError> {
    let mut seen: Vec<String> = Vec::with_capacity(codes.len());

    for promo in codes {
        if promo.code.trim().is_empty() {
            return Err(AppError::Validation("Promo code must not be empty".into()));
        }
        if !(0.0..=100.0).contains(&promo.discount_percent) {
            return Err(AppError::Validation(format!(
                "Promo code '{}' must have a discount between 0 and 100",
                promo.code
            )));
        }

        let normalized = promo.code.to_ascii_lowercase();
        if seen.contains(&normalized) {
            return Err(AppError::Validation(format!("Duplicate promo code '{}'", promo.code)));
        }
        seen.push(normalized);
    }

    Ok(())
}
