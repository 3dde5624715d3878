use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::user::UserContext;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_my_tickets(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
) -> Result<impl IntoResponse, AppError> {
    let tickets = state.ticket_repo.list_by_user(&user_id).await?;
    Ok(Json(tickets))
}

pub async fn list_event_tickets(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::EventNotFound("Event not found".into()))?;

    if event.organizer_id != user_id {
        return Err(AppError::Forbidden("Only the organizer can view the attendee list".into()));
    }

    let tickets = state.ticket_repo.list_by_event(&event.id).await?;
    Ok(Json(tickets))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.ticket_repo.find_by_id(&ticket_id).await?
        .ok_or_else(|| AppError::TicketNotFound(format!("Ticket '{}' not found", ticket_id)))?;

    if ticket.user_id != user_id {
        let event = state.event_repo.find_by_id(&ticket.event_id).await?;
        let is_organizer = event.is_some_and(|e| e.organizer_id == user_id);
        if !is_organizer {
            return Err(AppError::Forbidden("Not allowed to view this ticket".into()));
        }
    }

    Ok(Json(ticket))
}

pub async fn validate_ticket(
    State(state): State<Arc<AppState>>,
    UserContext(user_id): UserContext,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let validated = state.validation_service.validate(&ticket_id, &user_id).await?;
    Ok(Json(validated))
}
