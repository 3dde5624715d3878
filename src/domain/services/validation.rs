use std::sync::Arc;
use crate::domain::models::ticket::{Ticket, Validation};
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

pub struct ValidationService {
    ticket_repo: Arc<dyn TicketRepository>,
}

impl ValidationService {
    pub fn new(ticket_repo: Arc<dyn TicketRepository>) -> Self {
        Self { ticket_repo }
    }

    pub async fn validate(&self, ticket_id: &str, validator_id: &str) -> Result<Ticket, AppError> {
        let mut ticket = self.ticket_repo.find_by_id(ticket_id).await?
            .ok_or_else(|| AppError::TicketNotFound(format!("Ticket '{}' not found", ticket_id)))?;

        if let Some(prior) = ticket.earliest_validation() {
            return Err(AppError::AlreadyRedeemed(format!(
                "Ticket was already validated by {} at {}",
                prior.validated_by,
                prior.validated_at.to_rfc3339()
            )));
        }

        ticket.validations.0.insert(
            Uuid::new_v4().to_string(),
            Validation {
                validated: true,
                validated_by: validator_id.to_string(),
                validated_at: Utc::now(),
            },
        );

        // The redeem gate is re-checked by the store write; if another
        // scan landed first, this fails instead of replacing its entry.
        let updated = self.ticket_repo.update_redeeming(&ticket).await?;
        info!("Ticket validated: {} by {}", updated.id, validator_id);
        Ok(updated)
    }
}
