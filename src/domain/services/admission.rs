use std::sync::Arc;
use crate::domain::models::event::Event;
use crate::domain::models::ticket::{NewTicketParams, Ticket};
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Eligibility {
    pub purchasable: bool,
    pub max_purchasable: i32,
    pub already_booked: i32,
}

pub struct AdmissionEngine {
    ticket_repo: Arc<dyn TicketRepository>,
}

impl AdmissionEngine {
    pub fn new(ticket_repo: Arc<dyn TicketRepository>) -> Self {
        Self { ticket_repo }
    }

    // Ceiling for a single purchase. Not reduced by tickets the buyer
    // already holds; the running per-user total is enforced separately.
    pub fn max_purchasable(event: &Event) -> i32 {
        event.per_user_limit.min(event.tickets_remaining())
    }

    pub async fn load_eligibility(&self, event: &Event, user_id: &str) -> Result<Eligibility, AppError> {
        let tickets = self.ticket_repo.list_by_event(&event.id).await?;
        let already_booked = booked_by_user(&tickets, user_id);

        Ok(Eligibility {
            purchasable: event.tickets_remaining() > 0 && already_booked < event.per_user_limit,
            max_purchasable: Self::max_purchasable(event),
            already_booked,
        })
    }

    pub async fn confirm_booking(
        &self,
        event: &Event,
        user_id: &str,
        quantity: i32,
        promo_code: Option<String>,
        discount: f64,
        total_price: f64,
    ) -> Result<Ticket, AppError> {
        if quantity < 1 {
            return Err(AppError::InvalidQuantity("Quantity must be at least 1".into()));
        }

        let max_allowed = Self::max_purchasable(event);
        if quantity > max_allowed {
            return Err(AppError::InvalidQuantity(format!(
                "At most {} tickets can be purchased for this event",
                max_allowed.max(0)
            )));
        }

        let now = Utc::now();
        if now < event.sales_open_at {
            return Err(AppError::BookingWindowNotYetOpen);
        }
        // The sales window is half-open: [sales_open_at, sales_close_at),
        // further bounded by the event's own start.
        if now >= event.sales_close_at || now >= event.starts_at {
            return Err(AppError::BookingWindowClosed);
        }

        let tickets = self.ticket_repo.list_by_event(&event.id).await?;
        let already_booked = booked_by_user(&tickets, user_id);
        if already_booked + quantity > event.per_user_limit {
            return Err(AppError::PerUserLimitExceeded(format!(
                "Already holding {} of {} allowed tickets for this event",
                already_booked, event.per_user_limit
            )));
        }

        let ticket = Ticket::new(NewTicketParams {
            event_id: event.id.clone(),
            user_id: user_id.to_string(),
            quantity,
            promo_code,
            discount,
            total_price,
        });

        // Capacity and the per-user limit are re-checked inside the
        // repository transaction, against the stored event row.
        let created = self.ticket_repo.create_reserving(&ticket).await?;

        info!(
            "Booking confirmed: ticket {} ({} seats) for event {} by user {}",
            created.id, created.quantity, event.id, user_id
        );

        Ok(created)
    }
}

fn booked_by_user(tickets: &[Ticket], user_id: &str) -> i32 {
    tickets
        .iter()
        .filter(|t| t.user_id == user_id)
        .map(|t| t.quantity)
        .sum()
}
