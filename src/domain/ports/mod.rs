use crate::domain::models::{event::Event, ticket::Ticket};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Inserts the ticket and reserves its quantity against the event's
    /// capacity in one transaction. Fails without side effects when the
    /// event is missing, capacity would be exceeded, or the buyer would
    /// go over the event's `per_user_limit` as stored at reservation time.
    async fn create_reserving(&self, ticket: &Ticket) -> Result<Ticket, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Ticket>, AppError>;
    /// Persists the ticket's validation entries, but only while the stored
    /// ticket is still unredeemed. The first scan to land wins; any later
    /// write fails `AlreadyRedeemed` and leaves the stored entry untouched.
    async fn update_redeeming(&self, ticket: &Ticket) -> Result<Ticket, AppError>;
}
