use std::sync::Arc;
use crate::domain::ports::{EventRepository, TicketRepository};
use crate::domain::services::admission::AdmissionEngine;
use crate::domain::services::validation::ValidationService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub admission_engine: Arc<AdmissionEngine>,
    pub validation_service: Arc<ValidationService>,
}
