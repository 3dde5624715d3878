pub mod event;
pub mod ticket;
