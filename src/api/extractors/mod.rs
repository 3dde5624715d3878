pub mod maybe_user;
pub mod user;
