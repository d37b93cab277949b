pub mod admin;
pub mod api;
pub mod expenses;
pub mod export;
pub mod public;
