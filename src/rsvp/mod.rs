pub mod expenses;
pub mod export;
pub mod guests;
pub mod menu;
pub mod money;
pub mod report;
pub mod responses;
