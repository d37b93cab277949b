pub mod expense;
pub mod guest;
pub mod response;
