pub mod api;
pub mod api_errors;
pub mod truelayer;
