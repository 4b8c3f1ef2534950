pub mod error;
pub mod payment;
pub mod provider;
pub mod repository;
