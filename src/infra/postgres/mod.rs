pub mod payment_repo;
