pub mod coordinator;
pub mod token_cache;
