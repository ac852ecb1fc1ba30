pub mod auth_client;
pub mod listings_client;
pub mod storage_client;
