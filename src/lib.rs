pub mod clients;
pub mod config;
pub mod form;
pub mod logger;
pub mod models;
pub mod session;
pub mod upload;
