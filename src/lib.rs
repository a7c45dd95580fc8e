pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod server;
