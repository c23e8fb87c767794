pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod models;
pub mod store;
pub const BASE_URL: &str = "http://localhost:3001";
pub const TASKS_API: &str = "tasks";
