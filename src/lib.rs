pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod forms;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod storage;

pub use app::{app, AppState};
