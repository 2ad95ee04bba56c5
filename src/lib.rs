pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod screens;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use app::{router, AppState};
