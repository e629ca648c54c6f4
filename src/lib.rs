pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod scheduling;
pub mod services;

pub use config::Config;
pub use error::{AgendaError, AppError};
