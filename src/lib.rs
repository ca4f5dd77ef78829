pub mod config;
pub mod editor;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

pub use crate::error::{EditError, Error, Result};
pub use crate::models::failure::Failure;
pub use crate::session::{Session, SessionReport, SessionScript};
