pub mod error_formatter;
pub mod gateway;
pub mod remote;
pub mod toast_service;
