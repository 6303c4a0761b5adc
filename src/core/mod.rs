//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;

