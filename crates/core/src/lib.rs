//! Core types and shared logic for the Atlas country data service.
//!
//! This crate defines what every other crate agrees on:
//! - Application configuration (server, metadata backend, upstream APIs,
//!   summary image output)
//! - The estimated-GDP derivation

pub mod config;
pub mod gdp;

pub use config::{AppConfig, MetadataConfig, ServerConfig, SummaryConfig, UpstreamConfig};
pub use gdp::estimate_gdp;
