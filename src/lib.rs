//! Engage CRM API Client Library
//!
//! This library provides a client SDK for the Engage supporter REST API:
//! the supporter data model with its fixed and custom fields, the field
//! transforms the remote wire schema requires, response parsing, and thin
//! HTTP endpoint accessors.
//!
//! # Modules
//!
//! - `client`: HTTP transport and request methods.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `models`: Record base and the Supporter data model.
//! - `obs`: Observability and logging.
//! - `response`: Response envelope and supporter parsing.
//! - `services`: Supporter and metrics endpoint accessors.
//! - `transforms`: Field-level wire-format transforms.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod obs;
pub mod response;
pub mod services;
pub mod transforms;

pub use client::{ApiClient, Method};
pub use config::Config;
pub use errors::ApiError;
pub use models::{CustomField, Model, Record, Supporter};
pub use response::ResponseEnvelope;
pub use services::{MetricsService, SupporterService};
