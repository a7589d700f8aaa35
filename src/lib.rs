//! Ride-sharing coordination service.
//!
//! Backend for a university carpooling community: third-party-verified
//! login, session-gated ride posts with driver/passenger slot
//! assignment, abuse reports, and push notification fan-out on post
//! updates.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers and route wiring
//! - `models`: users, ride posts, reports
//! - `services`: login flow, post lifecycle, identity verification, push
//! - `db`: repository traits and Postgres implementations
//! - `middleware`: session-gate extractor
//! - `state`: injected collaborator set
//! - `error`: error types and the response envelope
//! - `config`: configuration management

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
