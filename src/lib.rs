//! Figure Store server library
//!
//! Storefront backend for an anime-figure shop: product catalog with
//! title-matched date-windowed discounts, per-user carts, payment-slip
//! checkout and a back-office for fulfillment.
//!
//! # Modules
//!
//! - [`core`] - configuration, shared state and the HTTP server
//! - [`api`] - axum route handlers
//! - [`auth`] - JWT issuance, validation and route guards
//! - [`db`] - embedded SurrealDB, models and repositories
//! - [`pricing`] - discount resolution and money arithmetic
//! - [`checkout`] - order finalization
//! - [`storage`] - uploaded image and slip files
//! - [`utils`] - errors, logging, response envelope

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod pricing;
pub mod storage;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
