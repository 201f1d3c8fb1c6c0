//! leasedesk - property management API.
//!
//! Landlords manage properties, units, leases, rent collection and
//! maintenance; tenants onboard onto a vacant unit, sign their lease, pay
//! and file maintenance requests.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve`, `migrate` and `jobs` entry points
//! - **config**: settings from the environment and shared constants
//! - **domain**: entities, status lifecycles and payload validation
//! - **services**: use cases behind traits, wired by the service container
//! - **infra**: SeaORM persistence, payment gateway and chat adapters
//! - **jobs**: apalis email delivery
//! - **api**: axum handlers, middleware, routes and OpenAPI docs
//! - **types**: response envelope and pagination
//! - **errors**: the application error type
//!
//! # CLI Usage
//!
//! ```bash
//! leasedesk serve --port 3000
//! leasedesk migrate up
//! leasedesk jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Actor, UserRole};
pub use errors::{AppError, AppResult};
