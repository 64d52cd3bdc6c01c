//! Quote Engine library crate.
//!
//! This crate exposes the export landed-cost estimator and API
//! components as reusable modules.  External applications may depend
//! on the `quote_engine` crate and call into [`engine::estimate`]
//! directly or embed the HTTP surface via [`api::build_router`].

pub mod api;
pub mod engine;
pub mod models;
pub mod rates;
