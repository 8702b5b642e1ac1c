// storefront/src/lib.rs

//! A small e-commerce storefront: catalog browsing, a per-user cart, and a
//! checkout flow that converts a cart into a persisted order through a
//! compensating workflow pipeline.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
