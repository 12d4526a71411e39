//! Penfolio - backend for the pen customization shop
//!
//! This library provides the core functionality of the service: staging of
//! customer customizations, payment-webhook finalization, inventory counter
//! decrements, and order logging to an external spreadsheet.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inventory;
pub mod models;
pub mod sheets;
pub mod staging;
pub mod state;
