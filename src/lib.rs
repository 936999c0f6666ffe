//! Guest Seating - compatibility-driven grouping and table assignment
//!
//! This crate partitions the guests of a hosted event into small groups of
//! compatible strangers and seats each group at a restaurant table, within
//! the capacity of every table and restaurant, producing a deterministic,
//! auditable distribution report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
