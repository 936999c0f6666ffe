//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps, errors)
//! - `seating` - Guest profiling, grouping, table allocation and reporting
//!
//! Nothing in this layer performs I/O.

pub mod foundation;
pub mod seating;
