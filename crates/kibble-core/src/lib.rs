//! Core types and pure logic for the Kibble feeding tracker.
//!
//! Holds the energy table and calorie calculator, the feeding event types,
//! the time-series aggregator, and the [`store::FeedingStore`] trait. Nothing
//! here touches HTTP or a database; every other crate depends on this one.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod error;
pub mod feeding;
pub mod food;
pub mod store;
pub mod subject;

pub use error::{Error, Result};
