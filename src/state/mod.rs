//! State module for tracking what happened to each page
//!
//! `PageOutcome` is the terminal state of one fetched or replayed page; the
//! run summary counts pages by outcome.

mod outcome;

pub use outcome::PageOutcome;
