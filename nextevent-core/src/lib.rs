//! Core of nextevent: keep a remote iCalendar feed cached and find the next
//! upcoming event in it.
//!
//! - [`cache::FeedCache`] decides when the feed has to be downloaded again
//! - [`resolve::EventResolver`] picks the next timed event from the feed text
//! - [`render`] turns the result into a status bar payload

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod ics;
pub mod render;
pub mod resolve;
pub mod source;
pub mod store;
pub mod thresholds;

pub use error::{NextEventError, NextEventResult};
