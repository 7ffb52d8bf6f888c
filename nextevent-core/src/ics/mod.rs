//! ICS feed parsing.
//!
//! Only the parts of RFC 5545 needed to find the next event are read:
//! VEVENT components with their SUMMARY and DTSTART.

mod parse;

pub use parse::parse_calendar;
