//! Calendar event types.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// Start of an event as found in DTSTART.
#[derive(Debug, Clone, PartialEq)]
pub enum EventStart {
    /// Whole-day event (no time of day)
    Date(NaiveDate),
    /// Timed event, normalized to the display timezone
    DateTime(DateTime<Tz>),
}

/// A VEVENT reduced to what the resolver looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: EventStart,
}

impl CalendarEvent {
    pub fn is_all_day(&self) -> bool {
        matches!(self.start, EventStart::Date(_))
    }

    /// Start instant of a timed event; `None` for whole-day events.
    pub fn start_instant(&self) -> Option<DateTime<Tz>> {
        match self.start {
            EventStart::DateTime(dt) => Some(dt),
            EventStart::Date(_) => None,
        }
    }
}
