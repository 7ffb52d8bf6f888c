//! Picking the next upcoming event out of a calendar.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::config::FeedSettings;
use crate::error::NextEventResult;
use crate::event::CalendarEvent;
use crate::ics::parse_calendar;

/// weekday, day, month, year, hour:minute, zone abbreviation
pub const TIME_FORMAT: &str = "%a %d %b %Y %H:%M %Z";

/// The event to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    /// Title with `&` replaced, ready for the status bar
    pub title: String,
    pub start: DateTime<Tz>,
    pub is_urgent: bool,
}

impl ResolvedEvent {
    pub fn time_label(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }
}

pub struct EventResolver {
    timezone: Tz,
    urgent_time: Duration,
}

impl EventResolver {
    pub fn new(settings: &FeedSettings) -> Self {
        EventResolver {
            timezone: settings.timezone,
            urgent_time: settings.urgent_time,
        }
    }

    /// The earliest timed event starting strictly after `now`, if any.
    pub fn resolve_next(
        &self,
        calendar_text: &str,
        now: DateTime<Utc>,
    ) -> NextEventResult<Option<ResolvedEvent>> {
        let events = parse_calendar(calendar_text, self.timezone)?;
        debug!("Parsed {} events", events.len());

        Ok(self.next_event(&events, now))
    }

    pub fn next_event(&self, events: &[CalendarEvent], now: DateTime<Utc>) -> Option<ResolvedEvent> {
        let mut best: Option<(&CalendarEvent, DateTime<Tz>)> = None;

        for event in events {
            // Whole-day events are never shown
            let Some(start) = event.start_instant() else {
                continue;
            };
            if start.with_timezone(&Utc) <= now {
                continue;
            }
            // Only a strictly earlier start displaces the held event, so the
            // first of several simultaneous events wins.
            if best.is_some_and(|(_, held)| start >= held) {
                continue;
            }
            best = Some((event, start));
        }

        let (event, start) = best?;
        let delta = start.with_timezone(&Utc) - now;

        Some(ResolvedEvent {
            title: sanitize_title(&event.title),
            start,
            is_urgent: delta < self.urgent_time,
        })
    }
}

/// The status bar renderer mangles `&`, so it is replaced with `_`.
pub fn sanitize_title(title: &str) -> String {
    title.replace('&', "_")
}
