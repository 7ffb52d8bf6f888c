//! ICS parsing using the icalendar crate's parser.

use chrono::{Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};
use log::debug;

use crate::error::{NextEventError, NextEventResult};
use crate::event::{CalendarEvent, EventStart};

/// Parse a whole calendar document into its events, in document order.
///
/// Timed starts are converted to `local`. VEVENTs without DTSTART are
/// skipped; a DTSTART that cannot be read fails the whole document.
pub fn parse_calendar(content: &str, local: Tz) -> NextEventResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);

    if !unfolded
        .trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with("BEGIN:VCALENDAR")
    {
        return Err(NextEventError::IcsParse(
            "document does not start with BEGIN:VCALENDAR".into(),
        ));
    }

    let calendar = read_calendar(&unfolded).map_err(|e| NextEventError::IcsParse(e.to_string()))?;

    let mut events = Vec::new();

    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        let title = vevent
            .find_prop("SUMMARY")
            .map(|p| unescape_text(p.val.as_ref()))
            .unwrap_or_default();

        let Some(dtstart) = vevent.find_prop("DTSTART") else {
            debug!("Skipping event '{title}' without DTSTART");
            continue;
        };

        let start = DatePerhapsTime::try_from(dtstart).map_err(|_| {
            NextEventError::IcsParse(format!(
                "invalid DTSTART '{}' in event '{}'",
                dtstart.val.as_ref(),
                title
            ))
        })?;

        events.push(CalendarEvent {
            title,
            start: to_event_start(start, local),
        });
    }

    Ok(events)
}

fn to_event_start(dpt: DatePerhapsTime, local: Tz) -> EventStart {
    match dpt {
        DatePerhapsTime::Date(d) => EventStart::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => EventStart::DateTime(match cal_dt {
            CalendarDateTime::Utc(dt) => dt.with_timezone(&local),
            CalendarDateTime::Floating(naive) => localize(local, naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tzid = tzid.trim_matches('"');
                match tzid.parse::<Tz>() {
                    Ok(tz) => localize(tz, date_time).with_timezone(&local),
                    Err(_) => {
                        // Non-IANA TZIDs (e.g. Windows zone names) are read as local time
                        debug!("Unknown TZID '{tzid}', treating as local time");
                        localize(local, date_time)
                    }
                }
            }
        }),
    }
}

/// Place a wall-clock time in `tz`. Ambiguous times (DST fold) take the
/// earlier instant; nonexistent ones (DST gap) move forward one hour.
fn localize(tz: Tz, naive: NaiveDateTime) -> chrono::DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
