//! Status bar output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::FeedSettings;
use crate::resolve::ResolvedEvent;

/// What the host status bar receives for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderPayload {
    pub full_text: String,
    /// When the host should ask again
    #[serde(with = "chrono::serde::ts_seconds")]
    pub cached_until: DateTime<Utc>,
    pub urgent: bool,
}

/// Render the resolved event (or its absence) with the configured templates.
pub fn render_event(
    settings: &FeedSettings,
    event: Option<&ResolvedEvent>,
    now: DateTime<Utc>,
) -> RenderPayload {
    let cached_until = now + settings.cache_timeout;

    match event {
        Some(event) => RenderPayload {
            full_text: format_template(
                &settings.format,
                &[("title", event.title.as_str()), ("time", event.time_label().as_str())],
            ),
            cached_until,
            urgent: event.is_urgent,
        },
        None => RenderPayload {
            full_text: format_template(&settings.format_none, &[]),
            cached_until,
            urgent: false,
        },
    }
}

/// Substitute `{name}` placeholders in a single scan of the template.
///
/// Substituted values are never scanned again, so a title containing
/// `{time}` is printed literally. Unknown placeholders are left as-is.
pub fn format_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];

        let Some(close) = rest.find('}') else {
            break;
        };
        let name = &rest[1..close];

        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &rest[close + 1..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FeedSource;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn settings() -> FeedSettings {
        FeedSettings {
            source: FeedSource::new("https://example.com/cal.ics").unwrap(),
            cache_timeout: Duration::seconds(60),
            cache_ics_timeout: Duration::seconds(900),
            format: "{title} @ {time}".to_string(),
            format_none: "no events".to_string(),
            urgent_time: Duration::minutes(15),
            timezone: chrono_tz::UTC,
            store_path: "/unused".into(),
            config_epoch: now() - Duration::days(1),
        }
    }

    #[test]
    fn renders_event_with_template() {
        let event = ResolvedEvent {
            title: "A_B".to_string(),
            start: Utc
                .with_ymd_and_hms(2026, 10, 16, 12, 10, 0)
                .unwrap()
                .with_timezone(&chrono_tz::UTC),
            is_urgent: true,
        };

        let payload = render_event(&settings(), Some(&event), now());

        assert_eq!(payload.full_text, "A_B @ Fri 16 Oct 2026 12:10 UTC");
        assert_eq!(payload.cached_until, now() + Duration::seconds(60));
        assert!(payload.urgent);
    }

    #[test]
    fn renders_empty_template_without_urgency() {
        let payload = render_event(&settings(), None, now());

        assert_eq!(payload.full_text, "no events");
        assert!(!payload.urgent);
    }

    #[test]
    fn payload_serializes_deadline_as_epoch_seconds() {
        let payload = render_event(&settings(), None, now());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["cached_until"], now().timestamp() + 60);
        assert_eq!(json["urgent"], false);
    }

    #[test]
    fn placeholders_inside_values_are_not_expanded() {
        assert_eq!(
            format_template(
                "{title} @ {time}",
                &[
                    ("title", "Review {time} slot"),
                    ("time", "Fri 16 Oct 2026 12:10 UTC"),
                ],
            ),
            "Review {time} slot @ Fri 16 Oct 2026 12:10 UTC"
        );
    }

    #[test]
    fn unbalanced_braces_are_kept() {
        assert_eq!(format_template("{{title}} {time", &[("title", "x")]), "{x} {time");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        assert_eq!(
            format_template("{title} {where}", &[("title", "x")]),
            "x {where}"
        );
    }
}
