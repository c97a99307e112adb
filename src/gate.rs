use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref DATE_TIME_SEPARATOR: Regex = Regex::new("[T\\s]+").unwrap();
}

/// Optional open/close bounds read from the config store at session start.
/// A missing or unparsable bound leaves that side unbounded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GateWindow {
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateState {
    BeforeOpen,
    Open,
    AfterClose,
}

impl GateWindow {
    pub fn from_stored(open: Option<&str>, close: Option<&str>) -> Self {
        GateWindow {
            opens_at: open.and_then(parse_flexible),
            closes_at: close.and_then(parse_flexible),
        }
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> GateState {
        if let Some(opens_at) = self.opens_at {
            if now < opens_at {
                return GateState::BeforeOpen;
            }
        }
        if let Some(closes_at) = self.closes_at {
            if now > closes_at {
                return GateState::AfterClose;
            }
        }
        GateState::Open
    }
}

/// Accepts RFC 3339 timestamps as well as `YYYY-MM-DD HH:MM[:SS]` with either
/// a space or a `T` between date and time. Naive forms are taken as UTC.
/// Anything else is treated as "no bound", never as an error.
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let normalized = DATE_TIME_SEPARATOR.replace_all(raw, " ");
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    debug!("ignoring unparsable gate bound: {}", raw);
    None
}
