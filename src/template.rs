//! Template helpers shared by the feed and the HTML pages.
//!
//! | Name                      | Kind     | Output                          |
//! |---------------------------|----------|---------------------------------|
//! | `xmlescape`               | filter   | XML-escaped text                |
//! | `timefmt(layout="...")`   | filter   | strftime-formatted RFC 3339 time |
//! | `now()`                   | function | current time, RFC 3339 UTC      |

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use tera::{Error, Tera, Value};

use crate::utils::date;

/// Source of "now". Injectable so feed output is deterministic in tests.
pub type Clock = fn() -> DateTime<Utc>;

/// Wall clock.
pub fn system_clock() -> DateTime<Utc> {
    Utc::now()
}

/// Layout used by `timefmt` when none is given.
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Register `xmlescape`, `timefmt` and `now` on a tera instance.
pub fn register_helpers(tera: &mut Tera, clock: Clock) {
    tera.register_filter("xmlescape", xmlescape);
    tera.register_filter("timefmt", timefmt);
    tera.register_function("now", move |_: &HashMap<String, Value>| {
        Ok(Value::String(date::to_rfc3339(clock())))
    });
}

fn xmlescape(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(Value::String(quick_xml::escape::escape(text.as_str()).into_owned()))
}

fn timefmt(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| Error::msg("timefmt filter requires an RFC 3339 string"))?;
    let dt = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| Error::msg(format!("timefmt: cannot parse `{raw}`: {e}")))?
        .with_timezone(&Utc);

    let layout = match args.get("layout") {
        Some(Value::String(layout)) => layout.as_str(),
        Some(_) => return Err(Error::msg("timefmt: `layout` must be a string")),
        None => DEFAULT_TIME_LAYOUT,
    };

    // chrono reports bad specifiers through fmt::Error
    let mut out = String::new();
    write!(out, "{}", dt.format(layout))
        .map_err(|_| Error::msg(format!("timefmt: invalid layout `{layout}`")))?;
    Ok(Value::String(out))
}
