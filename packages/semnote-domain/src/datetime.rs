//! Lenient ISO-8601 parsing for timestamps read back from the vector store.
//!
//! Stored timestamps are plain strings in a free-form metadata map, so anything
//! may show up there. Parsing never fails loudly: a value that is not a string,
//! or a string in none of the accepted shapes, yields `None`.

use serde_json::Value;
use time::{
	Date, OffsetDateTime, PrimitiveDateTime,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::format_description,
};

const NAIVE_FORMATS: [&[BorrowedFormatItem<'static>]; 6] = [
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
	format_description!("[year]-[month]-[day]T[hour]:[minute]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]"),
];
const OFFSET_FORMATS: [&[BorrowedFormatItem<'static>]; 4] = [
	format_description!(
		"[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
	),
	format_description!(
		"[year]-[month]-[day] [hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
	),
	format_description!(
		"[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
	),
	format_description!(
		"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
	),
];
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse(value: &Value) -> Option<OffsetDateTime> {
	value.as_str().and_then(parse_str)
}

/// Offset-less inputs are taken as UTC; a bare date is midnight UTC.
pub fn parse_str(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(ts);
	}

	let zoned = match raw.strip_suffix(['Z', 'z']) {
		Some(rest) => format!("{rest}+00:00"),
		None => raw.to_string(),
	};

	for format in OFFSET_FORMATS {
		if let Ok(ts) = OffsetDateTime::parse(&zoned, format) {
			return Some(ts);
		}
	}

	for format in NAIVE_FORMATS {
		if let Ok(ts) = PrimitiveDateTime::parse(raw, format) {
			return Some(ts.assume_utc());
		}
	}

	Date::parse(raw, DATE_FORMAT).ok().map(|date| date.midnight().assume_utc())
}
