/// Best-effort capture metadata (GPS + date) for scanned files
///
/// Images are read with kamadak-exif, videos through an external tag tool.
/// Nothing here fails outward: a missing tag, a corrupt file or a tool that
/// cannot be started all end up as an omitted field.
use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::task;

use super::{image_tags, video_tags};
use crate::state::data::{MediaKind, MediaMetadata};

/// Date tags tried for images, first defined one wins
pub const IMAGE_DATE_KEYS: [&str; 8] = [
    "DateTimeOriginal",
    "EXIF DateTimeOriginal",
    "CreateDate",
    "DateTime",
    "Image DateTime",
    "ModifyDate",
    "GPSDateStamp",
    "GPS GPSDateStamp",
];

/// Date tags tried for videos, falling back to filesystem dates
pub const VIDEO_DATE_KEYS: [&str; 7] = [
    "DateTimeOriginal",
    "CreateDate",
    "DateTime",
    "ModifyDate",
    "GPSDateStamp",
    "FileCreateDate",
    "FileModifyDate",
];

/// Something that can look up capture metadata for a file
pub trait MetadataReader {
    fn read(&self, path: &Path, kind: MediaKind) -> impl Future<Output = MediaMetadata> + Send;
}

/// Production reader: EXIF for images, the tag tool for videos
#[derive(Debug, Clone)]
pub struct TagReader {
    /// Program invoked for video tags
    pub exiftool: PathBuf,
    /// Upper bound for a single video tag read
    pub timeout: Duration,
}

impl Default for TagReader {
    fn default() -> Self {
        Self {
            exiftool: PathBuf::from("exiftool"),
            timeout: Duration::from_secs(10),
        }
    }
}

impl MetadataReader for TagReader {
    async fn read(&self, path: &Path, kind: MediaKind) -> MediaMetadata {
        match kind {
            MediaKind::Image => read_image_metadata(path).await,
            MediaKind::Video => {
                match video_tags::read_video_tags(&self.exiftool, path, self.timeout).await {
                    Some(tags) => video_tags::metadata_from_tags(&tags),
                    None => MediaMetadata::default(),
                }
            }
        }
    }
}

async fn read_image_metadata(path: &Path) -> MediaMetadata {
    let owned = path.to_path_buf();

    // kamadak-exif does blocking file IO
    match task::spawn_blocking(move || image_tags::read_image_metadata(&owned)).await {
        Ok(meta) => meta,
        Err(e) => {
            log::debug!("EXIF task failed for {}: {}", path.display(), e);
            MediaMetadata::default()
        }
    }
}

/// First candidate key with a non-null value
pub fn first_defined<'a>(tags: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .find(|value| !value.is_null())
}

/// Resolve a capture date from a tag map using an ordered candidate list.
/// Only the first defined candidate is considered.
pub fn resolve_date(tags: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_defined(tags, keys).and_then(date_to_iso)
}

/// Number or numeric string to a finite float
pub fn coerce_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Normalize a tag date to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Strings may use EXIF colon dates (`2023:05:01 12:00:00`); numbers are
/// Unix timestamps in seconds. Anything unparsable yields `None`.
///
/// Values without a zone (the usual EXIF case) are read as UTC, not as the
/// machine's local time, so the same file gives the same date everywhere.
/// Values with an offset are converted to UTC.
pub fn date_to_iso(value: &Value) -> Option<String> {
    let parsed = match value {
        Value::String(text) => parse_date_text(text),
        Value::Number(n) => {
            let millis = (n.as_f64()? * 1000.0).round();
            if !millis.is_finite() {
                return None;
            }
            DateTime::<Utc>::from_timestamp_millis(millis as i64)
        }
        _ => None,
    }?;
    Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let rewritten = rewrite_colon_date(text);
    let mut candidate = rewritten.into_owned();
    if let Some(stripped) = candidate.strip_suffix('Z') {
        candidate = format!("{stripped}+00:00");
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&candidate, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    // Zone-less values are taken as UTC
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&candidate, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `YYYY:MM:DD...` -> `YYYY-MM-DD...`; anything else is returned untouched
fn rewrite_colon_date(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let is_colon_date = bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b':'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b':'
        && bytes[8..10].iter().all(u8::is_ascii_digit);

    if !is_colon_date {
        return Cow::Borrowed(text);
    }
    Cow::Owned(format!(
        "{}-{}-{}{}",
        &text[..4],
        &text[5..7],
        &text[8..10],
        &text[10..]
    ))
}
