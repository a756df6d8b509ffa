/// EXIF extraction for image files (kamadak-exif)
///
/// GPS comes from the rational DMS tags converted to decimal degrees.
/// Dates come from a flat tag map so the same candidate lookup can be
/// used as for videos.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Context, Exif, Field, In, Tag, Value};
use serde_json::{Map, Value as JsonValue};

use super::metadata::{resolve_date, IMAGE_DATE_KEYS};
use crate::state::data::MediaMetadata;

/// Read GPS and capture date from an image. Blocking.
pub fn read_image_metadata(path: &Path) -> MediaMetadata {
    let exif = match read_exif(path) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("No EXIF in {}: {}", path.display(), e);
            return MediaMetadata::default();
        }
    };

    let primary = |tag| exif.get_field(tag, In::PRIMARY);

    MediaMetadata {
        latitude: primary(Tag::GPSLatitude).and_then(|field| {
            signed_coordinate(&field.value, primary(Tag::GPSLatitudeRef).map(|f| &f.value), "S")
        }),
        longitude: primary(Tag::GPSLongitude).and_then(|field| {
            signed_coordinate(&field.value, primary(Tag::GPSLongitudeRef).map(|f| &f.value), "W")
        }),
        date_taken: resolve_date(&date_tag_map(exif.fields()), &IMAGE_DATE_KEYS),
    }
}

fn read_exif(path: &Path) -> Result<Exif, exif::Error> {
    let file = File::open(path).map_err(exif::Error::Io)?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader)
}

/// Decimal degrees from a DMS rational triple, negated when the reference
/// equals `negative_ref` (S or W)
pub fn signed_coordinate(value: &Value, reference: Option<&Value>, negative_ref: &str) -> Option<f64> {
    let magnitude = dms_to_degrees(value)?;
    let negative = reference
        .and_then(first_ascii)
        .is_some_and(|r| r.trim().eq_ignore_ascii_case(negative_ref));

    let degrees = if negative { -magnitude } else { magnitude };
    degrees.is_finite().then_some(degrees)
}

fn dms_to_degrees(value: &Value) -> Option<f64> {
    let Value::Rational(rats) = value else {
        return None;
    };
    if rats.len() < 3 || rats[..3].iter().any(|r| r.denom == 0) {
        return None;
    }
    Some(rats[0].to_f64() + rats[1].to_f64() / 60.0 + rats[2].to_f64() / 3600.0)
}

fn first_ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn ifd_label(tag: Tag) -> &'static str {
    match tag.context() {
        Context::Tiff => "Image",
        Context::Exif => "EXIF",
        Context::Gps => "GPS",
        _ => "Interop",
    }
}

/// Flatten the primary-image ASCII fields into a tag map.
///
/// Each field is stored under its bare name and its IFD-qualified name.
/// `DateTimeDigitized` and `DateTime` are also stored under their common
/// aliases `CreateDate` and `ModifyDate`.
pub fn date_tag_map<'a>(fields: impl Iterator<Item = &'a Field>) -> Map<String, JsonValue> {
    let mut map = Map::new();

    for field in fields.filter(|f| f.ifd_num == In::PRIMARY) {
        let Some(text) = first_ascii(&field.value) else {
            continue;
        };

        let name = field.tag.to_string();
        let mut keys = vec![format!("{} {}", ifd_label(field.tag), name), name];
        if field.tag == Tag::DateTimeDigitized {
            keys.push("CreateDate".to_string());
        } else if field.tag == Tag::DateTime {
            keys.push("ModifyDate".to_string());
        }

        for key in keys {
            map.entry(key)
                .or_insert_with(|| JsonValue::String(text.clone()));
        }
    }

    map
}
