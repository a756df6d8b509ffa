/// Video tags through an external metadata tool
///
/// The tool is run once per file as `<program> -json -n <file>` and is
/// expected to print a one-element JSON array of tag objects (ExifTool's
/// format). A tool that is missing, fails, hangs past the timeout or prints
/// something else simply produces no tags.
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::process::Command;

use super::metadata::{coerce_coordinate, resolve_date, VIDEO_DATE_KEYS};
use crate::state::data::MediaMetadata;

pub async fn read_video_tags(program: &Path, path: &Path, timeout: Duration) -> Option<Map<String, Value>> {
    let run = Command::new(program)
        .arg("-json")
        .arg("-n")
        .arg(path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, run).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::debug!("Could not run {}: {}", program.display(), e);
            return None;
        }
        Err(_) => {
            log::debug!("Tag read timed out after {:?}: {}", timeout, path.display());
            return None;
        }
    };

    if !output.status.success() {
        log::debug!(
            "{} failed on {}: {}",
            program.display(),
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    parse_tool_output(&output.stdout)
}

/// First object of the tool's JSON array
pub fn parse_tool_output(stdout: &[u8]) -> Option<Map<String, Value>> {
    let parsed: Vec<Map<String, Value>> = serde_json::from_slice(stdout).ok()?;
    parsed.into_iter().next()
}

pub fn metadata_from_tags(tags: &Map<String, Value>) -> MediaMetadata {
    MediaMetadata {
        latitude: tags.get("GPSLatitude").and_then(coerce_coordinate),
        longitude: tags.get("GPSLongitude").and_then(coerce_coordinate),
        date_taken: resolve_date(tags, &VIDEO_DATE_KEYS),
    }
}
