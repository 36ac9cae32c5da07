use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::Payload;

/// Pretty-printed JSON (2-space indent, non-ASCII kept as is) with a trailing newline.
pub fn to_json_string(payload: &Payload) -> Result<String> {
    let mut out = serde_json::to_string_pretty(payload).context("serializing payload")?;
    out.push('\n');
    Ok(out)
}

/// Write `payload` to `path` atomically: to a temp file in the same
/// directory, then persisted over the destination.
#[instrument(level = "info", skip(payload, path), fields(path = %path.as_ref().display()))]
pub fn write_payload<P: AsRef<Path>>(payload: &Payload, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    tmp.write_all(to_json_string(payload)?.as_bytes())
        .with_context(|| format!("writing {:?}", tmp.path()))?;
    tmp.flush()?;

    tmp.persist(path)
        .with_context(|| format!("persisting output to {:?}", path))?;
    debug!(regions = payload.regions.len(), "payload written");
    Ok(())
}
