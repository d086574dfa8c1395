//! Key=value settings store with an explicit field schema.
//!
//! One setting per line (`key=value`), `#` lines and blanks ignored. A
//! `settings_version` marker detects schema drift: a missing or mismatched
//! version triggers a full rewrite of the file with the merged current
//! values, so stale files heal themselves on the next load.
//!
//! Field mapping is an explicit match over key names — no runtime
//! introspection. A line that fails to parse only loses its own field:
//! the value loaded on top of (default or running) is kept, a warning is
//! logged, and loading continues.

use crate::tuning::Tuning;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Bump when the field set changes shape; old files get rewritten.
pub const SETTINGS_VERSION: u32 = 1;

const VERSION_KEY: &str = "settings_version";

enum FieldError {
    UnknownKey,
    Invalid(String),
}

fn parse_value<T: std::str::FromStr>(raw: &str) -> std::result::Result<T, FieldError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| FieldError::Invalid(format!("{}", e)))
}

/// The explicit schema: one arm per tunable.
fn apply_field(tuning: &mut Tuning, key: &str, raw: &str) -> std::result::Result<(), FieldError> {
    match key {
        "max_intensity" => tuning.max_intensity = parse_value(raw)?,
        "normal_falloff_rate" => tuning.normal_falloff_rate = parse_value(raw)?,
        "saturated_falloff_rate" => tuning.saturated_falloff_rate = parse_value(raw)?,
        "saturation_threshold" => tuning.saturation_threshold = parse_value(raw)?,
        "saturation_duration" => tuning.saturation_duration = parse_value(raw)?,
        "saturation_amplify" => tuning.saturation_amplify = parse_value(raw)?,
        "saturation_extend_time" => tuning.saturation_extend_time = parse_value(raw)?,
        "thrust_delta" => tuning.thrust_delta = parse_value(raw)?,
        "climax_delta" => tuning.climax_delta = parse_value(raw)?,
        "climax_saturation_bonus" => tuning.climax_saturation_bonus = parse_value(raw)?,
        "peak_delta" => tuning.peak_delta = parse_value(raw)?,
        "host" => tuning.host = raw.to_string(),
        "port" => tuning.port = parse_value(raw)?,
        _ => return Err(FieldError::UnknownKey),
    }
    Ok(())
}

/// Render a tuning set in file format, version marker first.
pub fn render(tuning: &Tuning) -> String {
    let mut out = String::new();
    out.push_str("# pulse tuning file\n");
    let _ = writeln!(out, "{}={}", VERSION_KEY, SETTINGS_VERSION);
    let _ = writeln!(out, "max_intensity={}", tuning.max_intensity);
    let _ = writeln!(out, "normal_falloff_rate={}", tuning.normal_falloff_rate);
    let _ = writeln!(out, "saturated_falloff_rate={}", tuning.saturated_falloff_rate);
    let _ = writeln!(out, "saturation_threshold={}", tuning.saturation_threshold);
    let _ = writeln!(out, "saturation_duration={}", tuning.saturation_duration);
    let _ = writeln!(out, "saturation_amplify={}", tuning.saturation_amplify);
    let _ = writeln!(out, "saturation_extend_time={}", tuning.saturation_extend_time);
    let _ = writeln!(out, "thrust_delta={}", tuning.thrust_delta);
    let _ = writeln!(out, "climax_delta={}", tuning.climax_delta);
    let _ = writeln!(out, "climax_saturation_bonus={}", tuning.climax_saturation_bonus);
    let _ = writeln!(out, "peak_delta={}", tuning.peak_delta);
    let _ = writeln!(out, "host={}", tuning.host);
    let _ = writeln!(out, "port={}", tuning.port);
    out
}

/// Parse file content onto `base`. Fields that are missing or fail to
/// parse keep the base value. Returns the tuning plus whether the file
/// needs a rewrite (missing or mismatched version marker).
fn parse(content: &str, base: Tuning) -> (Tuning, bool) {
    let mut tuning = base;
    let mut version_seen = false;
    let mut needs_rewrite = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw)) = line.split_once('=') else {
            tracing::warn!("malformed settings line '{}', skipping", line);
            continue;
        };
        let (key, raw) = (key.trim(), raw.trim());

        if key == VERSION_KEY {
            version_seen = true;
            match raw.parse::<u32>() {
                Ok(v) if v == SETTINGS_VERSION => {}
                Ok(v) => {
                    tracing::warn!(
                        "settings version {} (expected {}), rewriting file",
                        v,
                        SETTINGS_VERSION
                    );
                    needs_rewrite = true;
                }
                Err(_) => {
                    tracing::warn!("unreadable settings version '{}', rewriting file", raw);
                    needs_rewrite = true;
                }
            }
            continue;
        }

        match apply_field(&mut tuning, key, raw) {
            Ok(()) => {}
            Err(FieldError::UnknownKey) => {
                tracing::warn!("unknown settings key '{}', ignoring", key);
            }
            Err(FieldError::Invalid(e)) => {
                tracing::warn!("bad value for '{}': {}; keeping previous value", key, e);
            }
        }
    }

    if !version_seen {
        needs_rewrite = true;
    }

    (tuning, needs_rewrite)
}

/// Load tuning from `path` on top of defaults. A missing file is created
/// with defaults; a stale or unversioned file is rewritten with the merged
/// values.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Tuning> {
    load_with(path, Tuning::default())
}

/// Load tuning from `path` on top of `base`. Fields that are missing or
/// fail to parse keep the base value, so a reload after a bad edit
/// degrades to "keep what was running". A missing file is written out
/// from `base`.
pub fn load_with<P: AsRef<Path>>(path: P, base: Tuning) -> Result<Tuning> {
    let path = path.as_ref();

    if !path.exists() {
        save(path, &base)?;
        tracing::info!("wrote settings to {}", path.display());
        return Ok(base);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file: {}", path.display()))?;
    let (tuning, needs_rewrite) = parse(&content, base);

    if needs_rewrite {
        save(path, &tuning)?;
        tracing::info!("rewrote settings file {}", path.display());
    }

    Ok(tuning)
}

/// Write the full tuning set to `path` in file format.
pub fn save<P: AsRef<Path>>(path: P, tuning: &Tuning) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render(tuning))
        .with_context(|| format!("failed to write settings file: {}", path.display()))
}
