//! Configuration loading and environment parsing.

use super::validation::validate_config;
use super::Config;
use anyhow::Context;
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SIGNAL_VIEWER__";

/// Load configuration, merging sources in this order (later wins):
/// 1) Defaults compiled into the binary
/// 2) config.json next to the executable
/// 3) config.json in the current working directory
/// 4) File pointed to by `SIGNAL_VIEWER_CONFIG_PATH`
/// 5) JSON from stdin when `SIGNAL_VIEWER_CONFIG_STDIN=true/1`
/// 6) `SIGNAL_VIEWER_CONFIG_JSON` env var containing raw JSON
///
/// Individual fields are then overridden by `SIGNAL_VIEWER__` variables using
/// "__" as the nested separator, e.g. `SIGNAL_VIEWER__API__BASE_URL=https://...`
/// or `SIGNAL_VIEWER__LOGGING__LEVEL=debug`. An override replacing a string
/// stays a string, so `..__USER_AGENT=123` is the text "123". Unreadable or
/// unparsable sources are reported on stderr and skipped.
///
/// Fails when the merged document does not fit [`Config`]; the other sources
/// are never silently replaced by defaults. Validation errors are printed but
/// not propagated; callers needing hard failure call [`validate_config`].
pub fn load() -> anyhow::Result<Config> {
    let mut merged = serde_json::to_value(Config::default())
        .context("Failed to serialize default configuration")?;

    for source in file_sources() {
        merge_file_source(&mut merged, &source);
    }

    if env::var("SIGNAL_VIEWER_CONFIG_STDIN").is_ok_and(|val| env_var_truthy(&val)) {
        let mut buf = String::new();
        match std::io::stdin().read_to_string(&mut buf) {
            Ok(_) => merge_document(&mut merged, &buf, "stdin"),
            Err(e) => eprintln!("Failed to read config from stdin: {e}"),
        }
    }

    if let Ok(json) = env::var("SIGNAL_VIEWER_CONFIG_JSON") {
        merge_document(&mut merged, &json, "SIGNAL_VIEWER_CONFIG_JSON");
    }

    apply_env_overrides(&mut merged, env::vars());

    let config: Config =
        serde_json::from_value(merged).context("Failed to deserialize merged configuration")?;

    // Warn only; main.rs validates again and fails hard.
    if let Err(e) = validate_config(&config) {
        eprintln!("Configuration validation error: {e}");
    }

    Ok(config)
}

fn file_sources() -> Vec<PathBuf> {
    let mut sources = Vec::with_capacity(3);
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        sources.push(exe_dir.join("config.json"));
    }
    sources.push(PathBuf::from("config.json"));
    if let Ok(path) = env::var("SIGNAL_VIEWER_CONFIG_PATH") {
        sources.push(PathBuf::from(path));
    }
    sources
}

fn merge_document(target: &mut Value, raw: &str, label: &str) {
    if raw.trim().is_empty() {
        return;
    }
    match serde_json::from_str(raw) {
        Ok(value) => merge_values(target, value),
        Err(err) => eprintln!("Failed to parse config from {label}: {err}"),
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => merge_document(target, &contents, &format!("file {}", path.display())),
        Err(err) => eprintln!("Failed to read config from {}: {err}", path.display()),
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => *target_slot = source_value,
    }
}

fn apply_env_overrides(root: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, raw_value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        let path: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if let Some(slot) = slot_for_path(root, &path) {
            let value = override_value(slot, &raw_value);
            *slot = value;
        }
    }
}

/// Walk to the slot named by `path`, creating intermediate objects.
fn slot_for_path<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for segment in parents {
        current = ensure_object(current)
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Some(
        ensure_object(current)
            .entry(last.clone())
            .or_insert(Value::Null),
    )
}

/// Parse `raw` in light of the value it replaces.
fn override_value(existing: &Value, raw: &str) -> Value {
    let trimmed = raw.trim();
    match existing {
        Value::String(_) => Value::String(trimmed.to_owned()),
        Value::Array(_) => Value::Array(
            trimmed
                .split(',')
                .map(|item| parse_scalar(item.trim()))
                .collect(),
        ),
        _ => parse_scalar(trimmed),
    }
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn env_var_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }

    // SAFETY: The branch above guarantees `value` is a `Value::Object`.
    #[allow(clippy::expect_used)]
    value
        .as_object_mut()
        .expect("value should be coerced into an object")
}
