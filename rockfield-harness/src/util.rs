use anyhow::{anyhow, Context, Result};
use rockfield_core::EngineConfig;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A session seed, written in decimal or as `0x`-prefixed hex.
pub fn parse_seed(text: &str) -> Result<u32> {
    let text = text.trim();
    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        _ => (text, 10),
    };
    if digits.is_empty() {
        return Err(anyhow!("seed has no digits: {text:?}"));
    }
    u32::from_str_radix(digits, radix).with_context(|| format!("bad seed {text:?}"))
}

/// Seeds are reported as fixed-width hex so sweeps line up.
pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

/// A comma-separated seed list; blank entries are ignored.
pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("--seeds lists no seeds"));
    }
    Ok(seeds)
}

/// `count` consecutive seeds starting at `start`, wrapping at `u32::MAX`.
pub fn seed_range(start: u32, count: u32) -> Vec<u32> {
    (0..count).map(|offset| start.wrapping_add(offset)).collect()
}

/// Reads an [`EngineConfig`] from JSON. Missing fields keep their defaults.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// A tape is one input byte per tick, stored raw.
pub fn read_tape(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed reading tape {}", path.display()))
}

/// Pretty JSON to `path`, or to stdout when no path is given.
pub fn emit_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let encoded = serde_json::to_string_pretty(value).context("failed encoding report")?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating {}", parent.display()))?;
            }
            fs::write(path, encoded)
                .with_context(|| format!("failed writing {}", path.display()))?;
            println!("wrote={}", path.display());
        }
        None => println!("{encoded}"),
    }
    Ok(())
}
