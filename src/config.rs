/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub start_muted: bool,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Simulation tick length. Speeds are tuned for ~16 ms ticks.
    pub tick_rate_ms: u64,
    /// Power-mode duration, in ticks.
    pub power_mode_ticks: u32,
    /// Interval between fruit offers, in ticks.
    pub fruit_spawn_ticks: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    audio: TomlAudio,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_power_ticks")]
    power_mode_ticks: u32,
    #[serde(default = "default_fruit_ticks")]
    fruit_spawn_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default)]
    start_muted: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_power_ticks() -> u32 { 625 }   // 10 s at 16 ms ticks
fn default_fruit_ticks() -> u32 { 1875 }  // 30 s at 16 ms ticks

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            power_mode_ticks: default_power_ticks(),
            fruit_spawn_ticks: default_fruit_ticks(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { start_muted: false }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms,
                power_mode_ticks: toml_cfg.timing.power_mode_ticks,
                fruit_spawn_ticks: toml_cfg.timing.fruit_spawn_ticks,
            },
            start_muted: toml_cfg.audio.start_muted,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
