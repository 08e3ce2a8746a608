/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
///
/// The logger is not up yet when this runs (its target comes from here),
/// so problems are collected in `problems` and reported by `main` once
/// logging is initialised.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    /// Fixed RNG seed for reproducible pursuer behaviour.
    pub seed: Option<u64>,
    pub gamepad: GamepadConfig,
    pub log_file: PathBuf,
    /// Where the settings came from; `None` means built-in defaults.
    pub source: Option<PathBuf>,
    pub problems: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }   // ~60 fps, matches the 5 px/frame player speed
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "mazechase.log".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { confirm: default_confirm(), cancel: default_cancel() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        GameConfig::load_from(&candidate_dirs())
    }

    /// First readable `config.toml` in `dirs` wins.
    fn load_from(dirs: &[PathBuf]) -> Self {
        let mut problems = Vec::new();
        for dir in dirs {
            let path = dir.join("config.toml");
            if !path.exists() { continue; }
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let mut cfg = match GameConfig::parse(&text) {
                        Ok(cfg) => cfg,
                        Err(e) => {
                            problems.push(format!("{}: parse error, using defaults: {e}", path.display()));
                            GameConfig::default()
                        }
                    };
                    cfg.source = Some(path);
                    // read problems first, then value problems
                    problems.append(&mut cfg.problems);
                    cfg.problems = problems;
                    return cfg;
                }
                Err(e) => problems.push(format!("could not read {}: {e}", path.display())),
            }
        }
        GameConfig { problems, ..GameConfig::default() }
    }

    /// Parse a TOML document; absent keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let mut problems = Vec::new();
        let tick_rate_ms = if cfg.timing.tick_rate_ms == 0 {
            problems.push("timing.tick_rate_ms must be positive, using default".to_string());
            default_tick_rate()
        } else {
            cfg.timing.tick_rate_ms
        };

        GameConfig {
            tick_rate_ms,
            seed: cfg.game.seed,
            gamepad: GamepadConfig { confirm: cfg.gamepad.confirm, cancel: cfg.gamepad.cancel },
            log_file: PathBuf::from(cfg.log.file),
            source: None,
            problems,
        }
    }

    /// Resolve the log file: absolute paths as given, relative ones next to the config.
    pub fn log_path(&self) -> PathBuf {
        if self.log_file.is_absolute() { return self.log_file.clone(); }
        match self.source.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(&self.log_file),
            None => self.log_file.clone(),
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // resolve symlinks so an installed link still finds the real binary's dir
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.tick_rate_ms, 16);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
        assert_eq!(cfg.gamepad.cancel, vec!["Select".to_string()]);
        assert_eq!(cfg.log_file, PathBuf::from("mazechase.log"));
        assert!(cfg.problems.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            r#"
            [timing]
            tick_rate_ms = 33

            [game]
            seed = 7

            [gamepad]
            cancel = ["B"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tick_rate_ms, 33);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
        assert_eq!(cfg.gamepad.cancel, vec!["B".to_string()]);
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let cfg = GameConfig::parse("[timing]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.tick_rate_ms, 16);
        assert_eq!(cfg.problems.len(), 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[timing\ntick_rate_ms = ").is_err());
        assert!(GameConfig::parse("[timing]\ntick_rate_ms = \"fast\"").is_err());
    }

    #[test]
    fn loaded_file_keeps_value_problems() {
        let dir = std::env::temp_dir().join(format!("mazechase-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[timing]\ntick_rate_ms = 0\n").unwrap();

        let missing = dir.join("nowhere");
        let cfg = GameConfig::load_from(&[missing, dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(cfg.source, Some(dir.join("config.toml")));
        assert_eq!(cfg.tick_rate_ms, 16);
        assert_eq!(cfg.problems.len(), 1);
        assert!(cfg.problems[0].contains("tick_rate_ms"));
    }

    #[test]
    fn no_file_anywhere_gives_defaults() {
        let cfg = GameConfig::load_from(&[std::env::temp_dir().join("mazechase-cfg-absent")]);
        assert_eq!(cfg.source, None);
        assert!(cfg.problems.is_empty());
    }

    #[test]
    fn relative_log_file_sits_next_to_the_config() {
        let mut cfg = GameConfig::parse("[log]\nfile = \"run.log\"").unwrap();
        assert_eq!(cfg.log_path(), PathBuf::from("run.log"));
        cfg.source = Some(PathBuf::from("/opt/mazechase/config.toml"));
        assert_eq!(cfg.log_path(), PathBuf::from("/opt/mazechase/run.log"));
    }
}
