use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fixed asset paths and the outbound link shown on the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub video: String,
    pub audio: String,
    pub logo: String,
    pub avatar: String,
    pub link: String,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            video: "/hologram.mp4".to_string(),
            audio: "/loadingaudio.mp3".to_string(),
            logo: "/solanalogo.png".to_string(),
            avatar: "/loadingavatar.png".to_string(),
            link: "https://photon-sol.tinyastro.io/en/lp/HKuJrP5tYQLbEUdjKwjgnHs2957QKjR2iWhJKTtMa1xs?handle=134697779d2600e3dd417b".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the jitter source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Delay before the overlay reveals its enter control.
    pub reveal_delay_ms: u64,
    /// Playback volume requested on every play attempt.
    pub audio_volume: f32,
    /// Countdown deadline offset from panel mount.
    pub countdown_days: u64,
    pub countdown_period_ms: u64,
    /// Render cadence of the terminal driver.
    pub frame_ms: u64,
    /// How long the terminal driver keeps the panel up. 0 runs forever.
    pub run_secs: u64,
    /// Press enter automatically once revealed.
    pub auto_enter: bool,
    pub assets: Assets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            reveal_delay_ms: 5_000,
            audio_volume: 0.5,
            countdown_days: 10,
            countdown_period_ms: 41,
            frame_ms: 250,
            run_secs: 30,
            auto_enter: true,
            assets: Assets::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            seed: std::env::var("SPLASH_SEED").ok().and_then(|v| v.parse().ok()),
            reveal_delay_ms: std::env::var("REVEAL_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.reveal_delay_ms),
            audio_volume: std::env::var("AUDIO_VOLUME").ok().and_then(|v| v.parse().ok()).unwrap_or(d.audio_volume),
            countdown_days: std::env::var("COUNTDOWN_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.countdown_days),
            countdown_period_ms: std::env::var("COUNTDOWN_PERIOD_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.countdown_period_ms),
            frame_ms: std::env::var("FRAME_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.frame_ms),
            run_secs: std::env::var("RUN_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.run_secs),
            auto_enter: std::env::var("AUTO_ENTER").map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")).unwrap_or(d.auto_enter),
            assets: d.assets,
        }
    }

    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// `CONFIG_PATH` when set, otherwise the environment.
    pub fn load() -> Result<Self> {
        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_json_file(Path::new(&path)),
            Err(_) => Ok(Self::from_env()),
        }
    }
}
