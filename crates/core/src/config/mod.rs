use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{particles::Shape, Result, Rgb};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub particles: ParticleConfig,
    pub celebration: CelebrationConfig,
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Absent fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Key the record list is stored under.
    pub storage_key: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            storage_key: "myBooks".to_string(),
        }
    }
}

/// Inclusive-exclusive bounds for a uniformly sampled burst parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Tuning for bursts and per-frame physics. Per-frame terms are expressed
/// at `nominal_fps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub burst_count: usize,
    pub radius: Span,
    pub speed: Span,
    pub gravity: Span,
    pub friction: f32,
    pub fade_per_frame: f32,
    pub cull_margin: f32,
    pub nominal_fps: f32,
    pub palette: Vec<Rgb>,
    pub shapes: Vec<Shape>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            burst_count: 250,
            radius: Span::new(2.0, 6.0),
            speed: Span::new(7.0, 17.0),
            gravity: Span::new(0.04, 0.10),
            friction: 0.995,
            fade_per_frame: 0.012,
            cull_margin: 200.0,
            nominal_fps: 60.0,
            palette: Rgb::FIREWORK_PALETTE.to_vec(),
            shapes: vec![Shape::Circle, Shape::Square, Shape::Triangle],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    /// Background volume while a celebration is running.
    pub duck_volume: f32,
    pub cue_stop_ms: u64,
    pub restore_ms: u64,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            duck_volume: 0.01,
            cue_stop_ms: 3_000,
            restore_ms: 4_000,
        }
    }
}

/// Configuration specific to the audio subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub playlist: Vec<String>,
    pub cue_source: String,
    pub tick_source: String,
    pub tick_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            playlist: vec![
                "./music/1.mp3".to_string(),
                "./music/2.mp3".to_string(),
                "./music/3.mp3".to_string(),
                "./music/4.m4a".to_string(),
                "./music/5.mp3".to_string(),
            ],
            cue_source: "./music/11.mp3".to_string(),
            tick_source: "./music/beep_short.ogg".to_string(),
            tick_volume: 0.3,
        }
    }
}
