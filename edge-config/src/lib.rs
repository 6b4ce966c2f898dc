//! The `sortcam` YAML config schema (spec.md §6), loaded with `serde_yaml`
//! the way `braid-config-data` loads its TOML: missing keys fall back to
//! defaults, unknown keys are ignored (no `deny_unknown_fields` — this
//! schema is deliberately looser than `braid-config-data`'s, since it has
//! no legacy-format migration to guard against), and paths given relative
//! in the file are resolved relative to the file's own directory.

mod error;

pub use error::ConfigError;

use std::path::{Path, PathBuf};

use preprocess::PreprocessConfig;
use serde::Deserialize;
use sort_tracker::SortConfig;

fn default_queue_capacity() -> usize {
    4
}

fn default_camera_width() -> u32 {
    640
}

fn default_camera_height() -> u32 {
    480
}

fn default_camera_fps() -> u32 {
    30
}

fn default_threshold() -> f32 {
    0.4
}

fn default_tracker_name() -> String {
    "sort".to_string()
}

/// `source: <int camera-id> | <string file-path>` (spec.md §6).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Source {
    CameraId(u32),
    FilePath(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::CameraId(id) => write!(f, "{id}"),
            Source::FilePath(p) => write!(f, "{p}"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = std::convert::Infallible;

    /// Used to parse `--source` off the CLI: an integer string is a
    /// camera id, anything else is a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(id) => Ok(Source::CameraId(id)),
            Err(_) => Ok(Source::FilePath(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    pub model: PathBuf,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

/// `tracker.params` (spec.md §6): every field optional, overlaid onto
/// [`sort_tracker::SortConfig::default`] so a partially specified block
/// only overrides the keys it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerParamsConfig {
    pub max_age: Option<u64>,
    pub min_hits: Option<u64>,
    pub iou_threshold: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_tracker_name")]
    pub name: String,
    #[serde(default)]
    pub params: TrackerParamsConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: default_tracker_name(),
            params: TrackerParamsConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Overlay `params` onto the `sort-tracker` defaults. `name` is
    /// currently only ever `"sort"` — spec.md §6 reserves the field for
    /// future tracker implementations ("sort|…") but names none.
    pub fn build_sort_config(&self) -> SortConfig {
        let defaults = SortConfig::default();
        SortConfig {
            max_age: self.params.max_age.unwrap_or(defaults.max_age),
            min_hits: self.params.min_hits.unwrap_or(defaults.min_hits),
            iou_threshold: self.params.iou_threshold.unwrap_or(defaults.iou_threshold),
            ..defaults
        }
    }
}

/// The full `sortcam` config document (spec.md §6).
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    pub source: Source,
    #[serde(default = "default_queue_capacity")]
    pub queue: usize,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub preprocessing: PreprocessConfig,
    pub detector: DetectorConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub display_gray: bool,
}

impl EdgeConfig {
    /// Load and resolve a config file: relative paths inside it (just
    /// `detector.model`, currently) are fixed up relative to the file's
    /// own directory, following `braid-config-data::fixup_relative_path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: EdgeConfig = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dirname) = path.parent() {
            fixup_relative_path(&mut cfg.detector.model, dirname)?;
        }

        tracing::info!(?cfg, "resolved configuration");
        Ok(cfg)
    }

    /// Apply the `--source` CLI override (spec.md §6), if given.
    pub fn with_source_override(mut self, source: Option<Source>) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        self
    }
}

impl std::fmt::Display for EdgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "source={} queue={} camera={}x{}@{} detector.threshold={}",
            self.source, self.queue, self.camera.width, self.camera.height, self.camera.fps, self.detector.threshold
        )
    }
}

/// If `path` is relative, make it relative to `dirname`, after expanding
/// shell variables and a leading `~` (spec.md §6 / `braid-config-data`).
fn fixup_relative_path(path: &mut PathBuf, dirname: &Path) -> Result<(), ConfigError> {
    let Some(pathstr) = path.to_str() else {
        return Ok(());
    };
    let expanded = shellexpand::full(pathstr).map_err(|source| ConfigError::ShellExpand {
        path: pathstr.to_string(),
        source,
    })?;
    *path = PathBuf::from(expanded.to_string());
    if path.is_relative() {
        *path = dirname.join(&path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = "source: 0\ndetector:\n  model: model.onnx\n";

    #[test]
    fn minimal_document_fills_in_every_default() {
        let cfg: EdgeConfig = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        assert_eq!(cfg.source, Source::CameraId(0));
        assert_eq!(cfg.queue, 4);
        assert_eq!(cfg.camera.width, 640);
        assert_eq!(cfg.camera.height, 480);
        assert_eq!(cfg.camera.fps, 30);
        assert_eq!(cfg.detector.threshold, 0.4);
        assert_eq!(cfg.tracker.name, "sort");
        assert!(!cfg.display_gray);
    }

    #[test]
    fn unknown_keys_are_ignored_not_rejected() {
        let yaml = format!("{MINIMAL_YAML}unknown_top_level_key: 123\n");
        assert!(serde_yaml::from_str::<EdgeConfig>(&yaml).is_ok());
    }

    #[test]
    fn file_path_source_parses_as_a_string_variant() {
        let yaml = "source: /dev/video0\ndetector:\n  model: m.onnx\n";
        let cfg: EdgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.source, Source::FilePath("/dev/video0".to_string()));
    }

    #[test]
    fn tracker_params_overlay_only_overrides_named_keys() {
        let yaml = format!("{MINIMAL_YAML}tracker:\n  params:\n    min_hits: 7\n");
        let cfg: EdgeConfig = serde_yaml::from_str(&yaml).unwrap();
        let sort_cfg = cfg.tracker.build_sort_config();
        assert_eq!(sort_cfg.min_hits, 7);
        assert_eq!(sort_cfg.max_age, SortConfig::default().max_age);
    }

    #[test]
    fn source_from_str_distinguishes_camera_id_from_path() {
        assert_eq!("2".parse::<Source>().unwrap(), Source::CameraId(2));
        assert_eq!(
            "/dev/video2".parse::<Source>().unwrap(),
            Source::FilePath("/dev/video2".to_string())
        );
    }

    #[test]
    fn relative_model_path_resolves_against_config_directory() {
        let mut path = PathBuf::from("model.onnx");
        fixup_relative_path(&mut path, Path::new("/etc/sortcam")).unwrap();
        assert_eq!(path, PathBuf::from("/etc/sortcam/model.onnx"));
    }

    #[test]
    fn absolute_model_path_is_left_untouched() {
        let mut path = PathBuf::from("/opt/models/model.onnx");
        fixup_relative_path(&mut path, Path::new("/etc/sortcam")).unwrap();
        assert_eq!(path, PathBuf::from("/opt/models/model.onnx"));
    }
}
