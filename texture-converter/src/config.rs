//! Converter configuration.
//!
//! Settings come from an INI file (default `texture_converter.ini` in the
//! working directory) and can be overridden by CLI flags. A missing file
//! means defaults.
//!
//! ```ini
//! [paths]
//! base_dir = .
//! scratch_file = texture_converter.dds
//!
//! [encoder]
//! executable = nvcompress/nvcompress
//! format_flag = -bc1
//! required_files =
//! timeout_secs = 0
//!
//! [logging]
//! file = texture_converter.log
//! level = info
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::batch::DEFAULT_SCRATCH_FILE;
use crate::encoder::{NvcompressEncoder, DEFAULT_FORMAT_FLAG};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "texture_converter.ini";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "texture_converter.log";

/// Companion libraries the Windows build of nvcompress needs next to it.
#[cfg(windows)]
pub const DEFAULT_REQUIRED_FILES: &[&str] = &[
    "cudart.dll",
    "jpeg62.dll",
    "libpng12.dll",
    "nvtt.dll",
    "zlib1.dll",
];

/// Companion libraries the encoder needs next to it.
#[cfg(not(windows))]
pub const DEFAULT_REQUIRED_FILES: &[&str] = &[];

/// Errors loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("failed to load config {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// The file could not be written.
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A key holds a value of the wrong shape.
    #[error("invalid value for [{section}] {key}: {value}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Path to the encoder executable.
    pub executable: PathBuf,

    /// Flag selecting the output format, passed before the input path.
    pub format_flag: String,

    /// Files that must exist in the executable's directory.
    pub required_files: Vec<String>,

    /// Upper bound for one encoder run; `None` waits until it exits.
    pub timeout: Option<Duration>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            format_flag: DEFAULT_FORMAT_FLAG.to_string(),
            required_files: DEFAULT_REQUIRED_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout: None,
        }
    }
}

impl EncoderConfig {
    /// Build the encoder these settings describe.
    pub fn build(&self) -> NvcompressEncoder {
        NvcompressEncoder::new(&self.executable)
            .with_format_flag(&self.format_flag)
            .with_timeout(self.timeout)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log file path. Relative paths resolve against the working directory.
    pub file: PathBuf,

    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: "info".to_string(),
        }
    }
}

/// Complete converter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Directory containing `texture_sources` and `texture_library`.
    pub base_dir: PathBuf,

    /// Intermediate container file, relative to `base_dir` unless absolute.
    pub scratch_file: PathBuf,

    pub encoder: EncoderConfig,

    pub logging: LoggingConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            scratch_file: PathBuf::from(DEFAULT_SCRATCH_FILE),
            encoder: EncoderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a configuration rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Set the encoder executable.
    pub fn with_encoder_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoder.executable = path.into();
        self
    }

    /// Set the encoder timeout.
    pub fn with_encoder_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.encoder.timeout = timeout;
        self
    }

    /// Set the companion files checked before a run.
    pub fn with_required_files(mut self, files: Vec<String>) -> Self {
        self.encoder.required_files = files;
        self
    }

    /// Set the base directory.
    pub fn with_base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_dir = path.into();
        self
    }

    /// Resolved path of the intermediate container file.
    pub fn scratch_path(&self) -> PathBuf {
        self.base_dir.join(&self.scratch_file)
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an INI file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("paths")) {
            if let Some(v) = section.get("base_dir") {
                config.base_dir = PathBuf::from(v);
            }
            if let Some(v) = section.get("scratch_file") {
                config.scratch_file = PathBuf::from(v);
            }
        }

        if let Some(section) = ini.section(Some("encoder")) {
            if let Some(v) = section.get("executable") {
                config.encoder.executable = PathBuf::from(v);
            }
            if let Some(v) = section.get("format_flag") {
                config.encoder.format_flag = v.to_string();
            }
            if let Some(v) = section.get("required_files") {
                config.encoder.required_files = parse_list(v);
            }
            if let Some(v) = section.get("timeout_secs") {
                let secs: u64 = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    section: "encoder".to_string(),
                    key: "timeout_secs".to_string(),
                    value: v.to_string(),
                })?;
                config.encoder.timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = section.get("file") {
                config.logging.file = PathBuf::from(v);
            }
            if let Some(v) = section.get("level") {
                config.logging.level = v.to_string();
            }
        }

        Ok(config)
    }

    /// Write this configuration as an INI file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.with_section(Some("paths"))
            .set("base_dir", self.base_dir.to_string_lossy())
            .set("scratch_file", self.scratch_file.to_string_lossy());
        ini.with_section(Some("encoder"))
            .set("executable", self.encoder.executable.to_string_lossy())
            .set("format_flag", self.encoder.format_flag.as_str())
            .set("required_files", self.encoder.required_files.join(", "))
            .set(
                "timeout_secs",
                self.encoder
                    .timeout
                    .map(|t| t.as_secs())
                    .unwrap_or(0)
                    .to_string(),
            );
        ini.with_section(Some("logging"))
            .set("file", self.logging.file.to_string_lossy())
            .set("level", self.logging.level.as_str());

        ini.write_to_file(path).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn default_executable() -> PathBuf {
    PathBuf::from(format!("nvcompress/nvcompress{}", std::env::consts::EXE_SUFFIX))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
