//! External `nvcompress` encoder.
//!
//! Runs `<executable> <format flag> <input> <output>` and waits for it to
//! exit. The exit status is checked; a missing output file is caught later
//! by [`super::ScratchContainer::read`].

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::ContainerEncoder;
use crate::error::{ConvertError, ConvertResult};

/// Format flag selecting BC1 compression.
pub const DEFAULT_FORMAT_FLAG: &str = "-bc1";

/// How often a child is polled when a timeout is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Encoder that shells out to NVIDIA's texture tools.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use texture_converter::encoder::{ContainerEncoder, NvcompressEncoder};
///
/// let encoder = NvcompressEncoder::new("nvcompress/nvcompress")
///     .with_format_flag("-bc3")
///     .with_timeout(Some(Duration::from_secs(120)));
///
/// assert_eq!(encoder.name(), "nvcompress");
/// assert_eq!(encoder.format_flag(), "-bc3");
/// ```
#[derive(Debug, Clone)]
pub struct NvcompressEncoder {
    executable: PathBuf,
    format_flag: String,
    timeout: Option<Duration>,
}

impl NvcompressEncoder {
    /// Create an encoder for the given executable, BC1 output, no timeout.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            format_flag: DEFAULT_FORMAT_FLAG.to_string(),
            timeout: None,
        }
    }

    /// Set the format flag passed before the input path.
    pub fn with_format_flag(mut self, flag: impl Into<String>) -> Self {
        self.format_flag = flag.into();
        self
    }

    /// Bound how long a single invocation may run.
    ///
    /// `None` waits until the process exits, however long that takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn format_flag(&self) -> &str {
        &self.format_flag
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command(&self, source: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg(&self.format_flag)
            .arg(source)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        command
    }

    fn run_to_exit(&self, source: &Path, output: &Path) -> ConvertResult<()> {
        let result = self
            .command(source, output)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ConvertError::encode_failure(
                    source,
                    format!("failed to run {}: {}", self.executable.display(), e),
                )
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ConvertError::encode_failure(
                source,
                format!("encoder exited with {}: {}", result.status, stderr.trim()),
            ));
        }
        Ok(())
    }

    fn run_with_timeout(
        &self,
        source: &Path,
        output: &Path,
        timeout: Duration,
    ) -> ConvertResult<()> {
        let mut child = self
            .command(source, output)
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ConvertError::encode_failure(
                    source,
                    format!("failed to run {}: {}", self.executable.display(), e),
                )
            })?;

        let started = Instant::now();
        loop {
            let status = child.try_wait().map_err(|e| {
                ConvertError::encode_failure(source, format!("failed to wait for encoder: {}", e))
            })?;

            match status {
                Some(status) if status.success() => return Ok(()),
                Some(status) => {
                    return Err(ConvertError::encode_failure(
                        source,
                        format!("encoder exited with {}", status),
                    ));
                }
                None if started.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ConvertError::encode_failure(
                        source,
                        format!("encoder timed out after {:?}", timeout),
                    ));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

impl ContainerEncoder for NvcompressEncoder {
    fn encode(&self, source: &Path, output: &Path) -> ConvertResult<()> {
        debug!(
            executable = %self.executable.display(),
            flag = %self.format_flag,
            source = %source.display(),
            output = %output.display(),
            "Running encoder"
        );

        match self.timeout {
            Some(timeout) => self.run_with_timeout(source, output, timeout),
            None => self.run_to_exit(source, output),
        }
    }

    fn name(&self) -> &str {
        "nvcompress"
    }
}
