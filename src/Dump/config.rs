// Flat channel list read by the dump writer: one `<channel> <status>` pair per line

use crate::Core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default location of the channel list, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "dump_config.txt";

/// Records the writer may hold before `submit` stalls.
pub const DEFAULT_QUEUE_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpChannel {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    channels: Vec<DumpChannel>,
    queue_capacity: usize,
    output_dir: PathBuf,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            output_dir: PathBuf::from("."),
        }
    }
}

impl DumpConfig {
    /// Read and parse the channel list at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse a channel list.
    ///
    /// Blank lines and `#` comments are skipped. Lines that are not
    /// `<channel> <status>` with a recognised status, or whose channel is not
    /// a plain file name, are logged as unmatched and skipped. Tokens after
    /// the status are ignored. The first line naming a channel wins.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let parsed = match (tokens.next(), tokens.next()) {
                (Some(name), Some(status)) if is_plain_name(name) => {
                    parse_status(status).map(|active| (name, active))
                }
                _ => None,
            };

            let Some((name, active)) = parsed else {
                warn!(line = lineno + 1, text = line, "unmatched dump config line");
                continue;
            };

            if config.channels.iter().any(|c| c.name == name) {
                debug!(line = lineno + 1, channel = name, "duplicate dump channel ignored");
                continue;
            }
            config.channels.push(DumpChannel {
                name: name.to_string(),
                active,
            });
        }

        config
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Directory the per-channel files are created in.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Add or override one channel.
    pub fn with_channel(mut self, name: impl Into<String>, active: bool) -> Self {
        let name = name.into();
        match self.channels.iter_mut().find(|c| c.name == name) {
            Some(channel) => channel.active = active,
            None => self.channels.push(DumpChannel { name, active }),
        }
        self
    }

    pub fn channels(&self) -> &[DumpChannel] {
        &self.channels
    }

    pub fn active_channels(&self) -> impl Iterator<Item = &str> {
        self.channels
            .iter()
            .filter(|c| c.active)
            .map(|c| c.name.as_str())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.active && c.name == name)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn parse_status(status: &str) -> Option<bool> {
    match status.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "enabled" => Some(true),
        "off" | "0" | "false" | "disabled" => Some(false),
        _ => None,
    }
}

// Channel names become file names under the output directory
fn is_plain_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(|c: char| c == '/' || c == '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channels_and_statuses() {
        let config = DumpConfig::parse(
            "# dump channels\n\
             frames.log on\n\
             \n\
             timing.log OFF\n\
             errors.log 1 trailing tokens\n",
        );

        let names: Vec<_> = config.channels().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["frames.log", "timing.log", "errors.log"]);
        assert!(config.is_active("frames.log"));
        assert!(!config.is_active("timing.log"));
        assert!(config.is_active("errors.log"));
        assert_eq!(
            config.active_channels().collect::<Vec<_>>(),
            ["frames.log", "errors.log"]
        );
    }

    #[test]
    fn skips_unmatched_lines() {
        let config = DumpConfig::parse("lonely\nbad.log maybe\n../escape.log on\nok.log on\n");
        assert_eq!(config.channels().len(), 1);
        assert!(config.is_active("ok.log"));
    }

    #[test]
    fn first_occurrence_wins() {
        let config = DumpConfig::parse("a.log on\na.log off\n");
        assert_eq!(config.channels().len(), 1);
        assert!(config.is_active("a.log"));
    }

    #[test]
    fn builder_overrides_channels() {
        let config = DumpConfig::default()
            .with_channel("a.log", true)
            .with_channel("a.log", false)
            .with_queue_capacity(8);
        assert!(!config.is_active("a.log"));
        assert_eq!(config.queue_capacity(), 8);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = DumpConfig::load("/definitely/not/here/dump_config.txt").unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
