// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use serde::Deserialize;
use crate::channel::{ChannelSource, ChannelSpec};
use crate::error::ScopeError;
use crate::viewport::TickPolicy;
/// Typed view of the capture configuration file.
#[derive(Clone, Debug, Deserialize)]
pub struct ScopeConfig {
    pub settings: Settings,
    pub channels_config: Vec<ChannelSpec>,
    #[serde(default)]
    pub draw_config: DrawConfig,
}
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Sample rate in Hz; one valid frame is one sample period.
    pub fs: f64,
    pub header: Constant,
    pub tail: Constant,
}
/// A 16-bit marker constant written either as text (`"0xAA"`, `"170"`) or as a bare integer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Constant {
    Number(i64),
    Text(String),
}
impl Constant {
    pub fn to_i16(&self) -> Result<i16, ScopeError> {
        let value = match self {
            Constant::Number(n) => *n,
            Constant::Text(text) => parse_integer(text)?,
        };
        match value {
            -32768..=32767 => Ok(value as i16),
            // Markers above i16::MAX are bit patterns of the signed sample.
            32768..=65535 => Ok(value as u16 as i16),
            _ => Err(ScopeError::InvalidConstant(format!(
                "{value} does not fit in 16 bits"
            ))),
        }
    }
}
fn parse_integer(text: &str) -> Result<i64, ScopeError> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<i64>()
    };
    parsed.map_err(|_| ScopeError::InvalidConstant(text.to_string()))
}
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub start_time: f64,
    pub end_time: f64,
    pub cols_per_row: usize,
    pub xaxis_interval: TickPolicy,
    pub column_groups: Vec<ColumnGroup>,
    /// Directory for a PNG snapshot of the grid; no snapshot when unset.
    pub snapshot_dir: Option<PathBuf>,
    /// Destination of a CSV dump of the final table; no export when unset.
    pub csv_path: Option<PathBuf>,
}
impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: 150.0,
            cols_per_row: 2,
            xaxis_interval: TickPolicy::Fixed(5.0),
            column_groups: Vec::new(),
            snapshot_dir: None,
            csv_path: None,
        }
    }
}
/// Columns drawn together in one pane.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ColumnGroup {
    pub columns: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Pinned vertical range; the pane never auto-rescales when set.
    #[serde(default)]
    pub yaxis: Option<[f64; 2]>,
}
impl ColumnGroup {
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.columns.join(", "))
    }
}
impl ScopeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!("loaded configuration: {}", path.display());
        Ok(config)
    }
    pub fn from_json(text: &str) -> Result<Self, ScopeError> {
        let config: ScopeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !(self.settings.fs.is_finite() && self.settings.fs > 0.0) {
            return Err(ScopeError::InvalidSampleRate);
        }
        self.settings.header.to_i16()?;
        self.settings.tail.to_i16()?;
        let raw = self.raw_columns();
        if raw.is_empty() {
            return Err(ScopeError::Config(
                "channels_config declares no raw column source".into(),
            ));
        }
        if let Some((_, name)) = raw
            .iter()
            .enumerate()
            .find(|(idx, name)| raw[..*idx].contains(*name))
        {
            return Err(ScopeError::DuplicateColumn(name.clone()));
        }
        if self.draw_config.cols_per_row == 0 {
            return Err(ScopeError::Config("cols_per_row must be at least 1".into()));
        }
        if let Some(group) = self
            .draw_config
            .column_groups
            .iter()
            .find(|g| g.columns.is_empty())
        {
            return Err(ScopeError::Config(format!(
                "column group '{}' lists no columns",
                group.title()
            )));
        }
        Ok(())
    }
    /// Raw source names in frame order; expression channels occupy no frame slot.
    pub fn raw_columns(&self) -> Vec<String> {
        self.channels_config
            .iter()
            .filter_map(|spec| match &spec.source {
                ChannelSource::RawColumn(name) => Some(name.clone()),
                ChannelSource::Expression { .. } => None,
            })
            .collect()
    }
    /// Samples per frame: header + one per raw column + tail.
    pub fn frame_size(&self) -> usize {
        self.raw_columns().len() + 2
    }
    pub fn header(&self) -> Result<i16, ScopeError> {
        self.settings.header.to_i16()
    }
    pub fn tail(&self) -> Result<i16, ScopeError> {
        self.settings.tail.to_i16()
    }
}
