// src/channel/mod.rs
pub mod expr;
pub mod pipeline;
pub mod table;
pub mod transform;
pub use expr::{Expression, ExpressionError};
pub use pipeline::{build_table, BuildReport, ColumnIssue};
pub use table::{TimeSeriesTable, TIME_COLUMN};
pub use transform::Transform;
use serde::Deserialize;
/// Where a channel's values come from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChannelSource {
    /// One decoded frame column, passed through as-is.
    RawColumn(String),
    /// Arithmetic over raw column names, optionally naming its own output.
    Expression {
        #[serde(rename = "expression")]
        text: String,
        #[serde(default)]
        name: Option<String>,
    },
}
/// One declared output channel.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChannelSpec {
    pub source: ChannelSource,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: Option<String>,
    /// Rows where this channel equals any of these values are dropped.
    #[serde(default)]
    pub filter_vals: Vec<f64>,
}
impl ChannelSpec {
    pub fn raw(source: impl Into<String>) -> Self {
        Self {
            source: ChannelSource::RawColumn(source.into()),
            name: None,
            transform: None,
            filter_vals: Vec::new(),
        }
    }
    pub fn expression(text: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            source: ChannelSource::Expression {
                text: text.into(),
                name: name.map(str::to_string),
            },
            name: None,
            transform: None,
            filter_vals: Vec::new(),
        }
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn with_transform(mut self, key: impl Into<String>) -> Self {
        self.transform = Some(key.into());
        self
    }
    pub fn with_filter(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.filter_vals = values.into_iter().collect();
        self
    }
    /// Explicit name, then the raw source name, then the expression's own name.
    pub fn output_name(&self) -> Option<&str> {
        if let Some(name) = &self.name {
            return Some(name);
        }
        match &self.source {
            ChannelSource::RawColumn(source) => Some(source),
            ChannelSource::Expression { name, .. } => name.as_deref(),
        }
    }
}
