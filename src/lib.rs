// src/lib.rs
pub mod channel;
pub mod config;
pub mod decoder;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
pub mod viewport;
pub use channel::{build_table, BuildReport, ChannelSource, ChannelSpec, ColumnIssue, TimeSeriesTable};
pub use config::{ColumnGroup, DrawConfig, ScopeConfig};
pub use decoder::{decode, read_capture, DecodeReport, DecodedFrames, FrameLayout, TimeWindow};
pub use error::ScopeError;
pub use session::{process_file, process_samples, ProcessedCapture};
pub use viewport::{AxisRange, GridLayout, TickPolicy, ViewportGroup, ViewportSurface};
