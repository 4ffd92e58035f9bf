// src/decoder/mod.rs
pub mod capture;
pub mod frame;
pub use capture::{read_capture, samples_from_le_bytes};
pub use frame::{decode, DecodeReport, DecodedFrames, FrameLayout, TimeWindow};
