use log::{debug, info};
use ndarray::{s, Array2, Axis};
use crate::error::ScopeError;
/// Shape of one frame: `[header, c_1, ..., c_k, tail]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    pub frame_size: usize,
    pub header: i16,
    pub tail: i16,
}
impl FrameLayout {
    pub fn new(frame_size: usize, header: i16, tail: i16) -> Self {
        Self {
            frame_size,
            header,
            tail,
        }
    }
    pub fn raw_columns(&self) -> usize {
        self.frame_size.saturating_sub(2)
    }
    fn accepts(&self, frame: &[i16]) -> bool {
        frame.first() == Some(&self.header) && frame.last() == Some(&self.tail)
    }
}
/// Inclusive time cut in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}
impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}
/// Frame counts after each decoding stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub total_frames: usize,
    pub valid_frames: usize,
    pub windowed_frames: usize,
}
#[derive(Clone, Debug)]
pub struct DecodedFrames {
    /// Interior samples only, frames x raw columns.
    pub samples: Array2<i16>,
    /// Seconds, one entry per row of `samples`.
    pub time: Vec<f64>,
    pub report: DecodeReport,
}
impl DecodedFrames {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
/// Split `buffer` into frames, keep the ones with matching markers and cut them to `window`.
///
/// Time is derived from the index among *validated* frames, so a dropped frame
/// does not leave a gap on the time axis.
pub fn decode(
    buffer: &[i16],
    layout: &FrameLayout,
    sample_rate_hz: f64,
    window: TimeWindow,
) -> Result<DecodedFrames, ScopeError> {
    if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
        return Err(ScopeError::InvalidSampleRate);
    }
    let frame_size = layout.frame_size;
    if frame_size < 2 {
        return Err(ScopeError::Config(format!(
            "frame size {frame_size} cannot hold header and tail"
        )));
    }
    let total_frames = buffer.len() / frame_size;
    let usable = total_frames * frame_size;
    if usable < buffer.len() {
        debug!(
            "dropping {} trailing samples that do not fill a frame",
            buffer.len() - usable
        );
    }
    info!("raw samples: {}, total frames: {}", usable, total_frames);
    let frames = Array2::from_shape_vec((total_frames, frame_size), buffer[..usable].to_vec())
        .map_err(|e| ScopeError::Config(e.to_string()))?;
    let valid: Vec<usize> = frames
        .outer_iter()
        .enumerate()
        .filter(|(_, frame)| frame.as_slice().map_or(false, |f| layout.accepts(f)))
        .map(|(idx, _)| idx)
        .collect();
    info!(
        "header/tail validation: {} -> {} frames",
        total_frames,
        valid.len()
    );
    if valid.is_empty() {
        return Err(ScopeError::DecodeEmpty { total_frames });
    }
    let mut kept = Vec::with_capacity(valid.len());
    let mut time = Vec::with_capacity(valid.len());
    for (position, &frame_idx) in valid.iter().enumerate() {
        let t = position as f64 / sample_rate_hz;
        if window.contains(t) {
            kept.push(frame_idx);
            time.push(t);
        }
    }
    info!(
        "time window [{}, {}] s: {} -> {} frames",
        window.start,
        window.end,
        valid.len(),
        kept.len()
    );
    if kept.is_empty() {
        return Err(ScopeError::TimeWindowEmpty {
            start: window.start,
            end: window.end,
            before: valid.len(),
        });
    }
    let samples = frames
        .select(Axis(0), &kept)
        .slice(s![.., 1..frame_size - 1])
        .to_owned();
    Ok(DecodedFrames {
        samples,
        time,
        report: DecodeReport {
            total_frames,
            valid_frames: valid.len(),
            windowed_frames: kept.len(),
        },
    })
}
