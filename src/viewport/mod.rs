// src/viewport/mod.rs
pub mod layout;
pub mod scale;
pub mod surface;
pub mod sync;
pub mod ticks;
pub use layout::{GridCell, GridLayout};
pub use scale::{auto_y_range, padded};
pub use surface::{AxisRange, RangeListener, TickIntervals, ViewportSurface};
pub use sync::{PropagationOutcome, SyncState, ViewportGroup, ViewportId};
pub use ticks::TickPolicy;
