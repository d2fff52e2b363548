//! The infinite virtual timeline: a fixed-size window of calendar periods that
//! slides along an unbounded date axis as the viewport scrolls.

pub mod config;
pub mod coords;
pub mod positioner;
pub mod scale;
pub mod scroll;
pub mod view;
pub mod window;

pub use config::WindowConfig;
pub use coords::Placement;
pub use positioner::TaskGeometry;
pub use scale::{Increment, MarkKind, Scale, ScaleConfig};
pub use scroll::{JumpOutcome, ScrollCoordinator, ScrollOutcome};
pub use view::{GroupSpan, VisiblePeriod};
pub use window::{ScrollRequest, TimelineWindow, Transition, VisibleRange, WindowGeneration};
