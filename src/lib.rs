//! gantt-timeline: a virtualized Gantt timeline engine.
//!
//! The [`timeline`] module holds the windowing core and has no GUI dependency;
//! the desktop binary in this package renders it with egui.

pub mod error;
pub mod io;
pub mod model;
pub mod telemetry;
pub mod timeline;

pub use error::{TimelineError, TimelineResult};
pub use model::TaskInterval;
pub use timeline::{Scale, ScrollCoordinator, WindowConfig};
