//! Daily report engine
//!
//! `generate` turns parsed rows into a [`Report`] for the day before the
//! reference date; `render` turns a report into its text form. Both are pure.

pub mod engine;
pub mod model;
pub mod options;
pub mod render;
pub mod window;

pub use engine::{generate, summarize};
pub use model::{Metrics, NamedVolume, Pathway, Report};
pub use options::{ActorLabel, ReportOptions, RouteExclusion};
pub use render::render;
pub use window::DateWindow;
