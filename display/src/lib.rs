//! Output stage (spec.md §4.I): overlay validation/clipping, FPS HUD,
//! and the `ESC`-shutdown signal, behind a [`DisplaySink`] boundary the
//! real GUI toolkit implements (out of scope, spec.md §1).

mod headless;
mod sink;
mod stage;

pub use headless::{HeadlessDisplaySink, ShownFrame};
pub use sink::{DisplaySink, Overlay};
pub use stage::OutputStage;
