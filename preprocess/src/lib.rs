//! Composable pure image transforms (spec.md §4.B): a preprocessing
//! chain is either a fixed preset or a manually assembled sequence of
//! enhancement operators, applied in place to a [`core_types::Frame`].
//!
//! Loosely grounded on `image-tracker`'s `BackgroundModel` for the one
//! stateful operator ([`clutter::ClutterRemoval`]) and on `imops`'s
//! plain stride-loop style for the pixel math, since the teacher's own
//! image operators are bound to IPP/`fastimage`, which is out of scope
//! here.

mod chain;
mod clutter;
mod config;
mod gamma;
mod gauss;
mod kernel;
mod laplacian;
mod operator;
mod preset;
mod unsharp;

pub use chain::Chain;
pub use clutter::ClutterRemoval;
pub use config::{
    ClutterRemovalConfig, ContrastEnhanceConfig, DeblurConfig, DenoiseConfig, EdgeEnhanceConfig,
    PreprocessConfig,
};
pub use gamma::GammaContrast;
pub use gauss::GaussianBlur;
pub use laplacian::LaplacianSharpen;
pub use operator::Operator;
pub use preset::Preset;
pub use unsharp::UnsharpMask;
