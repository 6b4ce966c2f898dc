//! The per-track Kalman box filter (spec component 4.D).
//!
//! This crate used to hold a family of 2D/3D motion and observation models
//! for `flydra2`'s multi-camera fusion (`motion_model_2d`,
//! `motion_model_3d`, `observation_model_2d`, ...). This pipeline only
//! ever tracks a single object class in 2D image space, so it keeps just
//! one constant-velocity model, generalized to the 7-dimensional bounding
//! box state spec.md §4.D calls for: `[cx, cy, s, r, vx, vy, vs]`, where
//! `(cx, cy)` is the box center, `s` is its area, and `r` its aspect
//! ratio, with velocities on the first three.

pub mod kalman_box_tracker;
pub mod motion_model;
pub mod observation_model;

pub use kalman_box_tracker::KalmanBoxTracker;
