//! Per-track Kalman filter over `[cx, cy, s, r, vx, vy, vs]` (spec.md
//! §4.D). One instance is owned by exactly one track in the tracker
//! manager (`sort-tracker`); this crate has no notion of track identity,
//! lifecycle, or association — those live one layer up.

use nalgebra::{OMatrix, OVector, U4, U7};

use adskalman::{CovarianceUpdateMethod, StateAndCovariance, TransitionModelLinearNoControl};

use crate::motion_model::ConstantVelocityBoxModel;
use crate::observation_model::BoxObservationModel;
use core_types::Detection;

/// Reconstructed axis-aligned box, `(x1, y1, x2, y2)`. Width/height are
/// zero when the underlying state is degenerate (spec.md §4.D: "If `s*r`
/// is non-finite or `s <= 0` or `r <= 0`, width and height are zero").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxXyxy {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoxXyxy {
    /// A box is emittable only if it has strictly positive area.
    pub fn is_degenerate(&self) -> bool {
        !(self.x2 > self.x1 && self.y2 > self.y1)
    }
}

const EPS: f64 = 1e-6;

fn bbox_to_z(x1: f64, y1: f64, x2: f64, y2: f64) -> Vector4Like {
    let (x1, y1, x2, y2) = if x2 <= x1 || y2 <= y1 {
        // Degenerate detection: replaced by a minimal unit box before
        // ingestion, per spec.md §4.D.
        (x1, y1, x1 + 1.0, y1 + 1.0)
    } else {
        (x1, y1, x2, y2)
    };
    let w = x2 - x1;
    let h = y2 - y1;
    let cx = x1 + w / 2.0;
    let cy = y1 + h / 2.0;
    let s = w * h;
    let r = w / h;
    Vector4Like { cx, cy, s, r }
}

struct Vector4Like {
    cx: f64,
    cy: f64,
    s: f64,
    r: f64,
}

fn state_to_bbox(cx: f64, cy: f64, s: f64, r: f64) -> BoxXyxy {
    let sr = s * r;
    if !sr.is_finite() || s <= 0.0 || r <= 0.0 {
        return BoxXyxy {
            x1: cx as f32,
            y1: cy as f32,
            x2: cx as f32,
            y2: cy as f32,
        };
    }
    let w = sr.sqrt();
    let h = s / (w + EPS);
    BoxXyxy {
        x1: (cx - w / 2.0) as f32,
        y1: (cy - h / 2.0) as f32,
        x2: (cx + w / 2.0) as f32,
        y2: (cy + h / 2.0) as f32,
    }
}

/// One track's Kalman state estimate plus the lifecycle counters spec.md
/// §4.D attaches to it at this layer (the `age`/`hits`/`hit_streak`/
/// `time_since_update` bookkeeping belongs conceptually to the filter
/// tick, even though *using* those counters to decide birth/confirm/death
/// is the tracker manager's job).
pub struct KalmanBoxTracker {
    motion_model: ConstantVelocityBoxModel<f64>,
    observation_model: BoxObservationModel<f64>,
    estimate: StateAndCovariance<f64, U7>,
    pub age: u64,
    pub hits: u64,
    pub hit_streak: u64,
    pub time_since_update: u64,
}

impl KalmanBoxTracker {
    /// Seed a new filter from a detection, per spec.md §4.D/§4.F step 5.
    ///
    /// `process_noise_scale`/`measurement_noise_scale` are the `Q`/`R`
    /// tuning scalars from spec.md §4.D (defaults ~0.01); `initial_covar`
    /// is the large initial-uncertainty scalar (default ~10).
    pub fn new(
        det: Detection,
        process_noise_scale: f64,
        measurement_noise_scale: f64,
        initial_covar: f64,
    ) -> Self {
        let z = bbox_to_z(det.x1 as f64, det.y1 as f64, det.x2 as f64, det.y2 as f64);
        let state =
            OVector::<f64, U7>::from_column_slice(&[z.cx, z.cy, z.s, z.r, 0.0, 0.0, 0.0]);
        let covar = OMatrix::<f64, U7, U7>::identity() * initial_covar;

        Self {
            motion_model: ConstantVelocityBoxModel::new(process_noise_scale),
            observation_model: BoxObservationModel::new(
                OMatrix::<f64, U4, U4>::identity() * measurement_noise_scale,
            ),
            estimate: StateAndCovariance::new(state, covar),
            age: 0,
            hits: 1,
            hit_streak: 1,
            time_since_update: 0,
        }
    }

    /// One forward step. Increments `age`; resets `hit_streak` to zero if
    /// a miss is already in progress (`time_since_update > 0` going in);
    /// increments `time_since_update`. Returns the predicted bounding box
    /// (spec.md §4.D).
    pub fn predict(&mut self) -> BoxXyxy {
        self.age += 1;
        if self.time_since_update > 0 {
            self.hit_streak = 0;
        }
        self.time_since_update += 1;

        self.estimate = self.motion_model.predict(&self.estimate);
        self.get_state()
    }

    /// Correct the state with an observation derived from `det`.
    /// Degenerate detections are replaced by a minimal unit box before
    /// ingestion (spec.md §4.D). Sets `time_since_update = 0`; increments
    /// `hits` and `hit_streak`.
    pub fn update(&mut self, det: Detection) {
        let z = bbox_to_z(det.x1 as f64, det.y1 as f64, det.x2 as f64, det.y2 as f64);
        let observation = OVector::<f64, U4>::new(z.cx, z.cy, z.s, z.r);

        match self.observation_model.update(
            &self.estimate,
            &observation,
            CovarianceUpdateMethod::JosephForm,
        ) {
            Ok(posterior) => self.estimate = posterior,
            Err(_) => {
                // Numerically singular innovation covariance: keep the
                // prior rather than poison the state with a NaN update.
            }
        }
        self.time_since_update = 0;
        self.hits += 1;
        self.hit_streak += 1;
    }

    /// Reconstruct `(x1, y1, x2, y2)` from the current state.
    pub fn get_state(&self) -> BoxXyxy {
        let s = self.estimate.state();
        state_to_bbox(s[0], s[1], s[2], s[3])
    }

    /// `true` if any component of the current state is non-finite — the
    /// tracker manager deletes such a track before association runs
    /// (spec.md §4.F step 2).
    pub fn state_is_finite(&self) -> bool {
        self.estimate.state().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection::new(x1, y1, x2, y2, 0.9)
    }

    #[test]
    fn seeds_state_from_detection() {
        let t = KalmanBoxTracker::new(det(10.0, 10.0, 50.0, 50.0), 0.01, 0.01, 10.0);
        let b = t.get_state();
        assert_relative_eq!(b.x1, 10.0, epsilon = 1e-3);
        assert_relative_eq!(b.y1, 10.0, epsilon = 1e-3);
        assert_relative_eq!(b.x2, 50.0, epsilon = 1e-3);
        assert_relative_eq!(b.y2, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn repeated_update_converges_to_box() {
        let mut t = KalmanBoxTracker::new(det(10.0, 10.0, 50.0, 50.0), 0.01, 0.01, 10.0);
        for _ in 0..10 {
            t.predict();
            t.update(det(10.0, 10.0, 50.0, 50.0));
        }
        let b = t.get_state();
        assert_relative_eq!(b.x1, 10.0, epsilon = 1.0);
        assert_relative_eq!(b.x2, 50.0, epsilon = 1.0);
    }

    #[test]
    fn predict_without_update_resets_hit_streak() {
        let mut t = KalmanBoxTracker::new(det(0.0, 0.0, 10.0, 10.0), 0.01, 0.01, 10.0);
        assert_eq!(t.hit_streak, 1);
        t.predict();
        assert_eq!(t.time_since_update, 1);
        t.predict();
        // a second consecutive miss keeps hit_streak at zero
        assert_eq!(t.hit_streak, 0);
    }

    #[test]
    fn degenerate_detection_is_clamped_to_unit_box() {
        // x2 <= x1: degenerate per spec.md §4.D.
        let mut t = KalmanBoxTracker::new(det(5.0, 5.0, 5.0, 5.0), 0.01, 0.01, 10.0);
        t.predict();
        t.update(det(5.0, 5.0, 5.0, 5.0));
        assert!(t.state_is_finite());
    }

    #[test]
    fn moving_box_tracks_velocity() {
        let mut t = KalmanBoxTracker::new(det(0.0, 0.0, 10.0, 10.0), 0.01, 0.01, 10.0);
        for i in 1..20 {
            t.predict();
            let x = i as f32 * 2.0;
            t.update(det(x, 0.0, x + 10.0, 10.0));
        }
        let predicted = t.predict();
        // should continue extrapolating forward, not snap back to origin
        assert!(predicted.x1 > 30.0);
    }
}
