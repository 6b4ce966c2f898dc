//! Observation model projecting the first four components of the
//! 7-dimensional box state, `(cx, cy, s, r)`, out of the full state
//! `[cx, cy, s, r, vx, vy, vs]` (spec.md §4.D: "Observation `H` projects
//! the first four state components").
//!
//! Generalized from `ObservationModel2D` (previously
//! `observation_model_2d.rs`), which projected `(x, y)` out of `[x, y,
//! xvel, yvel]`.

use nalgebra::allocator::Allocator;
use nalgebra::core::dimension::DimMin;
use nalgebra::core::dimension::{U4, U7};
use nalgebra::{DefaultAllocator, OMatrix, OVector, RealField};

use adskalman::ObservationModel;

#[derive(Debug)]
pub struct BoxObservationModel<R: RealField> {
    observation_matrix: OMatrix<R, U4, U7>,
    observation_matrix_transpose: OMatrix<R, U7, U4>,
    observation_noise_covariance: OMatrix<R, U4, U4>,
}

impl<R: RealField> BoxObservationModel<R> {
    pub fn new(observation_noise_covariance: OMatrix<R, U4, U4>) -> Self {
        use num_traits::{One, Zero};
        let zero: R = Zero::zero();
        let one: R = One::one();

        // nalgebra's componentwise `::new(...)` constructor only exists up
        // to 6 columns/rows; a 4x7 matrix has to be built from a slice
        // instead (see `motion_model`'s 7x7 transition matrix for the same
        // fix).
        #[rustfmt::skip]
        let observation_matrix = OMatrix::<R, U4, U7>::from_row_slice(&[
            one, zero, zero, zero, zero, zero, zero,
            zero, one, zero, zero, zero, zero, zero,
            zero, zero, one, zero, zero, zero, zero,
            zero, zero, zero, one, zero, zero, zero,
        ]);
        let observation_matrix_transpose = observation_matrix.transpose();
        Self {
            observation_matrix,
            observation_matrix_transpose,
            observation_noise_covariance,
        }
    }
}

impl<R: RealField> ObservationModel<R, U7, U4> for BoxObservationModel<R>
where
    DefaultAllocator: Allocator<R, U7, U7>,
    DefaultAllocator: Allocator<R, U7>,
    DefaultAllocator: Allocator<R, U4, U7>,
    DefaultAllocator: Allocator<R, U7, U4>,
    DefaultAllocator: Allocator<R, U4, U4>,
    DefaultAllocator: Allocator<R, U4>,
    DefaultAllocator: Allocator<(usize, usize), U4>,
    U4: DimMin<U4, Output = U4>,
{
    fn H(&self) -> &OMatrix<R, U4, U7> {
        &self.observation_matrix
    }
    fn HT(&self) -> &OMatrix<R, U7, U4> {
        &self.observation_matrix_transpose
    }
    fn R(&self) -> &OMatrix<R, U4, U4> {
        &self.observation_noise_covariance
    }
    fn predict_observation(&self, state: &OVector<R, U7>) -> OVector<R, U4> {
        &self.observation_matrix * state
    }
}
