/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::linalg::Vector6;

/// Remaining durations shorter than this are not worth an integration step, in seconds.
pub const STEP_TOLERANCE_S: f64 = 1e-6;

/// The `RK` trait defines an explicit fixed step Runge Kutta integrator.
#[allow(clippy::upper_case_acronyms)]
pub trait RK
where
    Self: Sized,
{
    /// Returns the stages of this integrator (as usize because it's used as indexing)
    const STAGES: usize;

    /// The A coefficients of the Butcher table, lower triangular part only, row after row.
    /// *Warning:* this RK trait supposes that the implementation is consistent, i.e. c_i = \sum_j a_{ij}.
    const A_COEFFS: &'static [f64];
    /// The b_i coefficients of the Butcher table, one per stage.
    const B_COEFFS: &'static [f64];
}

/// The classical fourth order Runge Kutta integrator.
pub struct RK4Fixed {}

impl RK for RK4Fixed {
    const STAGES: usize = 4;
    const A_COEFFS: &'static [f64] = &[0.5, 0.0, 0.5, 0.0, 0.0, 1.0];
    const B_COEFFS: &'static [f64] = &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];
}

/// Integrates `eom` over a single step of `step_s` seconds starting at `t_s`.
///
/// `eom` receives the time and the state at each stage and returns the time derivative of the state.
pub fn rk_step<M, F, E>(t_s: f64, state: &Vector6<f64>, step_s: f64, mut eom: F) -> Result<Vector6<f64>, E>
where
    M: RK,
    F: FnMut(f64, &Vector6<f64>) -> Result<Vector6<f64>, E>,
{
    let mut k = Vec::with_capacity(M::STAGES);
    k.push(eom(t_s, state)?);
    let mut a_idx: usize = 0;
    for i in 0..(M::STAGES - 1) {
        // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
        let mut ci: f64 = 0.0;
        // a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1}
        let mut wi = Vector6::zeros();
        for kj in &k[0..i + 1] {
            let a_ij = M::A_COEFFS[a_idx];
            ci += a_ij;
            wi += a_ij * kj;
            a_idx += 1;
        }
        let ki = eom(t_s + ci * step_s, &(state + step_s * wi))?;
        k.push(ki);
    }

    let mut next_state = *state;
    for (b_i, ki) in M::B_COEFFS.iter().zip(k.iter()) {
        next_state += step_s * b_i * ki;
    }
    Ok(next_state)
}

/// Step sizes needed to go from `start_s` to `end_s` with steps of at most `step_s`.
///
/// All steps but the last one are exactly `step_s` long; the last one lands exactly on `end_s`.
/// Nothing is yielded if `end_s` is not after `start_s`, or if either bound is not finite.
#[derive(Copy, Clone, Debug)]
pub struct StepSchedule {
    remaining_s: f64,
    step_s: f64,
}

impl StepSchedule {
    pub fn new(start_s: f64, end_s: f64, step_s: f64) -> Self {
        let remaining_s = end_s - start_s;
        Self {
            remaining_s: if remaining_s.is_finite() { remaining_s } else { 0.0 },
            step_s,
        }
    }
}

impl Iterator for StepSchedule {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining_s - self.step_s > STEP_TOLERANCE_S {
            self.remaining_s -= self.step_s;
            Some(self.step_s)
        } else if self.remaining_s > 0.0 {
            // Take one final step of exactly the needed duration until the end time
            let last = self.remaining_s;
            self.remaining_s = 0.0;
            Some(last)
        } else {
            None
        }
    }
}
