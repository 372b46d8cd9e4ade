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

use super::rk4::check_step;
use super::{rk_step, InertialState, KeplerianElements, PropagationError, StepSchedule, RK4Fixed};
use crate::cosmic::EARTH_GM_M3_S2;
use crate::dynamics::{pack_state, unpack_state};
use crate::linalg::{Vector3, Vector6};
use serde_derive::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default ratio of the position deviation to the reference radius above which the reference is rectified.
pub const DEFAULT_RECTIFICATION_RATIO: f64 = 0.01;

fn default_step_s() -> f64 {
    1.0
}

fn default_gm() -> f64 {
    EARTH_GM_M3_S2
}

fn default_ratio() -> f64 {
    DEFAULT_RECTIFICATION_RATIO
}

/// Settings of the Encke propagation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct EnckeSettings {
    /// Maximum integration step of the deviation, in seconds
    #[builder(default = 1.0)]
    #[serde(default = "default_step_s")]
    pub step_s: f64,
    #[builder(default = EARTH_GM_M3_S2)]
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
    /// The reference orbit is re-osculated when |δr| / |r_ref| exceeds this ratio
    #[builder(default = DEFAULT_RECTIFICATION_RATIO)]
    #[serde(default = "default_ratio")]
    pub rectification_ratio: f64,
}

impl Default for EnckeSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Battin's f(q) function, which avoids the difference of two nearly equal numbers in Encke's method.
///
/// Reference: Battin, An Introduction to the Mathematics and Methods of Astrodynamics, 1999, section 9.3.
pub fn battin_f(q: f64) -> f64 {
    q * (3.0 + 3.0 * q + q * q) / (1.0 + (1.0 + q).powf(1.5))
}

/// Encke propagation: only the deviation from an osculating Keplerian reference orbit is integrated.
#[derive(Clone, Debug)]
pub struct EnckePropagation {
    settings: EnckeSettings,
    reference: KeplerianElements,
    /// Elapsed time at which the reference elements are defined
    reference_time_s: f64,
    /// Deviation [δr, δv] from the reference orbit
    deviation: Vector6<f64>,
    current_time_s: f64,
    state: InertialState,
    rectifications: usize,
}

impl EnckePropagation {
    /// Initializes the propagation from the provided inertial state at elapsed time zero.
    pub fn new(
        settings: EnckeSettings,
        position_i_m: Vector3<f64>,
        velocity_i_m_s: Vector3<f64>,
    ) -> Result<Self, PropagationError> {
        check_step(settings.step_s)?;
        let reference =
            KeplerianElements::from_cartesian(&position_i_m, &velocity_i_m_s, settings.gm_m3_s2)?;
        info!(
            "Encke propagation with a step of {} s, rectified above a ratio of {}, from {reference}",
            settings.step_s, settings.rectification_ratio
        );
        Ok(Self {
            settings,
            reference,
            reference_time_s: 0.0,
            deviation: Vector6::zeros(),
            current_time_s: 0.0,
            state: InertialState::new(position_i_m, velocity_i_m_s),
            rectifications: 0,
        })
    }

    /// Time derivative of the deviation, `t_s` being the elapsed simulation time.
    fn deviation_eom(
        &self,
        t_s: f64,
        deviation: &Vector6<f64>,
        perturbation_i_m_s2: &Vector3<f64>,
    ) -> Result<Vector6<f64>, PropagationError> {
        let (r_ref, _) = self
            .reference
            .to_cartesian_after(t_s - self.reference_time_s)?;
        let (delta_r, delta_v) = unpack_state(deviation);
        let r = r_ref + delta_r;
        let q = delta_r.dot(&(delta_r - 2.0 * r)) / r.norm_squared();
        let delta_acc = -self.settings.gm_m3_s2 / r_ref.norm().powi(3) * (delta_r + battin_f(q) * r)
            + perturbation_i_m_s2;
        Ok(pack_state(&delta_v, &delta_acc))
    }

    /// Integrates the deviation until `end_time_s` with steps of at most the configured step.
    ///
    /// The perturbation is held constant over the whole call.
    pub fn propagate(
        &mut self,
        end_time_s: f64,
        acceleration_i_m_s2: &Vector3<f64>,
    ) -> Result<InertialState, PropagationError> {
        for step in StepSchedule::new(self.current_time_s, end_time_s, self.settings.step_s) {
            let t = self.current_time_s;
            self.deviation = rk_step::<RK4Fixed, _, _>(t, &self.deviation, step, |t, dev| {
                self.deviation_eom(t, dev, acceleration_i_m_s2)
            })?;
            self.current_time_s += step;
            self.update_state()?;
        }
        if end_time_s.is_finite() && end_time_s > self.current_time_s {
            self.current_time_s = end_time_s;
        }
        Ok(self.state)
    }

    /// Rebuilds the true state from the reference and the deviation, and rectifies if needed.
    fn update_state(&mut self) -> Result<(), PropagationError> {
        let (r_ref, v_ref) = self
            .reference
            .to_cartesian_after(self.current_time_s - self.reference_time_s)?;
        let (delta_r, delta_v) = unpack_state(&self.deviation);
        self.state = InertialState::new(r_ref + delta_r, v_ref + delta_v);
        if delta_r.norm() / r_ref.norm() > self.settings.rectification_ratio {
            warn!(
                "Encke deviation of {:.3} m at {:.3} s, rectifying the reference",
                delta_r.norm(),
                self.current_time_s
            );
            self.rectify()?;
        }
        Ok(())
    }

    /// Re-osculates the reference orbit to the current true state and zeroes the deviation.
    fn rectify(&mut self) -> Result<(), PropagationError> {
        self.reference = KeplerianElements::from_cartesian(
            &self.state.position_i_m,
            &self.state.velocity_i_m_s,
            self.settings.gm_m3_s2,
        )?;
        self.reference_time_s = self.current_time_s;
        self.deviation = Vector6::zeros();
        self.rectifications += 1;
        Ok(())
    }

    pub fn add_position_offset(&mut self, offset_i_m: &Vector3<f64>) -> Result<(), PropagationError> {
        self.state.position_i_m += offset_i_m;
        self.rectify()
    }

    pub fn state(&self) -> InertialState {
        self.state
    }

    pub fn reference(&self) -> &KeplerianElements {
        &self.reference
    }

    /// Number of times the reference orbit was re-osculated.
    pub fn rectifications(&self) -> usize {
        self.rectifications
    }

    pub fn current_time_s(&self) -> f64 {
        self.current_time_s
    }
}
