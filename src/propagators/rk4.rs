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

use super::{rk_step, InertialState, InvalidStepSizeSnafu, PropagationError, StepSchedule, RK4Fixed};
use crate::cosmic::EARTH_GM_M3_S2;
use crate::dynamics::{pack_state, unpack_state, OrbitalDynamics};
use crate::linalg::{Vector3, Vector6};
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::convert::Infallible;
use typed_builder::TypedBuilder;

fn default_step_s() -> f64 {
    1.0
}

fn default_gm() -> f64 {
    EARTH_GM_M3_S2
}

/// Settings of the numerical propagation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Rk4Settings {
    /// Maximum integration step, in seconds
    #[builder(default = 1.0)]
    #[serde(default = "default_step_s")]
    pub step_s: f64,
    /// Gravitational parameter of the Earth, in m^3/s^2
    #[builder(default = EARTH_GM_M3_S2)]
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
}

impl Default for Rk4Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub(crate) fn check_step(step_s: f64) -> Result<(), PropagationError> {
    ensure!(
        step_s.is_finite() && step_s > 0.0,
        InvalidStepSizeSnafu { step_s }
    );
    Ok(())
}

/// Fixed step RK4 integration of two body gravity plus the accumulated perturbation.
#[derive(Clone, Debug)]
pub struct Rk4Propagation {
    dynamics: OrbitalDynamics,
    step_s: f64,
    current_time_s: f64,
    state: Vector6<f64>,
}

impl Rk4Propagation {
    /// Initializes the integration from the provided inertial state at elapsed time zero.
    pub fn new(
        settings: Rk4Settings,
        position_i_m: Vector3<f64>,
        velocity_i_m_s: Vector3<f64>,
    ) -> Result<Self, PropagationError> {
        check_step(settings.step_s)?;
        info!(
            "RK4 propagation with a step of {} s and {}",
            settings.step_s,
            OrbitalDynamics::new(settings.gm_m3_s2)
        );
        Ok(Self {
            dynamics: OrbitalDynamics::new(settings.gm_m3_s2),
            step_s: settings.step_s,
            current_time_s: 0.0,
            state: pack_state(&position_i_m, &velocity_i_m_s),
        })
    }

    /// Integrates until `end_time_s` with steps of at most the configured step.
    ///
    /// The perturbation is held constant over the whole call.
    pub fn propagate(
        &mut self,
        end_time_s: f64,
        acceleration_i_m_s2: &Vector3<f64>,
    ) -> InertialState {
        let dynamics = self.dynamics;
        let mut t = self.current_time_s;
        for step in StepSchedule::new(self.current_time_s, end_time_s, self.step_s) {
            self.state = match rk_step::<RK4Fixed, _, Infallible>(t, &self.state, step, |_, x| {
                Ok(dynamics.eom(x, acceleration_i_m_s2))
            }) {
                Ok(next) => next,
                Err(never) => match never {},
            };
            t += step;
        }
        if end_time_s.is_finite() && end_time_s > self.current_time_s {
            self.current_time_s = end_time_s;
        } else {
            debug!(
                "RK4 already at {} s, nothing to do until {} s",
                self.current_time_s, end_time_s
            );
        }
        self.state()
    }

    pub fn state(&self) -> InertialState {
        let (position_i_m, velocity_i_m_s) = unpack_state(&self.state);
        InertialState::new(position_i_m, velocity_i_m_s)
    }

    pub fn add_position_offset(&mut self, offset_i_m: &Vector3<f64>) {
        let (position, velocity) = unpack_state(&self.state);
        self.state = pack_state(&(position + offset_i_m), &velocity);
    }

    pub fn current_time_s(&self) -> f64 {
        self.current_time_s
    }

    pub fn step_s(&self) -> f64 {
        self.step_s
    }
}
