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

use super::{InertialState, KeplerianElements, PropagationError};
use crate::cosmic::SECONDS_PER_DAY;
use crate::linalg::Vector3;

/// Closed form two body propagation of a set of Keplerian elements.
///
/// Perturbations are not modeled: the accumulated acceleration is discarded.
#[derive(Clone, Debug)]
pub struct KeplerPropagation {
    elements: KeplerianElements,
    epoch_jd: f64,
    last_jd: f64,
    state: InertialState,
}

impl KeplerPropagation {
    /// Initializes the propagation from elements defined at `epoch_jd`, and evaluates them at `current_jd`.
    pub fn new(
        elements: KeplerianElements,
        epoch_jd: f64,
        current_jd: f64,
    ) -> Result<Self, PropagationError> {
        elements.validate()?;
        info!("Kepler propagation of {elements}");
        let mut me = Self {
            elements,
            epoch_jd,
            last_jd: epoch_jd,
            state: InertialState::default(),
        };
        me.propagate(current_jd)?;
        Ok(me)
    }

    /// Initializes the propagation from the osculating elements of the provided inertial state at `current_jd`.
    pub fn from_cartesian(
        position_i_m: Vector3<f64>,
        velocity_i_m_s: Vector3<f64>,
        gm_m3_s2: f64,
        current_jd: f64,
    ) -> Result<Self, PropagationError> {
        let elements =
            KeplerianElements::from_cartesian(&position_i_m, &velocity_i_m_s, gm_m3_s2)?;
        Self::new(elements, current_jd, current_jd)
    }

    pub fn propagate(&mut self, current_jd: f64) -> Result<InertialState, PropagationError> {
        let elapsed_s = (current_jd - self.epoch_jd) * SECONDS_PER_DAY;
        let (position_i_m, velocity_i_m_s) = self.elements.to_cartesian_after(elapsed_s)?;
        self.state = InertialState::new(position_i_m, velocity_i_m_s);
        self.last_jd = current_jd;
        debug!("Kepler propagation {elapsed_s:.3} s after epoch");
        Ok(self.state)
    }

    /// Shifts the position and re-osculates the elements at the time of the last propagation.
    pub fn add_position_offset(&mut self, offset_i_m: &Vector3<f64>) -> Result<(), PropagationError> {
        self.elements = KeplerianElements::from_cartesian(
            &(self.state.position_i_m + offset_i_m),
            &self.state.velocity_i_m_s,
            self.elements.gm_m3_s2,
        )?;
        self.epoch_jd = self.last_jd;
        self.state.position_i_m += offset_i_m;
        Ok(())
    }

    pub fn state(&self) -> InertialState {
        self.state
    }

    pub fn elements(&self) -> &KeplerianElements {
        &self.elements
    }

    pub fn epoch_jd(&self) -> f64 {
        self.epoch_jd
    }
}
