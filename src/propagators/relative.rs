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

use super::{DegenerateOrbitSnafu, InertialState, PropAstroSnafu, PropagationError};
use crate::cosmic::{frames::dcm_i2lvlh, Euler3Axis, EARTH_GM_M3_S2, SECONDS_PER_DAY};
use crate::dynamics::{pack_state, unpack_state};
use crate::linalg::{Vector3, Vector6};
use crate::utils::between_0_tau;
use serde_derive::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};

fn default_gm() -> f64 {
    EARTH_GM_M3_S2
}

/// Circular orbit around which the relative motion is propagated.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircularReference {
    pub radius_m: f64,
    pub inc_rad: f64,
    pub raan_rad: f64,
    /// Argument of latitude at the epoch of the relative state
    pub arg_lat_rad: f64,
    #[serde(default = "default_gm")]
    pub gm_m3_s2: f64,
}

impl CircularReference {
    pub fn mean_motion_rad_s(&self) -> f64 {
        (self.gm_m3_s2 / self.radius_m.powi(3)).sqrt()
    }

    /// Inertial position and velocity of the reference `elapsed_s` seconds after the epoch.
    pub fn state_after(&self, elapsed_s: f64) -> (Vector3<f64>, Vector3<f64>) {
        let n = self.mean_motion_rad_s();
        let (sin_u, cos_u) = (self.arg_lat_rad + n * elapsed_s).sin_cos();
        let dcm_pqw2i = Euler3Axis::perifocal(self.raan_rad, self.inc_rad, 0.0)
            .dcm()
            .transpose();
        let vmag = n * self.radius_m;
        (
            dcm_pqw2i * Vector3::new(self.radius_m * cos_u, self.radius_m * sin_u, 0.0),
            dcm_pqw2i * Vector3::new(-vmag * sin_u, vmag * cos_u, 0.0),
        )
    }
}

/// Hill-Clohessy-Wiltshire closed form solution.
///
/// The relative state [x, y, z, vx, vy, vz] is expressed in the LVLH frame of the reference:
/// x radial, y along-track, z cross-track.
pub fn hcw_propagate(mean_motion_rad_s: f64, elapsed_s: f64, relative_state: &Vector6<f64>) -> Vector6<f64> {
    let n = mean_motion_rad_s;
    let nt = n * elapsed_s;
    let (s, c) = nt.sin_cos();
    let (x0, y0, z0) = (relative_state[0], relative_state[1], relative_state[2]);
    let (vx0, vy0, vz0) = (relative_state[3], relative_state[4], relative_state[5]);

    Vector6::new(
        (4.0 - 3.0 * c) * x0 + s / n * vx0 + 2.0 / n * (1.0 - c) * vy0,
        6.0 * (s - nt) * x0 + y0 - 2.0 / n * (1.0 - c) * vx0 + (4.0 * s - 3.0 * nt) / n * vy0,
        c * z0 + s / n * vz0,
        3.0 * n * s * x0 + c * vx0 + 2.0 * s * vy0,
        -6.0 * n * (1.0 - c) * x0 - 2.0 * s * vx0 + (4.0 * c - 3.0) * vy0,
        -n * s * z0 + c * vz0,
    )
}

/// Relative orbit propagation: the spacecraft moves with respect to a circular reference orbit per the HCW equations.
///
/// The accumulated acceleration is not modeled and is discarded.
#[derive(Clone, Debug)]
pub struct RelativeOrbitPropagation {
    reference: CircularReference,
    epoch_jd: f64,
    /// Relative state in LVLH at the epoch
    initial_relative_state: Vector6<f64>,
    relative_state: Vector6<f64>,
    last_jd: f64,
    state: InertialState,
}

impl RelativeOrbitPropagation {
    /// Initializes the propagation from a relative state (LVLH) at `epoch_jd`, and evaluates it at `current_jd`.
    pub fn new(
        reference: CircularReference,
        relative_position_lvlh_m: Vector3<f64>,
        relative_velocity_lvlh_m_s: Vector3<f64>,
        epoch_jd: f64,
        current_jd: f64,
    ) -> Result<Self, PropagationError> {
        ensure!(
            reference.radius_m > 0.0 && reference.gm_m3_s2 > 0.0,
            DegenerateOrbitSnafu {
                details: "reference radius and gravitational parameter must be positive"
            }
        );
        info!(
            "relative orbit propagation around a {:.3} km circular orbit (inc. {:.3} deg)",
            reference.radius_m * 1e-3,
            reference.inc_rad.to_degrees()
        );
        let initial_relative_state =
            pack_state(&relative_position_lvlh_m, &relative_velocity_lvlh_m_s);
        let mut me = Self {
            reference,
            epoch_jd,
            initial_relative_state,
            relative_state: initial_relative_state,
            last_jd: epoch_jd,
            state: InertialState::default(),
        };
        me.propagate(current_jd)?;
        Ok(me)
    }

    pub fn propagate(&mut self, current_jd: f64) -> Result<InertialState, PropagationError> {
        let elapsed_s = (current_jd - self.epoch_jd) * SECONDS_PER_DAY;
        let n = self.reference.mean_motion_rad_s();
        self.relative_state = hcw_propagate(n, elapsed_s, &self.initial_relative_state);

        let (r_ref, v_ref) = self.reference.state_after(elapsed_s);
        let dcm_lvlh2i = dcm_i2lvlh(&r_ref, &v_ref)
            .context(PropAstroSnafu)?
            .transpose();
        let (rho, rho_dot) = unpack_state(&self.relative_state);
        // LVLH rotates at the mean motion about its Z axis
        let transport = Vector3::new(0.0, 0.0, n).cross(&rho);

        self.state = InertialState::new(
            r_ref + dcm_lvlh2i * rho,
            v_ref + dcm_lvlh2i * (rho_dot + transport),
        );
        self.last_jd = current_jd;
        debug!("relative orbit propagation {elapsed_s:.3} s after epoch");
        Ok(self.state)
    }

    /// Shifts the relative position; the LVLH relative velocity is kept.
    pub fn add_position_offset(&mut self, offset_i_m: &Vector3<f64>) -> Result<(), PropagationError> {
        let elapsed_s = (self.last_jd - self.epoch_jd) * SECONDS_PER_DAY;
        let (r_ref, v_ref) = self.reference.state_after(elapsed_s);
        let offset_lvlh = dcm_i2lvlh(&r_ref, &v_ref).context(PropAstroSnafu)? * offset_i_m;
        let (rho, rho_dot) = unpack_state(&self.relative_state);

        // Restart the closed form solution from the shifted state
        self.reference.arg_lat_rad =
            between_0_tau(self.reference.arg_lat_rad + self.reference.mean_motion_rad_s() * elapsed_s);
        self.epoch_jd = self.last_jd;
        self.initial_relative_state = pack_state(&(rho + offset_lvlh), &rho_dot);
        self.propagate(self.last_jd)?;
        Ok(())
    }

    pub fn state(&self) -> InertialState {
        self.state
    }

    /// Current relative state [position, velocity] in the LVLH frame of the reference.
    pub fn relative_state_lvlh(&self) -> Vector6<f64> {
        self.relative_state
    }

    pub fn reference(&self) -> &CircularReference {
        &self.reference
    }
}
