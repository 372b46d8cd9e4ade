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

use super::{DegenerateOrbitSnafu, KeplerNonConvergenceSnafu, PropagationError};
use crate::cosmic::Euler3Axis;
use crate::linalg::Vector3;
use crate::utils::{between_0_tau, between_pm_pi};
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::TAU;
use std::fmt;

/// Orbits with an eccentricity below this value are treated as circular.
pub const ECC_EPSILON: f64 = 1e-11;
/// Maximum number of Newton iterations when solving Kepler's equation.
pub const KEPLER_MAX_ITERATIONS: usize = 50;
/// Convergence threshold on the eccentric anomaly when solving Kepler's equation, in radians.
pub const KEPLER_TOLERANCE_RAD: f64 = 1e-14;

/// Classical orbital elements of an elliptical orbit at an epoch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeplerianElements {
    pub sma_m: f64,
    pub ecc: f64,
    pub inc_rad: f64,
    pub raan_rad: f64,
    pub aop_rad: f64,
    /// Mean anomaly at the epoch
    pub ma_rad: f64,
    /// Gravitational parameter of the central body, in m^3/s^2
    pub gm_m3_s2: f64,
}

impl KeplerianElements {
    /// Checks that these elements define a bound, non degenerate orbit.
    pub fn validate(&self) -> Result<(), PropagationError> {
        ensure!(
            self.gm_m3_s2 > 0.0,
            DegenerateOrbitSnafu {
                details: "gravitational parameter must be positive"
            }
        );
        ensure!(
            self.sma_m.is_finite() && self.sma_m > 0.0,
            DegenerateOrbitSnafu {
                details: "semi major axis must be positive (hyperbolic orbits are not supported)"
            }
        );
        ensure!(
            (0.0..1.0).contains(&self.ecc),
            DegenerateOrbitSnafu {
                details: "eccentricity must be in [0, 1)"
            }
        );
        Ok(())
    }

    /// Builds the osculating elements from an inertial position and velocity.
    ///
    /// Circular orbits use the argument of latitude in place of the true anomaly, and equatorial
    /// orbits use the longitude of periapsis in place of the argument of periapsis.
    ///
    /// Reference: Vallado, 4th Ed., Algorithm 9 page 113.
    pub fn from_cartesian(
        position_i_m: &Vector3<f64>,
        velocity_i_m_s: &Vector3<f64>,
        gm_m3_s2: f64,
    ) -> Result<Self, PropagationError> {
        let rmag = position_i_m.norm();
        let vmag = velocity_i_m_s.norm();
        let hvec = position_i_m.cross(velocity_i_m_s);
        ensure!(
            rmag > f64::EPSILON && hvec.norm() > f64::EPSILON,
            DegenerateOrbitSnafu {
                details: "position and velocity are zero or colinear"
            }
        );

        let energy = vmag.powi(2) / 2.0 - gm_m3_s2 / rmag;
        let evec = ((vmag.powi(2) - gm_m3_s2 / rmag) * position_i_m
            - position_i_m.dot(velocity_i_m_s) * velocity_i_m_s)
            / gm_m3_s2;
        let ecc = evec.norm();
        ensure!(
            energy < 0.0 && ecc < 1.0,
            DegenerateOrbitSnafu {
                details: "orbit is not elliptical"
            }
        );
        let sma_m = -gm_m3_s2 / (2.0 * energy);

        let inc_rad = (hvec[2] / hvec.norm()).clamp(-1.0, 1.0).acos();
        let node = Vector3::new(-hvec[1], hvec[0], 0.0);
        let equatorial = node.norm() < f64::EPSILON * hvec.norm();

        let raan_rad = if equatorial {
            0.0
        } else {
            let raan = (node[0] / node.norm()).clamp(-1.0, 1.0).acos();
            if node[1] < 0.0 {
                TAU - raan
            } else {
                raan
            }
        };

        // Angle between two vectors in [0, 2π), the orientation being given by the sign of `flip`
        let angle = |a: &Vector3<f64>, b: &Vector3<f64>, flip: f64| {
            let cos = (a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0);
            if flip < 0.0 {
                TAU - cos.acos()
            } else {
                cos.acos()
            }
        };

        // Reference direction from which the periapsis is measured in the orbit plane
        let (aop_rad, ta_rad) = if ecc < ECC_EPSILON {
            // Circular: no periapsis, measure from the node (or X axis if equatorial)
            let reference = if equatorial { Vector3::x() } else { node };
            let u = angle(&reference, position_i_m, hvec.dot(&reference.cross(position_i_m)));
            (0.0, u)
        } else {
            let aop = if equatorial {
                let lon_periapsis = evec[1].atan2(evec[0]);
                if hvec[2] < 0.0 {
                    TAU - lon_periapsis
                } else {
                    lon_periapsis
                }
            } else {
                angle(&node, &evec, evec[2])
            };
            let ta = angle(&evec, position_i_m, position_i_m.dot(velocity_i_m_s));
            (between_0_tau(aop), ta)
        };

        let ma_rad = mean_anomaly_from_true(ta_rad, ecc);

        let me = Self {
            sma_m,
            ecc,
            inc_rad,
            raan_rad,
            aop_rad,
            ma_rad,
            gm_m3_s2,
        };
        me.validate()?;
        Ok(me)
    }

    /// Mean motion, in rad/s.
    pub fn mean_motion_rad_s(&self) -> f64 {
        (self.gm_m3_s2 / self.sma_m.powi(3)).sqrt()
    }

    /// Orbital period, in seconds.
    pub fn period_s(&self) -> f64 {
        TAU / self.mean_motion_rad_s()
    }

    /// Returns the inertial position and velocity `elapsed_s` seconds after the epoch of these elements.
    pub fn to_cartesian_after(
        &self,
        elapsed_s: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), PropagationError> {
        let ma = between_0_tau(self.ma_rad + self.mean_motion_rad_s() * elapsed_s);
        let ea = solve_kepler(ma, self.ecc)?;
        let (sin_e, cos_e) = ea.sin_cos();
        let sqrt_1me2 = (1.0 - self.ecc.powi(2)).sqrt();

        // Perifocal position and velocity
        let r_pqw = Vector3::new(
            self.sma_m * (cos_e - self.ecc),
            self.sma_m * sqrt_1me2 * sin_e,
            0.0,
        );
        let rmag = self.sma_m * (1.0 - self.ecc * cos_e);
        let vfactor = (self.gm_m3_s2 * self.sma_m).sqrt() / rmag;
        let v_pqw = Vector3::new(-vfactor * sin_e, vfactor * sqrt_1me2 * cos_e, 0.0);

        let dcm_pqw2i = Euler3Axis::perifocal(self.raan_rad, self.inc_rad, self.aop_rad)
            .dcm()
            .transpose();
        Ok((dcm_pqw2i * r_pqw, dcm_pqw2i * v_pqw))
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sma = {:.3} km\tecc = {:.6}\tinc = {:.6} deg\traan = {:.6} deg\taop = {:.6} deg\tma = {:.6} deg",
            self.sma_m * 1e-3,
            self.ecc,
            self.inc_rad.to_degrees(),
            self.raan_rad.to_degrees(),
            self.aop_rad.to_degrees(),
            self.ma_rad.to_degrees()
        )
    }
}

/// Converts a true anomaly to a mean anomaly, both in radians, for an elliptical orbit.
pub fn mean_anomaly_from_true(ta_rad: f64, ecc: f64) -> f64 {
    let (sin_ta, cos_ta) = ta_rad.sin_cos();
    let ea = ((1.0 - ecc.powi(2)).sqrt() * sin_ta).atan2(ecc + cos_ta);
    between_0_tau(ea - ecc * ea.sin())
}

/// Solves Kepler's equation `M = E - e sin(E)` for the eccentric anomaly with Newton's method.
pub fn solve_kepler(ma_rad: f64, ecc: f64) -> Result<f64, PropagationError> {
    let ma = between_pm_pi(ma_rad);
    let mut ea = if ecc > 0.8 { std::f64::consts::PI.copysign(ma) } else { ma };
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ea - ecc * ea.sin() - ma) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE_RAD {
            return Ok(ea);
        }
    }
    error!("Kepler's equation did not converge for M = {ma_rad} rad, e = {ecc}");
    KeplerNonConvergenceSnafu {
        iterations: KEPLER_MAX_ITERATIONS,
    }
    .fail()
}
