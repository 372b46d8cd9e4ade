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

use super::{
    eccentricity_squared, AstroError, DegeneratePositionSnafu, GeodeticNonConvergenceSnafu,
    EARTH_EQUATORIAL_RADIUS_M, EARTH_FLATTENING,
};
use crate::linalg::Vector3;
use crate::utils::between_0_tau;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use std::fmt;

/// Convergence threshold of the geodetic latitude iteration, in radians.
pub const GEODETIC_LATITUDE_TOLERANCE_RAD: f64 = 1e-10;
/// Maximum number of iterations of the geodetic latitude iteration.
pub const GEODETIC_MAX_ITERATIONS: usize = 100;
/// Positions closer than this to the geocenter have no meaningful geodetic representation, in meters.
pub const GEODETIC_MIN_RADIUS_M: f64 = 1.0;

/// Geodetic position over the WGS-84 ellipsoid.
///
/// The longitude is stored in [0, 2π) and the latitude in [-π/2, π/2].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    latitude_rad: f64,
    longitude_rad: f64,
    altitude_m: f64,
}

impl GeodeticPosition {
    pub fn new(latitude_rad: f64, longitude_rad: f64, altitude_m: f64) -> Self {
        Self {
            latitude_rad,
            longitude_rad,
            altitude_m,
        }
    }

    /// Builds the geodetic position from an ECEF position in meters.
    pub fn try_from_ecef(position_ecef_m: &Vector3<f64>) -> Result<Self, AstroError> {
        let mut me = Self::default();
        me.update_from_ecef(position_ecef_m)?;
        Ok(me)
    }

    /// Updates this geodetic position from an ECEF position in meters.
    ///
    /// The latitude is found by iterating the ellipsoid projection until two successive
    /// estimates differ by less than [GEODETIC_LATITUDE_TOLERANCE_RAD]. The iteration is
    /// bounded by [GEODETIC_MAX_ITERATIONS]; on failure `self` is left untouched.
    ///
    /// Reference: Vallado, 4th Ed., Algorithm 12 page 172.
    pub fn update_from_ecef(&mut self, position_ecef_m: &Vector3<f64>) -> Result<(), AstroError> {
        self.update_from_ecef_within(position_ecef_m, GEODETIC_MAX_ITERATIONS)
    }

    /// Same as [GeodeticPosition::update_from_ecef] with an explicit iteration cap.
    pub(crate) fn update_from_ecef_within(
        &mut self,
        position_ecef_m: &Vector3<f64>,
        max_iterations: usize,
    ) -> Result<(), AstroError> {
        let norm_m = position_ecef_m.norm();
        ensure!(
            norm_m.is_finite() && norm_m >= GEODETIC_MIN_RADIUS_M,
            DegeneratePositionSnafu { norm_m }
        );

        let (x, y, z) = (position_ecef_m[0], position_ecef_m[1], position_ecef_m[2]);
        let e2 = eccentricity_squared(EARTH_FLATTENING);
        let r_delta = (x * x + y * y).sqrt();

        let longitude_rad = between_0_tau(y.atan2(x));

        let next_latitude = |latitude: f64| {
            let sin_lat = latitude.sin();
            let c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            (z + EARTH_EQUATORIAL_RADIUS_M * c * e2 * sin_lat).atan2(r_delta)
        };

        let mut latitude = z.atan2(r_delta);
        let mut converged = false;
        let mut residual_rad = f64::INFINITY;
        for _ in 0..max_iterations {
            let new_latitude = next_latitude(latitude);
            residual_rad = (new_latitude - latitude).abs();
            latitude = new_latitude;
            if residual_rad < GEODETIC_LATITUDE_TOLERANCE_RAD {
                converged = true;
                break;
            }
        }

        if !converged {
            error!(
                "geodetic latitude failed to converge -- error = {:.3e} rad",
                residual_rad
            );
            return GeodeticNonConvergenceSnafu {
                iterations: max_iterations,
                residual_rad,
            }
            .fail();
        }
        // The map contracts by about e² per pass: once the step is below the tolerance the
        // fixed point is still e² times that step away, so take one more pass.
        latitude = next_latitude(latitude);

        let sin_lat = latitude.sin();
        let n_m = EARTH_EQUATORIAL_RADIUS_M / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        // Near the poles r/cos(φ) is 0/0, so use the polar axis formulation instead.
        let altitude_m = if latitude.abs() < FRAC_PI_4 {
            r_delta / latitude.cos() - n_m
        } else {
            z / sin_lat - n_m * (1.0 - e2)
        };

        if latitude > FRAC_PI_2 {
            latitude -= TAU;
        }

        self.latitude_rad = latitude;
        self.longitude_rad = longitude_rad;
        self.altitude_m = altitude_m;
        Ok(())
    }

    /// Returns the ECEF position in meters of this geodetic position (closed form).
    pub fn to_ecef(&self) -> Vector3<f64> {
        let e2 = eccentricity_squared(EARTH_FLATTENING);
        let (sin_lat, cos_lat) = self.latitude_rad.sin_cos();
        let (sin_lon, cos_lon) = between_0_tau(self.longitude_rad).sin_cos();
        let n_m = EARTH_EQUATORIAL_RADIUS_M / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n_m + self.altitude_m) * cos_lat * cos_lon,
            (n_m + self.altitude_m) * cos_lat * sin_lon,
            (n_m * (1.0 - e2) + self.altitude_m) * sin_lat,
        )
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_rad
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude_rad
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Returns (latitude [rad], longitude [rad], altitude [m]) as a vector.
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.latitude_rad, self.longitude_rad, self.altitude_m)
    }
}

impl fmt::Display for GeodeticPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "lat. = {:.6} deg\tlong. = {:.6} deg\talt. = {:.3} m",
            self.latitude_rad.to_degrees(),
            self.longitude_rad.to_degrees(),
            self.altitude_m
        )
    }
}
