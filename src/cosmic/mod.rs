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
use snafu::Snafu;

/// Geodetic latitude, longitude and altitude over the WGS-84 reference ellipsoid.
mod geodetic;
pub use self::geodetic::*;

/// Earth rotation providers and Euler rotations.
mod rotations;
pub use self::rotations::*;

/// Inertial to Earth fixed to geodetic transformations, and the local orbital (LVLH) frame.
pub mod frames;

/// Low precision analytical ephemeris of the Sun.
mod sun;
pub use self::sun::*;

/// Equatorial radius of the Earth per WGS-84, in meters
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;
/// Flattening of the Earth per WGS-84
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Gravitational parameter of the Earth per WGS-84 (EGM96), in m^3/s^2
pub const EARTH_GM_M3_S2: f64 = 3.986_004_418e14;
/// Mean angular velocity of the Earth, in rad/s
pub const EARTH_MEAN_ANGULAR_VELOCITY_RAD_S: f64 = 7.292_115e-5;

/// Speed of light in meters per second
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Astronomical unit, in meters, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU_M: f64 = 149_597_870_700.0;
/// Total solar irradiance at one AU, in W/m^2
pub const SOLAR_FLUX_W_M2: f64 = 1_366.0;

/// Number of seconds in one (Julian) day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Returns the square of the first eccentricity of an ellipsoid given its flattening.
pub fn eccentricity_squared(flattening: f64) -> f64 {
    flattening * (2.0 - flattening)
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AstroError {
    #[snafu(display(
        "geodetic latitude did not converge after {iterations} iterations (residual {residual_rad:.3e} rad)"
    ))]
    GeodeticNonConvergence { iterations: usize, residual_rad: f64 },
    #[snafu(display("position norm of {norm_m:.3e} m is too close to the geocenter"))]
    DegeneratePosition { norm_m: f64 },
    #[snafu(display("local orbital frame undefined: {details}"))]
    LocalFrameUndefined { details: &'static str },
}
