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

/*! # satdyn

Satellite orbit dynamics and reference frame propagation.

An [Orbit] owns one of five propagation strategies (fixed step RK4, SGP4, Hill-Clohessy-Wiltshire relative
motion, Kepler and Encke), derives its Earth fixed, geodetic and body frame representations after every
propagation call, and collects the perturbations contributed by disturbance models in a per step accumulator.
The [executor::OrbitScheduler] sequences the disturbance and propagation phases of every tick.
*/

/// Earth constants, geodetic coordinates, Earth rotation and frame transformations.
pub mod cosmic;

/// Force accumulation, two-body dynamics and disturbance models.
pub mod dynamics;

/// The propagation strategies and their numerical building blocks.
pub mod propagators;

mod orbit;
pub use self::orbit::Orbit;

/// Simulation clock and tick scheduling.
pub mod executor;

/// Configuration loading and log formatting.
pub mod io;

/// Utility functions shared by different modules.
pub mod utils;

mod errors;
/// Functions which may fail return an error, which converts into this crate level error.
pub use self::errors::SatDynError;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
    pub use na::geometry::{Rotation3, UnitQuaternion};
}
