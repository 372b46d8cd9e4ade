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

use crate::cosmic::frames::{
    ecef_to_geodetic, eci_to_ecef, quaternion_i2lvlh, rotate_to_frame,
};
use crate::cosmic::{AstroError, EarthRotation, GeodeticPosition};
use crate::dynamics::{DisturbanceContext, DynamicsError, ForceAccumulator};
use crate::io::{scalar_header, scalar_value, vector_header, vector_value, Loggable};
use crate::linalg::{UnitQuaternion, Vector3};
use crate::propagators::{
    InertialState, OrbitPropagator, PropAstroSnafu, PropagationError, PropagationMode,
};
use snafu::ResultExt;
use std::fmt;

/// The orbital state of one spacecraft.
///
/// The inertial state is owned by the propagation strategy and is the only authoritative one: the
/// Earth fixed, geodetic and body representations are derived from it after every propagation call.
#[derive(Debug)]
pub struct Orbit {
    propagator: OrbitPropagator,
    is_calc_enabled: bool,
    position_i_m: Vector3<f64>,
    velocity_i_m_s: Vector3<f64>,
    position_ecef_m: Vector3<f64>,
    velocity_ecef_m_s: Vector3<f64>,
    velocity_b_m_s: Vector3<f64>,
    geodetic: GeodeticPosition,
    q_i2b: UnitQuaternion<f64>,
    accumulator: ForceAccumulator,
    /// Acceleration applied during the last propagation call
    last_acceleration_i_m_s2: Vector3<f64>,
}

impl Orbit {
    /// Wraps a propagation strategy and derives every frame from its current state.
    ///
    /// The attitude is initialized to identity until [Orbit::update_attitude] is called.
    pub fn new(
        propagator: OrbitPropagator,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<Self, PropagationError> {
        let mut me = Self {
            propagator,
            is_calc_enabled: true,
            position_i_m: Vector3::zeros(),
            velocity_i_m_s: Vector3::zeros(),
            position_ecef_m: Vector3::zeros(),
            velocity_ecef_m_s: Vector3::zeros(),
            velocity_b_m_s: Vector3::zeros(),
            geodetic: GeodeticPosition::default(),
            q_i2b: UnitQuaternion::identity(),
            accumulator: ForceAccumulator::new(),
            last_acceleration_i_m_s2: Vector3::zeros(),
        };
        let state = me.propagator.state();
        me.apply_state(state, current_jd, rotation)?;
        Ok(me)
    }

    /// Advances the orbit with the contributions accumulated since the previous call.
    ///
    /// The accumulator reads as zero on return, whether the propagation succeeded or not.
    pub fn propagate(
        &mut self,
        end_time_s: f64,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<(), PropagationError> {
        let contributions = self.accumulator.take();
        self.propagate_with(contributions, end_time_s, current_jd, rotation)
    }

    /// Advances the orbit with an explicit set of contributions.
    ///
    /// Anything in the orbit's own accumulator is discarded. When calculation is disabled, the state
    /// is left untouched.
    pub fn propagate_with(
        &mut self,
        contributions: ForceAccumulator,
        end_time_s: f64,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<(), PropagationError> {
        self.accumulator.clear();
        if !self.is_calc_enabled {
            debug!("{} orbit calculation disabled, state frozen", self.mode());
            return Ok(());
        }

        let acceleration_i_m_s2 = contributions.acceleration_i();
        let state = self
            .propagator
            .propagate(end_time_s, current_jd, &acceleration_i_m_s2)?;
        self.last_acceleration_i_m_s2 = acceleration_i_m_s2;
        self.apply_state(state, current_jd, rotation)
    }

    /// Stores the new inertial state and refreshes the derived frames.
    fn apply_state(
        &mut self,
        state: InertialState,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<(), PropagationError> {
        self.position_i_m = state.position_i_m;
        self.velocity_i_m_s = state.velocity_i_m_s;

        let (position_ecef_m, velocity_ecef_m_s) =
            eci_to_ecef(&self.position_i_m, &self.velocity_i_m_s, current_jd, rotation);
        self.position_ecef_m = position_ecef_m;
        self.velocity_ecef_m_s = velocity_ecef_m_s;
        self.geodetic = ecef_to_geodetic(&self.position_ecef_m).context(PropAstroSnafu)?;
        self.velocity_b_m_s = rotate_to_frame(&self.q_i2b, &self.velocity_i_m_s);
        Ok(())
    }

    /// Replaces the accumulated acceleration.
    pub fn set_acceleration_i(&mut self, acceleration_i_m_s2: Vector3<f64>) {
        self.accumulator.set_acceleration_i(acceleration_i_m_s2);
    }

    pub fn add_acceleration_i(&mut self, acceleration_i_m_s2: Vector3<f64>) {
        self.accumulator.add_acceleration_i(acceleration_i_m_s2);
    }

    pub fn add_force_i(&mut self, force_i_n: Vector3<f64>, mass_kg: f64) -> Result<(), DynamicsError> {
        self.accumulator.add_force_i(force_i_n, mass_kg)
    }

    pub fn add_force_b(
        &mut self,
        force_b_n: Vector3<f64>,
        q_i2b: &UnitQuaternion<f64>,
        mass_kg: f64,
    ) -> Result<(), DynamicsError> {
        self.accumulator.add_force_b(force_b_n, q_i2b, mass_kg)
    }

    pub fn accumulator(&self) -> &ForceAccumulator {
        &self.accumulator
    }

    pub(crate) fn accumulator_mut(&mut self) -> &mut ForceAccumulator {
        &mut self.accumulator
    }

    /// Stores the attitude supplied by the attitude subsystem and recomputes the body frame velocity.
    pub fn update_attitude(&mut self, q_i2b: UnitQuaternion<f64>) {
        self.q_i2b = q_i2b;
        self.velocity_b_m_s = rotate_to_frame(&self.q_i2b, &self.velocity_i_m_s);
    }

    /// Shifts the inertial position and refreshes the derived frames.
    ///
    /// SGP4 cannot be shifted: the offset is ignored with a warning.
    pub fn add_position_offset(
        &mut self,
        offset_i_m: &Vector3<f64>,
        current_jd: f64,
        rotation: &dyn EarthRotation,
    ) -> Result<(), PropagationError> {
        let state = self.propagator.add_position_offset(offset_i_m)?;
        self.apply_state(state, current_jd, rotation)
    }

    /// Snapshot handed to the disturbance models.
    pub fn disturbance_context(&self, mass_kg: f64, julian_day: f64) -> DisturbanceContext {
        DisturbanceContext {
            position_i_m: self.position_i_m,
            velocity_i_m_s: self.velocity_i_m_s,
            q_i2b: self.q_i2b,
            mass_kg,
            julian_day,
        }
    }

    /// Quaternion from the inertial frame to the LVLH frame of the current orbit.
    pub fn quaternion_i2lvlh(&self) -> Result<UnitQuaternion<f64>, AstroError> {
        quaternion_i2lvlh(&self.position_i_m, &self.velocity_i_m_s)
    }

    pub fn mode(&self) -> PropagationMode {
        self.propagator.mode()
    }

    pub fn propagator(&self) -> &OrbitPropagator {
        &self.propagator
    }

    pub fn is_calc_enabled(&self) -> bool {
        self.is_calc_enabled
    }

    pub fn set_calc_enabled(&mut self, enabled: bool) {
        self.is_calc_enabled = enabled;
    }

    pub fn position_i_m(&self) -> Vector3<f64> {
        self.position_i_m
    }

    pub fn velocity_i_m_s(&self) -> Vector3<f64> {
        self.velocity_i_m_s
    }

    pub fn position_ecef_m(&self) -> Vector3<f64> {
        self.position_ecef_m
    }

    pub fn velocity_ecef_m_s(&self) -> Vector3<f64> {
        self.velocity_ecef_m_s
    }

    pub fn velocity_b_m_s(&self) -> Vector3<f64> {
        self.velocity_b_m_s
    }

    pub fn geodetic(&self) -> GeodeticPosition {
        self.geodetic
    }

    pub fn latitude_rad(&self) -> f64 {
        self.geodetic.latitude_rad()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.geodetic.longitude_rad()
    }

    pub fn altitude_m(&self) -> f64 {
        self.geodetic.altitude_m()
    }

    /// Latitude (rad), longitude (rad) and altitude (m).
    pub fn lat_lon_alt(&self) -> Vector3<f64> {
        self.geodetic.to_vector()
    }

    pub fn q_i2b(&self) -> UnitQuaternion<f64> {
        self.q_i2b
    }

    pub fn last_acceleration_i_m_s2(&self) -> Vector3<f64> {
        self.last_acceleration_i_m_s2
    }
}

impl Loggable for Orbit {
    fn log_header(&self) -> String {
        let mut hdr = vector_header("sat_position", "i", "m");
        hdr.push_str(&vector_header("sat_velocity", "i", "m/s"));
        match self.mode() {
            PropagationMode::AnalyticTle => {
                hdr.push_str(&vector_header("sat_position", "ecef", "m"));
                hdr.push_str(&scalar_header("lat", "rad"));
                hdr.push_str(&scalar_header("lon", "rad"));
                hdr.push_str(&scalar_header("alt", "m"));
            }
            _ => {
                hdr.push_str(&vector_header("sat_velocity", "b", "m/s"));
                hdr.push_str(&vector_header("sat_acc", "i", "m/s2"));
            }
        }
        hdr
    }

    fn log_value(&self) -> String {
        let mut val = vector_value(&self.position_i_m);
        val.push_str(&vector_value(&self.velocity_i_m_s));
        match self.mode() {
            PropagationMode::AnalyticTle => {
                val.push_str(&vector_value(&self.position_ecef_m));
                val.push_str(&scalar_value(self.latitude_rad()));
                val.push_str(&scalar_value(self.longitude_rad()));
                val.push_str(&scalar_value(self.altitude_m()));
            }
            _ => {
                val.push_str(&vector_value(&self.velocity_b_m_s));
                val.push_str(&vector_value(&self.last_acceleration_i_m_s2));
            }
        }
        val
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} orbit at {} (calc {})",
            self.mode(),
            self.geodetic,
            if self.is_calc_enabled { "on" } else { "off" }
        )
    }
}
