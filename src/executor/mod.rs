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

use crate::cosmic::EarthRotation;
use crate::dynamics::{DisturbanceContext, DisturbanceModel};
use crate::errors::{SatDynError, UnknownSpacecraftSnafu};
use crate::linalg::{UnitQuaternion, Vector3};
use crate::orbit::Orbit;
use crate::propagators::{InvalidStepSizeSnafu, PropagationError};
use crate::time::{Duration, Epoch};
use snafu::ensure;
use std::fmt;

/// Simulation time: a fixed step counted from a start epoch.
///
/// The elapsed time is accumulated as a hifitime [Duration], so it does not drift with the number of ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationClock {
    start: Epoch,
    step: Duration,
    elapsed: Duration,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(start: Epoch, step: Duration) -> Result<Self, PropagationError> {
        ensure!(
            step > Duration::ZERO,
            InvalidStepSizeSnafu {
                step_s: step.to_seconds()
            }
        );
        Ok(Self {
            start,
            step,
            elapsed: Duration::ZERO,
            ticks: 0,
        })
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds elapsed since the start epoch.
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed.to_seconds()
    }

    pub fn current_epoch(&self) -> Epoch {
        self.start + self.elapsed
    }

    /// Julian day (UTC) of the current epoch.
    pub fn current_jd(&self) -> f64 {
        self.current_epoch().to_jde_utc_days()
    }

    pub fn advance(&mut self) {
        self.elapsed += self.step;
        self.ticks += 1;
    }
}

impl fmt::Display for SimulationClock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (tick #{}, step {})", self.current_epoch(), self.ticks, self.step)
    }
}

/// One simulated spacecraft.
#[derive(Debug)]
pub struct SpacecraftEntry {
    pub name: String,
    pub orbit: Orbit,
    pub mass_kg: f64,
    /// Attitude as last supplied by the attitude subsystem
    pub q_i2b: UnitQuaternion<f64>,
}

/// Steps every spacecraft orbit with the simulation clock.
///
/// Each tick is split in two phases: [OrbitScheduler::begin_tick] opens the disturbance phase, the only
/// place where contributions may be accumulated, and [DisturbancePhase::propagate] closes it by
/// propagating every orbit. Since the phase holds the mutable borrow of the scheduler, contributions
/// cannot be added once the orbits have been propagated.
#[derive(Debug)]
pub struct OrbitScheduler {
    clock: SimulationClock,
    spacecraft: Vec<SpacecraftEntry>,
}

impl OrbitScheduler {
    pub fn new(clock: SimulationClock) -> Self {
        Self {
            clock,
            spacecraft: Vec::new(),
        }
    }

    /// Registers a spacecraft and returns its index.
    pub fn add_spacecraft(&mut self, name: &str, orbit: Orbit, mass_kg: f64) -> usize {
        info!("registering {name} ({mass_kg} kg): {orbit}");
        self.spacecraft.push(SpacecraftEntry {
            name: name.to_string(),
            q_i2b: orbit.q_i2b(),
            orbit,
            mass_kg,
        });
        self.spacecraft.len() - 1
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.spacecraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spacecraft.is_empty()
    }

    pub fn spacecraft(&self) -> &[SpacecraftEntry] {
        &self.spacecraft
    }

    pub fn orbit(&self, index: usize) -> Option<&Orbit> {
        self.spacecraft.get(index).map(|sc| &sc.orbit)
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SpacecraftEntry, SatDynError> {
        let count = self.spacecraft.len();
        self.spacecraft
            .get_mut(index)
            .ok_or_else(|| UnknownSpacecraftSnafu { index, count }.build())
    }

    /// Stores the attitude of a spacecraft and refreshes its body frame velocity.
    pub fn set_attitude(&mut self, index: usize, q_i2b: UnitQuaternion<f64>) -> Result<(), SatDynError> {
        let entry = self.entry_mut(index)?;
        entry.q_i2b = q_i2b;
        entry.orbit.update_attitude(q_i2b);
        Ok(())
    }

    /// Opens the disturbance phase of the next tick. Every accumulator starts empty.
    pub fn begin_tick(&mut self) -> DisturbancePhase<'_> {
        for sc in &mut self.spacecraft {
            sc.orbit.accumulator_mut().clear();
        }
        DisturbancePhase { scheduler: self }
    }

    /// Runs a full tick: every model contributes to every spacecraft, then the orbits are propagated.
    pub fn tick(
        &mut self,
        models: &[&dyn DisturbanceModel],
        rotation: &dyn EarthRotation,
    ) -> Result<TickReport, SatDynError> {
        let mut phase = self.begin_tick();
        for model in models {
            phase.apply_to_all(*model)?;
        }
        Ok(phase.propagate(rotation))
    }
}

/// The disturbance phase of a tick.
///
/// The disturbances are evaluated with the states and the date at the start of the tick.
#[must_use = "the orbits are only propagated by DisturbancePhase::propagate"]
pub struct DisturbancePhase<'a> {
    scheduler: &'a mut OrbitScheduler,
}

impl DisturbancePhase<'_> {
    pub fn julian_day(&self) -> f64 {
        self.scheduler.clock.current_jd()
    }

    pub fn context(&self, index: usize) -> Option<DisturbanceContext> {
        let jd = self.julian_day();
        self.scheduler
            .spacecraft
            .get(index)
            .map(|sc| sc.orbit.disturbance_context(sc.mass_kg, jd))
    }

    /// Lets a disturbance model contribute to the spacecraft at the provided index.
    pub fn apply(&mut self, index: usize, model: &dyn DisturbanceModel) -> Result<(), SatDynError> {
        let jd = self.julian_day();
        let entry = self.scheduler.entry_mut(index)?;
        let ctx = entry.orbit.disturbance_context(entry.mass_kg, jd);
        model.contribute(&ctx, entry.orbit.accumulator_mut())?;
        Ok(())
    }

    pub fn apply_to_all(&mut self, model: &dyn DisturbanceModel) -> Result<(), SatDynError> {
        for index in 0..self.scheduler.len() {
            self.apply(index, model)?;
        }
        Ok(())
    }

    pub fn add_acceleration_i(
        &mut self,
        index: usize,
        acceleration_i_m_s2: Vector3<f64>,
    ) -> Result<(), SatDynError> {
        self.scheduler
            .entry_mut(index)?
            .orbit
            .add_acceleration_i(acceleration_i_m_s2);
        Ok(())
    }

    /// Adds a body frame force, using the mass and attitude of that spacecraft.
    pub fn add_force_b(&mut self, index: usize, force_b_n: Vector3<f64>) -> Result<(), SatDynError> {
        let entry = self.scheduler.entry_mut(index)?;
        let (q_i2b, mass_kg) = (entry.q_i2b, entry.mass_kg);
        entry.orbit.add_force_b(force_b_n, &q_i2b, mass_kg)?;
        Ok(())
    }

    /// Closes the disturbance phase: advances the clock and propagates every orbit to the new date.
    ///
    /// A failing orbit does not prevent the others from being propagated.
    pub fn propagate(self, rotation: &dyn EarthRotation) -> TickReport {
        let scheduler = self.scheduler;
        scheduler.clock.advance();
        let elapsed_s = scheduler.clock.elapsed_s();
        let julian_day = scheduler.clock.current_jd();

        let results = scheduler
            .spacecraft
            .iter_mut()
            .map(|sc| {
                let rslt = sc.orbit.propagate(elapsed_s, julian_day, rotation);
                if let Err(e) = &rslt {
                    error!("{} failed to propagate to {elapsed_s} s: {e}", sc.name);
                }
                rslt
            })
            .collect();

        debug!("tick #{} done", scheduler.clock.ticks());
        TickReport {
            tick: scheduler.clock.ticks(),
            elapsed_s,
            julian_day,
            results,
        }
    }
}

/// Outcome of a tick, with one result per spacecraft in registration order.
#[derive(Debug, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub elapsed_s: f64,
    pub julian_day: f64,
    pub results: Vec<Result<(), PropagationError>>,
}

impl TickReport {
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(|r| r.is_ok())
    }

    /// Indexes of the spacecraft which failed to propagate, along with their error.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &PropagationError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}
