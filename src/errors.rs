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

use crate::cosmic::AstroError;
use crate::dynamics::DynamicsError;
use crate::io::ConfigError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Any error raised by this crate.
///
/// Each module raises its own error type, which converts into this one with `?`.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SatDynError {
    #[snafu(display("{source}"), context(false))]
    Astro { source: AstroError },
    #[snafu(display("{source}"), context(false))]
    Dynamics { source: DynamicsError },
    #[snafu(display("{source}"), context(false))]
    Propagation { source: PropagationError },
    #[snafu(display("{source}"), context(false))]
    Config { source: ConfigError },
    #[snafu(display("no spacecraft at index {index} ({count} registered)"))]
    UnknownSpacecraft { index: usize, count: usize },
}
