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

use crate::linalg::Vector3;

/// Anything which can be written as a row of a comma separated log.
///
/// Every column, including the last one, is terminated by a comma so that rows of several
/// loggable items can be concatenated.
pub trait Loggable {
    /// Column names.
    fn log_header(&self) -> String;
    /// Column values, in the same order as the header.
    fn log_value(&self) -> String;
}

const AXES: [&str; 3] = ["x", "y", "z"];

/// Header of a three dimensional vector, e.g. `sat_position_i_x[m],sat_position_i_y[m],sat_position_i_z[m],`.
pub fn vector_header(name: &str, frame: &str, unit: &str) -> String {
    AXES.iter()
        .map(|axis| format!("{name}_{frame}_{axis}[{unit}],"))
        .collect()
}

/// Header of a scalar, e.g. `alt[m],`.
pub fn scalar_header(name: &str, unit: &str) -> String {
    format!("{name}[{unit}],")
}

pub fn vector_value(v: &Vector3<f64>) -> String {
    v.iter().map(|x| format!("{x:e},")).collect()
}

pub fn scalar_value(x: f64) -> String {
    format!("{x:e},")
}
