// Copyright (c) 2018-2022  Ministerio de Fomento
//                          Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

// Author(s): Rafael Villar Burke <pachi@ietcc.csic.es>,
//            Daniel Jiménez González <dani@ietcc.csic.es>,
//            Marta Sorribes Gil <msorribes@ietcc.csic.es>

//! Frecuencia de las series temporales

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Frecuencia de anualización de resultados en EnergyPlus
pub const RUN_PERIOD: &str = "Run Period";

/// Frecuencia de las series temporales (reporting frequency).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingFrequency {
    /// Zone timestep
    Timestep,
    /// Hourly
    Hourly,
    /// Daily
    Daily,
}

impl ReportingFrequency {
    /// Nombre de la frecuencia en la base de datos de EnergyPlus
    ///
    /// EnergyPlus ReportingFrequency string
    pub fn eplus_name(self) -> &'static str {
        match self {
            ReportingFrequency::Timestep => "Zone Timestep",
            ReportingFrequency::Hourly => "Hourly",
            ReportingFrequency::Daily => "Daily",
        }
    }

    /// Etiqueta de la columna de intervalos
    ///
    /// Interval column label
    pub fn interval_label(self) -> &'static str {
        match self {
            ReportingFrequency::Timestep => "Timestep",
            ReportingFrequency::Hourly => "Hour",
            ReportingFrequency::Daily => "Day",
        }
    }

    /// Número de intervalos esperado en un año
    ///
    /// Expected number of intervals for a one year run
    pub fn num_intervals(self, timesteps_per_hour: u32) -> usize {
        match self {
            ReportingFrequency::Timestep => 8760 * timesteps_per_hour.max(1) as usize,
            ReportingFrequency::Hourly => 8760,
            ReportingFrequency::Daily => 365,
        }
    }
}

impl Default for ReportingFrequency {
    fn default() -> Self {
        ReportingFrequency::Hourly
    }
}

impl str::FromStr for ReportingFrequency {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<ReportingFrequency, Self::Err> {
        match s.trim() {
            "timestep" => Ok(ReportingFrequency::Timestep),
            "hourly" => Ok(ReportingFrequency::Hourly),
            "daily" => Ok(ReportingFrequency::Daily),
            _ => Err(ReportError::UnknownFrequency(s.into())),
        }
    }
}

impl fmt::Display for ReportingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportingFrequency::Timestep => "timestep",
            ReportingFrequency::Hourly => "hourly",
            ReportingFrequency::Daily => "daily",
        };
        write!(f, "{}", s)
    }
}
