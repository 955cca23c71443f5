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

//! Combustibles

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::error::ReportError;

/// Combustible (fuel type).
///
/// Iteration order is fixed, with electricity first.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum FuelType {
    /// Electricity
    Electricity,
    /// Natural gas
    NaturalGas,
    /// Fuel oil (and other distillates)
    FuelOil,
    /// Propane
    Propane,
    /// Cord wood
    WoodCord,
    /// Wood pellets
    WoodPellets,
    /// Coal
    Coal,
}

impl FuelType {
    /// Nombre del combustible en los informes
    ///
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            FuelType::Electricity => "Electricity",
            FuelType::NaturalGas => "Natural Gas",
            FuelType::FuelOil => "Fuel Oil",
            FuelType::Propane => "Propane",
            FuelType::WoodCord => "Wood Cord",
            FuelType::WoodPellets => "Wood Pellets",
            FuelType::Coal => "Coal",
        }
    }

    /// Token de EnergyPlus para el combustible en nombres de variables y contadores
    ///
    /// EnergyPlus fuel token used in output variable and meter names
    pub fn eplus_token(self) -> &'static str {
        match self {
            FuelType::Electricity => "Electricity",
            FuelType::NaturalGas => "NaturalGas",
            FuelType::FuelOil => "FuelOilNo1",
            FuelType::Propane => "Propane",
            FuelType::WoodCord => "OtherFuel1",
            FuelType::WoodPellets => "OtherFuel2",
            FuelType::Coal => "Coal",
        }
    }

    /// Contador total del edificio para este combustible
    ///
    /// Facility meter of this fuel
    pub fn facility_meter(self) -> String {
        format!("{}:Facility", self.eplus_token())
    }

    /// ¿Es electricidad?
    pub fn is_electricity(self) -> bool {
        self == FuelType::Electricity
    }

    /// Interpreta el nombre de combustible usado en HPXML
    ///
    /// Parse an HPXML fuel string
    pub fn from_hpxml(s: &str) -> Result<FuelType, ReportError> {
        match s.trim() {
            "electricity" => Ok(FuelType::Electricity),
            "natural gas" | "renewable natural gas" => Ok(FuelType::NaturalGas),
            "fuel oil" | "fuel oil 1" | "fuel oil 2" | "fuel oil 4" | "fuel oil 5/6" | "diesel"
            | "kerosene" => Ok(FuelType::FuelOil),
            "propane" | "liquefied petroleum gas" => Ok(FuelType::Propane),
            "wood" => Ok(FuelType::WoodCord),
            "wood pellets" => Ok(FuelType::WoodPellets),
            "coal" | "anthracite coal" | "bituminous coal" | "coke" => Ok(FuelType::Coal),
            _ => Err(ReportError::WrongInput(format!(
                "unsupported HPXML fuel \"{}\"",
                s
            ))),
        }
    }
}

impl str::FromStr for FuelType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<FuelType, Self::Err> {
        match s {
            "Electricity" => Ok(FuelType::Electricity),
            "Natural Gas" => Ok(FuelType::NaturalGas),
            "Fuel Oil" => Ok(FuelType::FuelOil),
            "Propane" => Ok(FuelType::Propane),
            "Wood Cord" => Ok(FuelType::WoodCord),
            "Wood Pellets" => Ok(FuelType::WoodPellets),
            "Coal" => Ok(FuelType::Coal),
            _ => Err(ReportError::ParseError(s.into())),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
