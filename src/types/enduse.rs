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

//! Usos finales

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::error::ReportError;

/// Uso final de la energía (end use).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum EndUseType {
    /// Space heating
    Heating,
    /// Fans and pumps serving space heating
    HeatingFansPumps,
    /// Space cooling
    Cooling,
    /// Fans and pumps serving space cooling
    CoolingFansPumps,
    /// Domestic hot water
    HotWater,
    /// Hot water recirculation pump
    HotWaterRecircPump,
    /// Solar thermal collector loop pump
    HotWaterSolarThermalPump,
    /// Interior lighting
    LightingInterior,
    /// Garage lighting
    LightingGarage,
    /// Exterior lighting
    LightingExterior,
    /// Mechanical ventilation
    MechVent,
    /// Whole house fan
    WholeHouseFan,
    /// Refrigerator
    Refrigerator,
    /// Freezer
    Freezer,
    /// Dehumidifier
    Dehumidifier,
    /// Dishwasher
    Dishwasher,
    /// Clothes washer
    ClothesWasher,
    /// Clothes dryer
    ClothesDryer,
    /// Range and oven
    RangeOven,
    /// Ceiling fan
    CeilingFan,
    /// Television
    Television,
    /// Miscellaneous plug loads
    PlugLoads,
    /// Photovoltaic production (negative)
    PV,
}

impl EndUseType {
    /// Nombre del uso final en los informes
    ///
    /// Display name
    pub fn name(self) -> &'static str {
        use EndUseType::*;
        match self {
            Heating => "Heating",
            HeatingFansPumps => "Heating Fans/Pumps",
            Cooling => "Cooling",
            CoolingFansPumps => "Cooling Fans/Pumps",
            HotWater => "Hot Water",
            HotWaterRecircPump => "Hot Water Recirc Pump",
            HotWaterSolarThermalPump => "Hot Water Solar Thermal Pump",
            LightingInterior => "Lighting Interior",
            LightingGarage => "Lighting Garage",
            LightingExterior => "Lighting Exterior",
            MechVent => "Mech Vent",
            WholeHouseFan => "Whole House Fan",
            Refrigerator => "Refrigerator",
            Freezer => "Freezer",
            Dehumidifier => "Dehumidifier",
            Dishwasher => "Dishwasher",
            ClothesWasher => "Clothes Washer",
            ClothesDryer => "Clothes Dryer",
            RangeOven => "Range/Oven",
            CeilingFan => "Ceiling Fan",
            Television => "Television",
            PlugLoads => "Plug Loads",
            PV => "PV",
        }
    }

    /// ¿Pertenece a los servicios de calefacción?
    pub fn is_heating(self) -> bool {
        self == EndUseType::Heating || self == EndUseType::HeatingFansPumps
    }

    /// ¿Pertenece a los servicios de refrigeración?
    pub fn is_cooling(self) -> bool {
        self == EndUseType::Cooling || self == EndUseType::CoolingFansPumps
    }

    /// ¿Pertenece a los servicios de ACS (por sistema)?
    pub fn is_hot_water(self) -> bool {
        self == EndUseType::HotWater || self == EndUseType::HotWaterRecircPump
    }
}

impl str::FromStr for EndUseType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<EndUseType, Self::Err> {
        use strum::IntoEnumIterator;
        EndUseType::iter()
            .find(|eu| eu.name() == s)
            .ok_or_else(|| ReportError::ParseError(s.into()))
    }
}

impl fmt::Display for EndUseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enduse_names() {
        assert_eq!(
            "Heating Fans/Pumps".parse::<EndUseType>().unwrap(),
            EndUseType::HeatingFansPumps
        );
        assert_eq!(EndUseType::RangeOven.to_string(), "Range/Oven");
        assert!("Sauna".parse::<EndUseType>().is_err());
    }
}
