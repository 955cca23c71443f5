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

//! Demandas, demandas no atendidas, puntas y demandas por componentes

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Modo de funcionamiento de la climatización
///
/// HVAC mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum HvacMode {
    /// Heating
    Heating,
    /// Cooling
    Cooling,
}

impl HvacMode {
    /// Nombre
    pub fn name(self) -> &'static str {
        match self {
            HvacMode::Heating => "Heating",
            HvacMode::Cooling => "Cooling",
        }
    }

    /// Prefijo de las variables EMS de demanda (`htg`, `clg`)
    pub fn ems_tag(self) -> &'static str {
        match self {
            HvacMode::Heating => "htg",
            HvacMode::Cooling => "clg",
        }
    }
}

/// Demanda (load).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum LoadType {
    /// Space heating building load
    Heating,
    /// Space cooling building load
    Cooling,
    /// Hot water delivered to fixtures and appliances
    HotWaterDelivered,
    /// Water heater tank standby losses
    HotWaterTankLosses,
    /// Heat supplied by desuperheaters
    HotWaterDesuperheater,
    /// Heat supplied by solar thermal systems
    HotWaterSolarThermal,
}

impl LoadType {
    /// Nombre de la demanda en los informes
    ///
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            LoadType::Heating => "Heating",
            LoadType::Cooling => "Cooling",
            LoadType::HotWaterDelivered => "Hot Water: Delivered",
            LoadType::HotWaterTankLosses => "Hot Water: Tank Losses",
            LoadType::HotWaterDesuperheater => "Hot Water: Desuperheater",
            LoadType::HotWaterSolarThermal => "Hot Water: Solar Thermal",
        }
    }
}

/// Demanda no atendida (unmet load).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum UnmetLoadType {
    /// Unmet heating load
    Heating,
    /// Unmet cooling load
    Cooling,
}

impl UnmetLoadType {
    /// Nombre
    pub fn name(self) -> &'static str {
        match self {
            UnmetLoadType::Heating => "Heating",
            UnmetLoadType::Cooling => "Cooling",
        }
    }
}

/// Demanda punta (peak load).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum PeakLoadType {
    /// Peak heating load
    Heating,
    /// Peak cooling load
    Cooling,
}

impl PeakLoadType {
    /// Nombre
    pub fn name(self) -> &'static str {
        match self {
            PeakLoadType::Heating => "Heating",
            PeakLoadType::Cooling => "Cooling",
        }
    }
}

/// Periodo de la potencia punta de combustible (peak fuel).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum PeakFuelType {
    /// Winter months peak
    Winter,
    /// Summer months peak
    Summer,
}

impl PeakFuelType {
    /// Nombre
    pub fn name(self) -> &'static str {
        match self {
            PeakFuelType::Winter => "Winter",
            PeakFuelType::Summer => "Summer",
        }
    }
}

/// Elemento para el desglose de demandas por componentes (component load).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ComponentLoadType {
    /// Roofs
    Roofs,
    /// Ceilings
    Ceilings,
    /// Above grade walls
    Walls,
    /// Rim joists
    RimJoists,
    /// Foundation walls
    FoundationWalls,
    /// Doors
    Doors,
    /// Windows
    Windows,
    /// Skylights
    Skylights,
    /// Floors
    Floors,
    /// Slabs
    Slabs,
    /// Internal mass
    InternalMass,
    /// Infiltration
    Infiltration,
    /// Natural ventilation
    NaturalVentilation,
    /// Mechanical ventilation
    MechanicalVentilation,
    /// Whole house fan
    WholeHouseFan,
    /// Ducts
    Ducts,
    /// Internal gains
    InternalGains,
}

impl ComponentLoadType {
    /// Nombre
    pub fn name(self) -> &'static str {
        use ComponentLoadType::*;
        match self {
            Roofs => "Roofs",
            Ceilings => "Ceilings",
            Walls => "Walls",
            RimJoists => "Rim Joists",
            FoundationWalls => "Foundation Walls",
            Doors => "Doors",
            Windows => "Windows",
            Skylights => "Skylights",
            Floors => "Floors",
            Slabs => "Slabs",
            InternalMass => "Internal Mass",
            Infiltration => "Infiltration",
            NaturalVentilation => "Natural Ventilation",
            MechanicalVentilation => "Mechanical Ventilation",
            WholeHouseFan => "Whole House Fan",
            Ducts => "Ducts",
            InternalGains => "Internal Gains",
        }
    }

    /// Sufijo de la variable EMS del componente
    pub fn ems_tag(self) -> &'static str {
        use ComponentLoadType::*;
        match self {
            Roofs => "roofs",
            Ceilings => "ceilings",
            Walls => "walls",
            RimJoists => "rim_joists",
            FoundationWalls => "foundation_walls",
            Doors => "doors",
            Windows => "windows",
            Skylights => "skylights",
            Floors => "floors",
            Slabs => "slabs",
            InternalMass => "internal_mass",
            Infiltration => "infil",
            NaturalVentilation => "natvent",
            MechanicalVentilation => "mechvent",
            WholeHouseFan => "whf",
            Ducts => "ducts",
            InternalGains => "intgains",
        }
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for ComponentLoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
