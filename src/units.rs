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

/*!
Conversión de unidades
======================

Unit conversion for energy, power, volume, volumetric flow and temperature.

Conversions are only allowed between units of the same dimension. Temperatures
carry an offset, so `factor` alone is not enough for them and `offset` gives the
additive part: `convert(v, from, to) == v * factor(from, to) + offset(from, to)`.
*/

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Julios por Btu (IT)
///
/// Joules per British thermal unit (IT)
pub const J_PER_BTU: f64 = 1055.05585262;

const M3_PER_GAL: f64 = 0.003_785_411_784;
const M3S_PER_CFM: f64 = 0.000_471_947_443_2;

/// Magnitud física de una unidad
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Dimension {
    Energy,
    Power,
    Volume,
    Flow,
    Temperature,
}

/// Unidades de medida
///
/// Units of measurement
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Joule
    J,
    /// Watt hour
    Wh,
    /// Kilowatt hour
    KWh,
    /// British thermal unit
    Btu,
    /// Thousand Btu
    KBtu,
    /// Million Btu
    MBtu,
    /// Therm (100 kBtu)
    Therm,
    /// Watt
    W,
    /// Kilowatt
    KW,
    /// Btu per hour
    BtuHr,
    /// kBtu per hour
    KBtuHr,
    /// Cubic meter
    M3,
    /// Liter
    L,
    /// US gallon
    Gal,
    /// Cubic meter per second
    M3PerS,
    /// Cubic feet per minute
    Cfm,
    /// US gallons per minute
    GalPerMin,
    /// Degree Celsius
    C,
    /// Degree Fahrenheit
    F,
    /// Kelvin
    K,
}

impl Unit {
    fn dimension(self) -> Dimension {
        use Unit::*;
        match self {
            J | Wh | KWh | Btu | KBtu | MBtu | Therm => Dimension::Energy,
            W | KW | BtuHr | KBtuHr => Dimension::Power,
            M3 | L | Gal => Dimension::Volume,
            M3PerS | Cfm | GalPerMin => Dimension::Flow,
            C | F | K => Dimension::Temperature,
        }
    }

    /// Value of one unit in the SI base unit of its dimension (J, W, m3, m3/s, K span)
    fn scale(self) -> f64 {
        use Unit::*;
        match self {
            J => 1.0,
            Wh => 3600.0,
            KWh => 3_600_000.0,
            Btu => J_PER_BTU,
            KBtu => 1e3 * J_PER_BTU,
            MBtu => 1e6 * J_PER_BTU,
            Therm => 1e5 * J_PER_BTU,
            W => 1.0,
            KW => 1000.0,
            BtuHr => J_PER_BTU / 3600.0,
            KBtuHr => 1e3 * J_PER_BTU / 3600.0,
            M3 => 1.0,
            L => 0.001,
            Gal => M3_PER_GAL,
            M3PerS => 1.0,
            Cfm => M3S_PER_CFM,
            GalPerMin => M3_PER_GAL / 60.0,
            C | K => 1.0,
            F => 5.0 / 9.0,
        }
    }

    fn to_kelvin(self, value: f64) -> f64 {
        match self {
            Unit::C => value + 273.15,
            Unit::F => (value - 32.0) * 5.0 / 9.0 + 273.15,
            _ => value,
        }
    }

    fn from_kelvin(self, value: f64) -> f64 {
        match self {
            Unit::C => value - 273.15,
            Unit::F => (value - 273.15) * 9.0 / 5.0 + 32.0,
            _ => value,
        }
    }

    /// Etiqueta de la unidad
    ///
    /// Unit label as written in reports
    pub fn label(self) -> &'static str {
        use Unit::*;
        match self {
            J => "J",
            Wh => "Wh",
            KWh => "kWh",
            Btu => "Btu",
            KBtu => "kBtu",
            MBtu => "MBtu",
            Therm => "therm",
            W => "W",
            KW => "kW",
            BtuHr => "Btu/hr",
            KBtuHr => "kBtu/hr",
            M3 => "m^3",
            L => "L",
            Gal => "gal",
            M3PerS => "m^3/s",
            Cfm => "cfm",
            GalPerMin => "gal/min",
            C => "C",
            F => "F",
            K => "K",
        }
    }
}

impl str::FromStr for Unit {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Unit> {
        use Unit::*;
        match s.trim() {
            "J" => Ok(J),
            "Wh" => Ok(Wh),
            "kWh" => Ok(KWh),
            "Btu" => Ok(Btu),
            "kBtu" => Ok(KBtu),
            "MBtu" => Ok(MBtu),
            "therm" => Ok(Therm),
            "W" => Ok(W),
            "kW" => Ok(KW),
            "Btu/hr" => Ok(BtuHr),
            "kBtu/hr" => Ok(KBtuHr),
            "m^3" => Ok(M3),
            "L" => Ok(L),
            "gal" => Ok(Gal),
            "m^3/s" => Ok(M3PerS),
            "cfm" => Ok(Cfm),
            "gal/min" => Ok(GalPerMin),
            "C" => Ok(C),
            "F" => Ok(F),
            "K" => Ok(K),
            _ => Err(ReportError::ParseError(format!("unknown unit \"{}\"", s))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn check_dimension(from: Unit, to: Unit) -> Result<()> {
    if from.dimension() != to.dimension() {
        return Err(ReportError::Config(format!(
            "cannot convert from {} to {}",
            from, to
        )));
    }
    Ok(())
}

/// Factor multiplicativo de conversión entre unidades
///
/// Multiplicative conversion factor from `from` units to `to` units.
/// For temperatures this is the span ratio (e.g. 1.8 for C to F).
pub fn factor(from: Unit, to: Unit) -> Result<f64> {
    check_dimension(from, to)?;
    Ok(from.scale() / to.scale())
}

/// Término aditivo de la conversión (no nulo sólo para temperaturas)
///
/// Additive part of the conversion. Zero except for temperatures.
pub fn offset(from: Unit, to: Unit) -> Result<f64> {
    check_dimension(from, to)?;
    if from.dimension() == Dimension::Temperature {
        Ok(to.from_kelvin(from.to_kelvin(0.0)))
    } else {
        Ok(0.0)
    }
}

/// Convierte un valor entre unidades
///
/// Convert a value from `from` units to `to` units
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64> {
    check_dimension(from, to)?;
    if from.dimension() == Dimension::Temperature {
        return Ok(to.from_kelvin(from.to_kelvin(value)));
    }
    Ok(value * from.scale() / to.scale())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn units_energy() {
        assert!(approx(
            convert(1_055_055_852.62, Unit::J, Unit::MBtu).unwrap(),
            1.0
        ));
        assert!(approx(convert(1.0, Unit::KWh, Unit::KBtu).unwrap(), 3.412_141_633));
        assert!(approx(convert(1.0, Unit::Therm, Unit::KBtu).unwrap(), 100.0));
        assert!(approx(convert(1000.0, Unit::Wh, Unit::KWh).unwrap(), 1.0));
    }

    #[test]
    fn units_power_volume_flow() {
        assert!(approx(convert(1.0, Unit::KW, Unit::BtuHr).unwrap(), 3412.141_633));
        assert!(approx(convert(1.0, Unit::Gal, Unit::L).unwrap(), 3.785_411_784));
        assert!(approx(convert(1.0, Unit::M3PerS, Unit::Cfm).unwrap(), 2118.880_003));
    }

    #[test]
    fn units_temperature() {
        assert!(approx(convert(100.0, Unit::C, Unit::F).unwrap(), 212.0));
        assert!(approx(convert(32.0, Unit::F, Unit::C).unwrap(), 0.0));
        assert!(approx(convert(0.0, Unit::C, Unit::K).unwrap(), 273.15));
        assert!(approx(factor(Unit::C, Unit::F).unwrap(), 1.8));
        assert!(approx(offset(Unit::C, Unit::F).unwrap(), 32.0));
        assert_eq!(offset(Unit::J, Unit::MBtu).unwrap(), 0.0);
    }

    #[test]
    fn units_incompatible() {
        assert!(convert(1.0, Unit::J, Unit::W).is_err());
        assert!(factor(Unit::C, Unit::Gal).is_err());
    }

    #[test]
    fn units_parse() {
        assert_eq!("kBtu/hr".parse::<Unit>().unwrap(), Unit::KBtuHr);
        assert_eq!(Unit::MBtu.to_string(), "MBtu");
        assert!("furlong".parse::<Unit>().is_err());
    }
}
