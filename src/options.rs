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

//! Opciones del informe

use serde::{Deserialize, Serialize};

use crate::types::ReportingFrequency;

/// Opciones del informe de resultados
///
/// Report options: timeseries frequency and the timeseries families to output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Frecuencia de las series temporales
    pub timeseries_frequency: ReportingFrequency,
    /// Series de consumo por combustible
    pub include_timeseries_fuel_consumptions: bool,
    /// Series de consumo por uso final
    pub include_timeseries_end_use_consumptions: bool,
    /// Series de demandas totales
    pub include_timeseries_total_loads: bool,
    /// Series de demandas por componentes
    pub include_timeseries_component_loads: bool,
    /// Series de temperaturas de zona
    pub include_timeseries_zone_temperatures: bool,
}

impl ReportOptions {
    /// ¿Se solicita alguna serie temporal?
    pub fn any_timeseries(&self) -> bool {
        self.include_timeseries_fuel_consumptions
            || self.include_timeseries_end_use_consumptions
            || self.include_timeseries_total_loads
            || self.include_timeseries_component_loads
            || self.include_timeseries_zone_temperatures
    }

    /// ¿Hay que calcular series de usos finales por sistema?
    ///
    /// Per-system end use timeseries feed both the end use and the fuel totals
    pub fn system_end_use_timeseries(&self) -> bool {
        self.include_timeseries_fuel_consumptions || self.include_timeseries_end_use_consumptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_and_json() {
        let opts = ReportOptions::default();
        assert_eq!(opts.timeseries_frequency, ReportingFrequency::Hourly);
        assert!(!opts.any_timeseries());

        let opts: ReportOptions = serde_json::from_str(
            r#"{"timeseries_frequency": "daily", "include_timeseries_fuel_consumptions": true}"#,
        )
        .unwrap();
        assert_eq!(opts.timeseries_frequency, ReportingFrequency::Daily);
        assert!(opts.system_end_use_timeseries());
        assert!(!opts.include_timeseries_zone_temperatures);
    }
}
