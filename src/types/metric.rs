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

//! Resultados (métricas) del informe

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::SystemId;
use crate::units::Unit;
use crate::vecops::{veckmul, vecsum, vecvecdif, vecvecsum};

/// Resultado anual y horario de un combustible, uso final, demanda, etc
///
/// Metric record for a fuel, end use, load, peak, component load or zone temperature.
///
/// When per-system values exist the aggregate is their sum, unless the aggregate
/// was computed independently (`annual_output` already set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Nombre
    pub name: String,
    /// Unidades del valor anual
    pub annual_units: Unit,
    /// Valor anual (None si no se ha calculado de forma independiente)
    pub annual_output: Option<f64>,
    /// Unidades de la serie temporal
    pub timeseries_units: Unit,
    /// Serie temporal (vacía si no se ha solicitado)
    pub timeseries_output: Vec<f64>,
    /// Valor anual por sistema
    pub annual_output_by_system: IndexMap<SystemId, f64>,
    /// Serie temporal por sistema
    pub timeseries_output_by_system: IndexMap<SystemId, Vec<f64>>,
}

/// Variación producida al modificar el valor de un sistema
///
/// Change produced by rescaling one system, to be absorbed by a parent total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemDelta {
    /// Variación del valor anual
    pub annual: f64,
    /// Variación de la serie temporal (vacía si el sistema no la tiene)
    pub timeseries: Vec<f64>,
}

impl Metric {
    /// Nuevo resultado sin valores
    pub fn new<S: Into<String>>(name: S, annual_units: Unit, timeseries_units: Unit) -> Self {
        Metric {
            name: name.into(),
            annual_units,
            annual_output: None,
            timeseries_units,
            timeseries_output: Vec::new(),
            annual_output_by_system: IndexMap::new(),
            timeseries_output_by_system: IndexMap::new(),
        }
    }

    /// Valor anual (0.0 si no existe)
    pub fn annual(&self) -> f64 {
        self.annual_output.unwrap_or(0.0)
    }

    /// Valor anual de un sistema (0.0 si no existe)
    pub fn system_annual(&self, sys: &SystemId) -> f64 {
        self.annual_output_by_system.get(sys).copied().unwrap_or(0.0)
    }

    /// ¿Tiene serie temporal?
    pub fn has_timeseries(&self) -> bool {
        !self.timeseries_output.is_empty()
    }

    /// ¿Tiene valores por sistema?
    pub fn has_systems(&self) -> bool {
        !self.annual_output_by_system.is_empty()
    }

    /// Añade una cantidad al valor anual
    pub fn add_annual(&mut self, value: f64) {
        self.annual_output = Some(self.annual() + value);
    }

    /// Añade una serie temporal, elemento a elemento, a la serie existente
    pub fn add_timeseries(&mut self, values: &[f64]) {
        self.timeseries_output = vecvecsum(&self.timeseries_output, values);
    }

    /// Añade una cantidad al valor anual de un sistema y, si existe, a su serie
    pub fn add_to_system(&mut self, sys: &SystemId, annual: f64, timeseries: &[f64]) {
        *self
            .annual_output_by_system
            .entry(sys.clone())
            .or_insert(0.0) += annual;
        if !timeseries.is_empty() {
            let entry = self
                .timeseries_output_by_system
                .entry(sys.clone())
                .or_insert_with(Vec::new);
            *entry = vecvecsum(entry, timeseries);
        }
    }

    /// Escala los valores de un sistema y devuelve la variación producida
    ///
    /// Scale one system's annual and timeseries values, returning the change
    pub fn scale_system(&mut self, sys: &SystemId, mult: f64) -> SystemDelta {
        let mut delta = SystemDelta::default();
        if let Some(value) = self.annual_output_by_system.get_mut(sys) {
            let scaled = *value * mult;
            delta.annual = scaled - *value;
            *value = scaled;
        }
        if let Some(values) = self.timeseries_output_by_system.get_mut(sys) {
            let scaled = veckmul(values, mult);
            delta.timeseries = vecvecdif(&scaled, values);
            *values = scaled;
        }
        delta
    }

    /// Incorpora una variación al total (anual y, si existe, serie temporal)
    ///
    /// Absorb a delta into the aggregate annual value and existing timeseries
    pub fn absorb(&mut self, delta: &SystemDelta) {
        self.add_annual(delta.annual);
        if self.has_timeseries() && !delta.timeseries.is_empty() {
            self.add_timeseries(&delta.timeseries);
        }
    }

    /// Suma de la serie temporal
    pub fn timeseries_sum(&self) -> f64 {
        vecsum(&self.timeseries_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_scale_and_absorb() {
        let sys = SystemId::new("HeatingSystem");
        let mut end_use = Metric::new("Natural Gas: Heating", Unit::MBtu, Unit::KBtu);
        end_use.add_to_system(&sys, 10.0, &[4.0, 6.0]);

        let mut fuel = Metric::new("Natural Gas: Total", Unit::MBtu, Unit::KBtu);
        fuel.add_annual(10.0);
        fuel.add_timeseries(&[4.0, 6.0]);

        let delta = end_use.scale_system(&sys, 1.0 / 0.8);
        fuel.absorb(&delta);

        assert!((end_use.system_annual(&sys) - 12.5).abs() < 1e-9);
        assert!((delta.annual - 2.5).abs() < 1e-9);
        assert!((fuel.annual() - 12.5).abs() < 1e-9);
        assert!((fuel.timeseries_sum() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn metric_scale_missing_system() {
        let mut end_use = Metric::new("Electricity: Cooling", Unit::MBtu, Unit::KWh);
        let delta = end_use.scale_system(&SystemId::new("Missing"), 2.0);
        assert_eq!(delta, SystemDelta::default());
        assert!(!end_use.has_systems());
    }

    #[test]
    fn metric_absorb_without_timeseries() {
        let mut fuel = Metric::new("Electricity: Total", Unit::MBtu, Unit::KWh);
        fuel.add_annual(1.0);
        fuel.absorb(&SystemDelta {
            annual: 0.5,
            timeseries: vec![0.25, 0.25],
        });
        assert_eq!(fuel.annual(), 1.5);
        assert!(!fuel.has_timeseries());
    }
}
