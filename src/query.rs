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
Consultas de resultados
=======================

Translates (meter | output variable, keys) requests into annual sums in MBtu or
unit converted timeseries of the length expected for the reporting frequency.

A timeseries with no data in the store is replaced by zeros and a warning.
EMS output variables lag one interval behind the rest of the outputs, so their
timeseries are shifted one interval forward, repeating the last value.
*/

use tracing::warn;

use crate::error::Result;
use crate::store::{DictionaryFilter, SqlResultStore};
use crate::taxonomy::{TabularRef, EMS_KEY};
use crate::types::{ReportingFrequency, RUN_PERIOD};
use crate::units::{self, Unit};

/// Claves de las variables de salida
#[derive(Debug, Clone, PartialEq)]
pub enum KeySelector {
    /// Object names
    Named(Vec<String>),
    /// EMS output variables
    Ems,
    /// Any key
    Any,
}

/// Origen de una consulta
///
/// Query source: meters or output variables
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Meter names
    Meters(Vec<String>),
    /// Output variable names with their keys
    Variables {
        /// Keys
        keys: KeySelector,
        /// Variable names
        names: Vec<String>,
    },
}

impl Source {
    /// Contador único
    pub fn meter<S: Into<String>>(name: S) -> Self {
        Source::Meters(vec![name.into()])
    }

    /// Variables EMS
    pub fn ems(names: Vec<String>) -> Self {
        Source::Variables {
            keys: KeySelector::Ems,
            names,
        }
    }

    /// Variables de unos objetos
    pub fn objects(keys: Vec<String>, names: Vec<String>) -> Self {
        Source::Variables {
            keys: KeySelector::Named(keys),
            names,
        }
    }

    /// Variable con cualquier clave
    pub fn any_key<S: Into<String>>(name: S) -> Self {
        Source::Variables {
            keys: KeySelector::Any,
            names: vec![name.into()],
        }
    }

    /// ¿Consulta vacía (sin nombres o sin claves)?
    pub fn is_empty(&self) -> bool {
        match self {
            Source::Meters(names) => names.is_empty(),
            Source::Variables { keys, names } => {
                names.is_empty()
                    || match keys {
                        KeySelector::Named(k) => k.is_empty(),
                        _ => false,
                    }
            }
        }
    }

    /// ¿Variables EMS?
    pub fn is_ems(&self) -> bool {
        match self {
            Source::Variables { keys, .. } => *keys == KeySelector::Ems,
            _ => false,
        }
    }

    fn filter(&self, frequency: &str) -> DictionaryFilter {
        match self {
            Source::Meters(names) => DictionaryFilter {
                is_meter: true,
                keys: None,
                names: names.clone(),
                frequency: frequency.into(),
                units: Some("J".into()),
            },
            Source::Variables { keys, names } => DictionaryFilter {
                is_meter: false,
                keys: match keys {
                    KeySelector::Named(k) => Some(k.clone()),
                    KeySelector::Ems => Some(vec![EMS_KEY.to_string()]),
                    KeySelector::Any => None,
                },
                names: names.clone(),
                frequency: frequency.into(),
                units: None,
            },
        }
    }
}

/// Adaptador de consultas para una frecuencia de informe
///
/// Query adapter bound to a result store and a reporting frequency
#[derive(Debug)]
pub struct QueryAdapter<'a> {
    store: &'a SqlResultStore,
    /// Frecuencia de las series temporales
    pub frequency: ReportingFrequency,
    /// Pasos de cálculo por hora
    pub timesteps_per_hour: u32,
}

impl<'a> QueryAdapter<'a> {
    /// Nuevo adaptador
    pub fn new(store: &'a SqlResultStore, frequency: ReportingFrequency) -> Result<Self> {
        let timesteps_per_hour = store.timesteps_per_hour()?;
        Ok(QueryAdapter {
            store,
            frequency,
            timesteps_per_hour,
        })
    }

    /// Número de intervalos esperado en las series temporales
    pub fn num_intervals(&self) -> usize {
        self.frequency.num_intervals(self.timesteps_per_hour)
    }

    /// Suma anual en MBtu (0.0 si no hay datos)
    ///
    /// Annual sum in MBtu over the run period
    pub fn annual_sum(&self, source: &Source) -> Result<f64> {
        if source.is_empty() {
            return Ok(0.0);
        }
        let joules = self.store.sum(&source.filter(RUN_PERIOD))?.unwrap_or(0.0);
        Ok(joules * units::factor(Unit::J, Unit::MBtu)?)
    }

    /// Serie temporal convertida, `value * unit_conv + unit_offset`
    ///
    /// Per-interval series of `num_intervals()` values. Missing data gives zeros.
    pub fn timeseries(&self, source: &Source, unit_conv: f64, unit_offset: f64) -> Result<Vec<f64>> {
        let n = self.num_intervals();
        if source.is_empty() {
            return Ok(vec![0.0; n]);
        }
        let mut values =
            self.store
                .series(&source.filter(self.frequency.eplus_name()), unit_conv, unit_offset)?;
        if values.is_empty() {
            warn!(
                "No data found for {:?}, using zeros for the {} timeseries",
                source, self.frequency
            );
            return Ok(vec![0.0; n]);
        }
        if source.is_ems() && self.shifts_ems() {
            values.remove(0);
            if let Some(last) = values.last().copied() {
                values.push(last);
            }
        }
        Ok(values)
    }

    /// Serie temporal de energía en las unidades indicadas
    pub fn energy_timeseries(&self, source: &Source, to: Unit) -> Result<Vec<f64>> {
        self.timeseries(source, units::factor(Unit::J, to)?, 0.0)
    }

    // EMS values are reported at the zone timestep, so only that granularity
    // (or hourly with a single timestep per hour) shows the lag
    fn shifts_ems(&self) -> bool {
        match self.frequency {
            ReportingFrequency::Timestep => true,
            ReportingFrequency::Hourly => self.timesteps_per_hour == 1,
            ReportingFrequency::Daily => false,
        }
    }

    /// Valor de un informe tabular (0.0 si no existe)
    pub fn tabular(&self, lookup: &TabularRef) -> Result<f64> {
        Ok(self
            .store
            .tabular(
                &lookup.report,
                &lookup.report_for,
                &lookup.table,
                &lookup.row,
                &lookup.column,
                &lookup.units,
            )?
            .unwrap_or(0.0))
    }

    /// Claves de una variable a la frecuencia del informe, ordenadas
    pub fn variable_keys(&self, name: &str) -> Result<Vec<String>> {
        self.store.variable_keys(name, self.frequency.eplus_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testdb::TestDb;
    use crate::units::J_PER_BTU;

    const MBTU: f64 = 1e6 * J_PER_BTU;

    #[test]
    fn query_annual_sum_mbtu() {
        let db = TestDb::new(60);
        db.meter("Electricity:Facility", "Run Period", &[100.0 * MBTU]);
        let store = db.into_store();
        let q = QueryAdapter::new(&store, ReportingFrequency::Hourly).unwrap();
        let total = q.annual_sum(&Source::meter("Electricity:Facility")).unwrap();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(q.annual_sum(&Source::meter("Propane:Facility")).unwrap(), 0.0);
        assert_eq!(
            q.annual_sum(&Source::objects(vec![], vec!["Boiler NaturalGas Energy".into()]))
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn query_missing_timeseries_zero_filled() {
        let store = TestDb::new(60).into_store();
        let q = QueryAdapter::new(&store, ReportingFrequency::Hourly).unwrap();
        let ts = q.timeseries(&Source::meter("Electricity:Facility"), 1.0, 0.0).unwrap();
        assert_eq!(ts.len(), 8760);
        assert!(ts.iter().all(|v| *v == 0.0));

        let q = QueryAdapter::new(&store, ReportingFrequency::Daily).unwrap();
        let ts = q.timeseries(&Source::meter("Electricity:Facility"), 1.0, 0.0).unwrap();
        assert_eq!(ts.len(), 365);
    }

    #[test]
    fn query_ems_shift() {
        let db = TestDb::new(60);
        db.variable("EMS", "loads_htg_tot", "Hourly", &[1.0, 2.0, 3.0])
            .variable("EMS", "loads_htg_tot", "Daily", &[1.0, 2.0, 3.0])
            .variable("Coil", "Heating Coil Electricity Energy", "Hourly", &[1.0, 2.0, 3.0]);
        let store = db.into_store();

        let hourly = QueryAdapter::new(&store, ReportingFrequency::Hourly).unwrap();
        let ems = Source::ems(vec!["loads_htg_tot".into()]);
        assert_eq!(hourly.timeseries(&ems, 1.0, 0.0).unwrap(), vec![2.0, 3.0, 3.0]);
        let coil = Source::objects(vec!["COIL".into()], vec!["Heating Coil Electricity Energy".into()]);
        assert_eq!(hourly.timeseries(&coil, 1.0, 0.0).unwrap(), vec![1.0, 2.0, 3.0]);

        let daily = QueryAdapter::new(&store, ReportingFrequency::Daily).unwrap();
        assert_eq!(daily.timeseries(&ems, 1.0, 0.0).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn query_ems_no_shift_subhourly_hourly() {
        let db = TestDb::new(15);
        db.variable("EMS", "loads_clg_tot", "Hourly", &[1.0, 2.0]);
        let store = db.into_store();
        let q = QueryAdapter::new(&store, ReportingFrequency::Hourly).unwrap();
        assert_eq!(q.timesteps_per_hour, 4);
        let ems = Source::ems(vec!["loads_clg_tot".into()]);
        assert_eq!(q.timeseries(&ems, 1.0, 0.0).unwrap(), vec![1.0, 2.0]);
    }
}
