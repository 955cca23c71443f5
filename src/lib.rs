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
SimReport
=========

This crate provides a library and binary that **builds the annual and timeseries output
report of an EnergyPlus simulation of an HPXML building description**.

The results stored by EnergyPlus in its SQLite output are aggregated by fuel, end use,
building load, unmet load, peak and component load, assigned to the heating, cooling and
water heating systems of the building and checked for consistency before the report
tables are written:

- distribution system efficiency (DSE) adjustments credited to the fuel totals
- load split between the heat pump and backup of dual-fuel heat pumps
- combination boiler energy moved from space heating to hot water
- solar fraction adjustment of the hot water delivered load
- end uses add up to fuel totals and timeseries add up to annual values (0.1 MBtu)

Este *crate* proporciona una biblioteca y un programa que **genera el informe de resultados
anuales y series temporales de una simulación de EnergyPlus** de un edificio descrito en HPXML.

Los resultados se agregan por combustible, uso final, demanda, demanda no atendida, punta y
demanda por componentes, se asignan a los sistemas de climatización y ACS y se comprueba su
coherencia antes de escribir las tablas del informe.

# Ejemplo

```no_run
use simreport::*;

let store = SqlResultStore::open("run/eplusout.sql").unwrap();
let building: BuildingDescription = std::fs::read_to_string("run/in.xml")
    .unwrap()
    .parse()
    .unwrap();
let map = OutputNameMap::default();
let options = ReportOptions::default();

let report = simulation_output_report(&store, &building, &map, &options).unwrap();
println!("{}", report.annual);
report.write("run").unwrap();
store.close().unwrap();
```

*/

#![deny(missing_docs)]

#[cfg(test)] // <-- not needed in examples + integration tests
#[macro_use]
extern crate pretty_assertions;

mod vecops;

pub mod aggregate;
pub mod context;
pub mod disaggregation;
pub mod error;
pub mod hpxml;
pub mod options;
pub mod outputmap;
pub mod query;
pub mod report;
pub mod store;
pub mod taxonomy;
pub mod types;
pub mod units;

pub use context::ReportContext;
pub use error::{ReportError, Result};
pub use hpxml::BuildingDescription;
pub use options::ReportOptions;
pub use outputmap::OutputNameMap;
pub use query::QueryAdapter;
pub use report::Report;
pub use store::SqlResultStore;
pub use types::*;

use tracing::info;

/// Número de versión de la librería
///
/// Version number
pub static VERSION: &str = env!("CARGO_PKG_VERSION");

/// Genera el informe de resultados de una simulación
///
/// Runs the whole report: queries, system disaggregation, per-system sums,
/// consistency checks and report tables. Nothing is returned on a failed check.
pub fn simulation_output_report(
    store: &SqlResultStore,
    building: &BuildingDescription,
    map: &OutputNameMap,
    options: &ReportOptions,
) -> Result<Report> {
    let q = QueryAdapter::new(store, options.timeseries_frequency)?;
    info!(
        "Report frequency {} with {} timesteps per hour",
        q.frequency, q.timesteps_per_hour
    );
    let mut ctx = ReportContext::new(*options);
    ctx.populate(&q, building, map)?;
    aggregate::check_for_errors(&ctx)?;
    Report::build(&ctx, building, q.frequency, q.num_intervals())
}
