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
Informe de resultados
=====================

Tablas de resultados anuales, de datos para el cálculo ERI y de series temporales.

- `results_annual.csv`: `<name> (<units>), <value>` rows, one block per family
- `results_eri.csv`: `<key>, <value>` rows, lists as `['a', 'b']`, missing values as `None`
- `results_timeseries.csv`: interval index column plus one column per output

Values are rounded to two decimals.
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::context::ReportContext;
use crate::disaggregation::SystemEntry;
use crate::error::{ReportError, Result};
use crate::hpxml::{BuildingDescription, Efficiency};
use crate::taxonomy::end_use_defs;
use crate::types::{LoadType, Metric, ReportingFrequency};
use crate::vecops::round2;

/// Nombre del archivo de resultados anuales
pub const ANNUAL_FILE: &str = "results_annual.csv";
/// Nombre del archivo de resultados para el cálculo ERI
pub const ERI_FILE: &str = "results_eri.csv";
/// Nombre del archivo de series temporales
pub const TIMESERIES_FILE: &str = "results_timeseries.csv";

/// Informe de resultados de una simulación
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Tabla de resultados anuales
    pub annual: String,
    /// Tabla de resultados ERI (sólo con diseño ERI declarado)
    pub eri: Option<String>,
    /// Tabla de series temporales (sólo si se ha solicitado alguna)
    pub timeseries: Option<String>,
    /// Valores registrados: combustibles y usos finales
    pub registered: IndexMap<String, f64>,
}

impl Report {
    /// Genera el informe a partir del contexto completo
    pub fn build(
        ctx: &ReportContext,
        building: &BuildingDescription,
        frequency: ReportingFrequency,
        num_intervals: usize,
    ) -> Result<Self> {
        Ok(Report {
            annual: annual_table(ctx),
            eri: if building.eri_design.is_some() {
                Some(eri_table(ctx, building))
            } else {
                None
            },
            timeseries: timeseries_table(ctx, frequency, num_intervals)?,
            registered: registered_outputs(ctx),
        })
    }

    /// Escribe los archivos del informe en el directorio indicado
    ///
    /// Files are first written with a `.tmp` suffix and renamed once all of them
    /// exist, so a failure leaves no report files behind. Returns the written paths.
    pub fn write<P: AsRef<Path>>(&self, dir: P) -> io::Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let files = [
            (ANNUAL_FILE, Some(&self.annual)),
            (ERI_FILE, self.eri.as_ref()),
            (TIMESERIES_FILE, self.timeseries.as_ref()),
        ];
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        for (name, content) in files.iter() {
            if let Some(content) = content {
                let tmp = dir.join(format!("{}.tmp", name));
                if let Err(err) = fs::write(&tmp, content) {
                    remove_files(staged.iter().map(|(tmp, _)| tmp));
                    return Err(err);
                }
                staged.push((tmp, dir.join(name)));
            }
        }

        let mut written = Vec::new();
        for (tmp, path) in &staged {
            if let Err(err) = fs::rename(tmp, path) {
                remove_files(staged.iter().map(|(tmp, _)| tmp));
                remove_files(written.iter());
                return Err(err);
            }
            written.push(path.clone());
        }
        Ok(written)
    }

    /// Valores registrados en formato JSON
    pub fn registered_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.registered)?)
    }
}

/// Elimina archivos, ignorando los que ya no existen
fn remove_files<'a, I: IntoIterator<Item = &'a PathBuf>>(paths: I) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

// ------------------------------ Annual table --------------------------------

fn annual_rows<'a, I: IntoIterator<Item = &'a Metric>>(metrics: I) -> Vec<String> {
    metrics
        .into_iter()
        .map(|m| format!("{} ({}), {:?}", m.name, m.annual_units, round2(m.annual())))
        .collect()
}

/// Tabla de resultados anuales
pub fn annual_table(ctx: &ReportContext) -> String {
    let sections = vec![
        annual_rows(ctx.fuels.values()),
        annual_rows(ctx.end_uses.values()),
        annual_rows(ctx.loads.values()),
        annual_rows(ctx.unmet_loads.values()),
        annual_rows(ctx.peak_fuels.values()),
        annual_rows(ctx.peak_loads.values()),
        annual_rows(ctx.component_loads.values()),
    ];
    let mut out = sections.iter().map(|rows| rows.join("\n")).join("\n\n");
    out.push('\n');
    out
}

// -------------------------------- ERI table ---------------------------------

fn py_str(s: &str) -> String {
    format!("'{}'", s)
}

fn py_float(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:?}", v),
        None => "None".to_string(),
    }
}

fn py_list<I: IntoIterator<Item = String>>(items: I) -> String {
    format!("[{}]", items.into_iter().join(", "))
}

/// Clave ERI de un resultado: nombre sin espacios, dos puntos ni barras
pub fn eri_key(prefix: &str, name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '/'))
        .collect();
    format!("{}{}", prefix, sanitized)
}

/// Coeficiente de eficiencia equivalente de un rendimiento
///
/// Rating metrics in Btu/Wh (HSPF, SEER, EER, CEER) use 3.413/value, the rest 1/value
pub fn equivalent_efficiency(eff: &Efficiency) -> f64 {
    match eff.units.as_str() {
        "HSPF" | "SEER" | "EER" | "CEER" => 3.413 / eff.value,
        _ => 1.0 / eff.value,
    }
}

fn system_ids(entries: &[SystemEntry]) -> String {
    py_list(entries.iter().map(|e| py_str(e.id.as_str())))
}

fn system_fuels(entries: &[SystemEntry]) -> String {
    py_list(entries.iter().map(|e| match e.fuel {
        Some(fuel) => py_str(fuel.name()),
        None => "None".to_string(),
    }))
}

fn system_values(metric: &Metric, entries: &[SystemEntry]) -> String {
    py_list(
        entries
            .iter()
            .map(|e| py_float(Some(round2(metric.system_annual(&e.id))))),
    )
}

/// Tabla de datos para el cálculo ERI
pub fn eri_table(ctx: &ReportContext, building: &BuildingDescription) -> String {
    let systems = &ctx.systems;
    let mut rows: Vec<(String, String)> = vec![
        ("hpxml_heat_sys_ids".into(), system_ids(&systems.heating)),
        ("hpxml_cool_sys_ids".into(), system_ids(&systems.cooling)),
        ("hpxml_dhw_sys_ids".into(), system_ids(&systems.water_heating)),
        (
            "hpxml_eec_heats".into(),
            py_list(
                systems
                    .heating
                    .iter()
                    .map(|e| py_float(e.efficiency.as_ref().map(equivalent_efficiency))),
            ),
        ),
        (
            "hpxml_eec_cools".into(),
            py_list(
                systems
                    .cooling
                    .iter()
                    .map(|e| py_float(e.efficiency.as_ref().map(equivalent_efficiency))),
            ),
        ),
        (
            "hpxml_eec_dhws".into(),
            py_list(systems.water_heating.iter().map(|e| {
                // Combination systems are rated through their boiler
                let ef = if e.related_hvac.is_some() { None } else { e.energy_factor };
                py_float(ef.map(|v| 1.0 / v))
            })),
        ),
        ("hpxml_heat_fuels".into(), system_fuels(&systems.heating)),
        ("hpxml_dhw_fuels".into(), system_fuels(&systems.water_heating)),
    ];

    for def in end_use_defs() {
        let metric = match ctx.end_uses.get(&(def.fuel, def.end_use)) {
            Some(metric) => metric,
            None => continue,
        };
        let value = if !def.is_per_system() {
            py_float(Some(round2(metric.annual())))
        } else if def.end_use.is_heating() {
            system_values(metric, &systems.heating)
        } else if def.end_use.is_cooling() {
            system_values(metric, &systems.cooling)
        } else {
            system_values(metric, &systems.water_heating)
        };
        rows.push((eri_key("enduse", &metric.name), value));
    }

    for (load_type, metric) in &ctx.loads {
        let value = match load_type {
            LoadType::Heating => system_values(metric, &systems.heating),
            LoadType::Cooling => system_values(metric, &systems.cooling),
            LoadType::HotWaterSolarThermal => py_float(Some(round2(metric.annual()))),
            _ => system_values(metric, &systems.water_heating),
        };
        rows.push((eri_key("load", load_type.name()), value));
    }

    rows.push((
        "hpxml_cfa".into(),
        py_float(Some(building.conditioned_floor_area)),
    ));
    rows.push(("hpxml_nbr".into(), py_float(Some(building.number_of_bedrooms))));
    rows.push((
        "hpxml_nst".into(),
        py_float(Some(building.number_of_conditioned_floors)),
    ));

    let mut out = rows
        .iter()
        .map(|(key, value)| format!("{}, {}", key, value))
        .join("\n");
    out.push('\n');
    out
}

// ----------------------------- Timeseries table -----------------------------

fn data_column(metric: &Metric) -> Vec<String> {
    let mut column = vec![metric.name.clone(), metric.timeseries_units.to_string()];
    column.extend(
        metric
            .timeseries_output
            .iter()
            .map(|v| format!("{:?}", round2(*v))),
    );
    column
}

fn nonzero_columns<'a, I: IntoIterator<Item = &'a Metric>>(metrics: I) -> Vec<Vec<String>> {
    metrics
        .into_iter()
        .filter(|m| m.has_timeseries() && m.timeseries_sum() != 0.0)
        .map(data_column)
        .collect()
}

/// Tabla de series temporales (None si no se ha solicitado ninguna)
///
/// Columns with a zero sum are left out, except zone temperatures.
pub fn timeseries_table(
    ctx: &ReportContext,
    frequency: ReportingFrequency,
    num_intervals: usize,
) -> Result<Option<String>> {
    let opts = &ctx.options;
    if !opts.any_timeseries() {
        return Ok(None);
    }
    let mut columns: Vec<Vec<String>> = Vec::new();
    if opts.include_timeseries_fuel_consumptions {
        columns.extend(nonzero_columns(ctx.fuels.values()));
    }
    if opts.include_timeseries_end_use_consumptions {
        columns.extend(nonzero_columns(ctx.end_uses.values()));
    }
    if opts.include_timeseries_total_loads {
        columns.extend(nonzero_columns(ctx.loads.values()));
    }
    if opts.include_timeseries_component_loads {
        columns.extend(nonzero_columns(ctx.component_loads.values()));
    }
    if opts.include_timeseries_zone_temperatures {
        columns.extend(ctx.zone_temps.values().map(data_column));
    }
    if columns.is_empty() {
        return Ok(None);
    }

    let mut time_column = vec![frequency.interval_label().to_string(), "#".to_string()];
    time_column.extend((1..=num_intervals).map(|i| i.to_string()));
    columns.insert(0, time_column);

    let lengths: Vec<usize> = columns.iter().map(Vec::len).collect();
    if lengths.iter().any(|l| *l != lengths[0]) {
        return Err(ReportError::InconsistentLengths(lengths));
    }

    let mut out = (0..lengths[0])
        .map(|row| columns.iter().map(|c| c[row].as_str()).join(", "))
        .join("\n");
    out.push('\n');
    Ok(Some(out))
}

// ---------------------------- Registered values -----------------------------

/// Convierte un texto a minúsculas separadas por guiones bajos
///
/// "Electricity: Total MBtu" -> "electricity_total_m_btu"
pub fn underscore_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let chars: Vec<char> = token.chars().collect();
            let mut word = String::new();
            for (i, c) in chars.iter().enumerate() {
                if i > 0 && c.is_uppercase() {
                    let prev = chars[i - 1];
                    let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
                    if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_lower) {
                        word.push('_');
                    }
                }
                word.extend(c.to_lowercase());
            }
            word
        })
        .join("_")
}

/// Valores registrados: combustibles y usos finales anuales
pub fn registered_outputs(ctx: &ReportContext) -> IndexMap<String, f64> {
    ctx.fuels
        .values()
        .chain(ctx.end_uses.values())
        .map(|m| {
            (
                underscore_case(&format!("{} {}", m.name, m.annual_units)),
                round2(m.annual()),
            )
        })
        .collect()
}
