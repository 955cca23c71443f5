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
Agregación y comprobaciones
===========================

Sums of per-system values and consistency checks of the final results.
*/

use tracing::debug;

use crate::context::ReportContext;
use crate::error::{ReportError, Result};
use crate::types::{FuelType, EndUseType, Metric};
use crate::units;
use crate::vecops::veclistsum;

/// Tolerancia absoluta de las comprobaciones, en unidades anuales
pub const TOLERANCE: f64 = 0.1;

fn sum_metric(metric: &mut Metric) {
    if metric.annual_output.is_some() || !metric.has_systems() {
        return;
    }
    metric.annual_output = Some(metric.annual_output_by_system.values().sum());
    if !metric.timeseries_output_by_system.is_empty() {
        let series: Vec<&[f64]> = metric
            .timeseries_output_by_system
            .values()
            .map(Vec::as_slice)
            .collect();
        metric.timeseries_output = veclistsum(&series);
    }
}

/// Completa los totales no calculados de forma independiente con la suma por sistemas
///
/// Aggregates already set (e.g. the building heating load) are left untouched.
pub fn sum_system_outputs(ctx: &mut ReportContext) {
    for metric in ctx.end_uses.values_mut().chain(ctx.loads.values_mut()) {
        sum_metric(metric);
    }
}

fn check_timeseries<'a, I>(output_type: &str, metrics: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Metric>,
{
    for metric in metrics {
        if !metric.has_timeseries() {
            continue;
        }
        let sum = units::convert(
            metric.timeseries_sum(),
            metric.timeseries_units,
            metric.annual_units,
        )?;
        let annual = metric.annual();
        if (annual - sum).abs() > TOLERANCE {
            return Err(ReportError::TimeseriesMismatch {
                sum,
                annual,
                output_type: output_type.to_string(),
                key: metric.name.clone(),
            });
        }
    }
    Ok(())
}

/// Comprobaciones de consistencia de los resultados
///
/// 1. Some fuel consumption exists, otherwise the simulation failed.
/// 2. End uses of each fuel add up to its total (PV included for electricity).
/// 3. Timeseries add up to their annual values.
pub fn check_for_errors(ctx: &ReportContext) -> Result<()> {
    let all_fuels: f64 = ctx.fuels.values().map(Metric::annual).sum();
    if all_fuels == 0.0 {
        return Err(ReportError::SimulationUnsuccessful);
    }

    for (fuel, metric) in &ctx.fuels {
        let mut total = metric.annual();
        if fuel.is_electricity() {
            total += ctx
                .end_uses
                .get(&(FuelType::Electricity, EndUseType::PV))
                .map_or(0.0, Metric::annual);
        }
        let sum: f64 = ctx
            .end_uses
            .iter()
            .filter(|((f, _), _)| f == fuel)
            .map(|(_, m)| m.annual())
            .sum();
        debug!("{}: total {:.3}, end uses {:.3}", fuel.name(), total, sum);
        if (total - sum).abs() > TOLERANCE {
            return Err(ReportError::EndUseMismatch {
                fuel: fuel.name().to_string(),
                sum,
                total,
            });
        }
    }

    check_timeseries("End Use", ctx.end_uses.values())?;
    check_timeseries("Fuel", ctx.fuels.values())?;
    check_timeseries("Load", ctx.loads.values())?;
    check_timeseries("Component Load", ctx.component_loads.values())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ReportOptions;
    use crate::types::{LoadType, SystemId};

    fn context() -> ReportContext {
        let mut ctx = ReportContext::new(ReportOptions::default());
        for metric in ctx.fuels.values_mut() {
            metric.annual_output = Some(0.0);
        }
        for metric in ctx.end_uses.values_mut() {
            metric.annual_output = Some(0.0);
        }
        ctx
    }

    #[test]
    fn sum_system_outputs_keeps_independent_totals() {
        let mut ctx = ReportContext::new(ReportOptions::default());
        let a = SystemId::new("A");
        let b = SystemId::new("B");
        let key = (FuelType::NaturalGas, EndUseType::Heating);
        ctx.end_uses[&key].add_to_system(&a, 1.0, &[0.5, 0.5]);
        ctx.end_uses[&key].add_to_system(&b, 2.0, &[1.0, 1.0]);
        ctx.loads[&LoadType::Heating].annual_output = Some(10.0);
        ctx.loads[&LoadType::Heating].add_to_system(&a, 4.0, &[]);

        sum_system_outputs(&mut ctx);

        assert_eq!(ctx.end_uses[&key].annual_output, Some(3.0));
        assert_eq!(ctx.end_uses[&key].timeseries_output, vec![1.5, 1.5]);
        assert_eq!(ctx.loads[&LoadType::Heating].annual_output, Some(10.0));
        assert_eq!(ctx.loads[&LoadType::Cooling].annual_output, None);
    }

    #[test]
    fn check_simulation_unsuccessful() {
        let ctx = context();
        assert_eq!(
            check_for_errors(&ctx).unwrap_err().to_string(),
            "Simulation unsuccessful."
        );
    }

    #[test]
    fn check_end_use_mismatch() {
        let mut ctx = context();
        ctx.fuels[&FuelType::Electricity].annual_output = Some(100.0);
        ctx.end_uses[&(FuelType::Electricity, EndUseType::Heating)].annual_output = Some(100.0);
        assert!(check_for_errors(&ctx).is_ok());

        ctx.end_uses[&(FuelType::Electricity, EndUseType::Heating)].annual_output = Some(99.5);
        assert_eq!(
            check_for_errors(&ctx).unwrap_err().to_string(),
            "Electricity category end uses (99.500) do not sum to total (100.000)."
        );
    }

    #[test]
    fn check_pv_counts_against_electricity() {
        let mut ctx = context();
        ctx.fuels[&FuelType::Electricity].annual_output = Some(50.0);
        ctx.end_uses[&(FuelType::Electricity, EndUseType::PlugLoads)].annual_output = Some(50.0);
        ctx.end_uses[&(FuelType::Electricity, EndUseType::PV)].annual_output = Some(-20.0);
        assert!(check_for_errors(&ctx).is_ok());
    }

    #[test]
    fn check_timeseries_mismatch() {
        let mut ctx = context();
        ctx.fuels[&FuelType::NaturalGas].annual_output = Some(1.0);
        ctx.end_uses[&(FuelType::NaturalGas, EndUseType::Heating)].annual_output = Some(1.0);
        // 500 kBtu = 0.5 MBtu
        ctx.fuels[&FuelType::NaturalGas].timeseries_output = vec![250.0, 250.0];
        let err = check_for_errors(&ctx).unwrap_err();
        match err {
            ReportError::TimeseriesMismatch { output_type, key, .. } => {
                assert_eq!(output_type, "Fuel");
                assert_eq!(key, "Natural Gas: Total");
            }
            other => panic!("unexpected error {}", other),
        }
    }
}
