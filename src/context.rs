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
Contexto del informe
====================

Holds every metric family of one report run and fills them in order:

1. fuels, peak fuels, loads, component loads, unmet loads and peak loads
2. meter based end uses (PV is reported as a negative value)
3. heating, cooling and water heating systems (see `disaggregation`)
4. per-system sums (see `aggregate`)
5. zone temperatures

The context is rebuilt for each run and never shared.
*/

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::disaggregation::{self, Systems};
use crate::error::Result;
use crate::hpxml::BuildingDescription;
use crate::outputmap::OutputNameMap;
use crate::options::ReportOptions;
use crate::query::{QueryAdapter, Source};
use crate::taxonomy::{
    component_load_name, component_load_variable, end_use_defs, fuel_name, fuel_timeseries_units,
    load_defs, peak_fuel_keys, peak_fuel_name, peak_fuel_tabular, peak_load_name,
    peak_load_tabular, unmet_load_name, unmet_load_variable, zone_temp_name, EndUseQuery,
    LoadQuery, ANNUAL_UNITS, ZONE_TEMP_VARIABLE,
};
use crate::types::{
    ComponentLoadType, EndUseType, FuelType, HvacMode, LoadType, Metric, PeakFuelType,
    PeakLoadType, SystemId, UnmetLoadType,
};
use crate::units::{self, Unit};
use crate::vecops::veckmul;
use crate::aggregate;

/// Contexto de un informe de resultados
///
/// Report context: all metric families of a run
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Opciones del informe
    pub options: ReportOptions,
    /// Combustibles
    pub fuels: IndexMap<FuelType, Metric>,
    /// Usos finales
    pub end_uses: IndexMap<(FuelType, EndUseType), Metric>,
    /// Demandas
    pub loads: IndexMap<LoadType, Metric>,
    /// Demandas no atendidas
    pub unmet_loads: IndexMap<UnmetLoadType, Metric>,
    /// Potencias punta de combustible
    pub peak_fuels: IndexMap<(FuelType, PeakFuelType), Metric>,
    /// Demandas punta
    pub peak_loads: IndexMap<PeakLoadType, Metric>,
    /// Demandas por componentes
    pub component_loads: IndexMap<(HvacMode, ComponentLoadType), Metric>,
    /// Temperaturas de zona
    pub zone_temps: IndexMap<String, Metric>,
    /// Sistemas del edificio
    pub systems: Systems,
}

/// Serie de energía, evitando la consulta cuando el total anual es nulo
pub(crate) fn energy_series(q: &QueryAdapter, src: &Source, annual: f64, to: Unit) -> Result<Vec<f64>> {
    if annual == 0.0 {
        Ok(vec![0.0; q.num_intervals()])
    } else {
        q.energy_timeseries(src, to)
    }
}

impl ReportContext {
    /// Contexto vacío con todas las métricas de la taxonomía
    pub fn new(options: ReportOptions) -> Self {
        let fuels = FuelType::iter()
            .map(|f| (f, Metric::new(fuel_name(f), ANNUAL_UNITS, fuel_timeseries_units(f))))
            .collect();
        let end_uses = end_use_defs()
            .into_iter()
            .map(|d| {
                let metric = Metric::new(d.name(), d.annual_units, d.timeseries_units);
                ((d.fuel, d.end_use), metric)
            })
            .collect();
        let loads = load_defs()
            .into_iter()
            .map(|d| {
                let metric = Metric::new(d.name(), d.annual_units, d.timeseries_units);
                (d.load_type, metric)
            })
            .collect();
        let unmet_loads = UnmetLoadType::iter()
            .map(|u| (u, Metric::new(unmet_load_name(u), ANNUAL_UNITS, Unit::KBtu)))
            .collect();
        let peak_fuels = peak_fuel_keys()
            .into_iter()
            .map(|(f, s)| ((f, s), Metric::new(peak_fuel_name(f, s), Unit::W, Unit::W)))
            .collect();
        let peak_loads = PeakLoadType::iter()
            .map(|p| (p, Metric::new(peak_load_name(p), Unit::KBtu, Unit::KBtu)))
            .collect();
        let mut component_loads = IndexMap::new();
        for mode in HvacMode::iter() {
            for comp in ComponentLoadType::iter() {
                component_loads.insert(
                    (mode, comp),
                    Metric::new(component_load_name(mode, comp), ANNUAL_UNITS, Unit::KBtu),
                );
            }
        }
        ReportContext {
            options,
            fuels,
            end_uses,
            loads,
            unmet_loads,
            peak_fuels,
            peak_loads,
            component_loads,
            zone_temps: IndexMap::new(),
            systems: Systems::default(),
        }
    }

    /// Rellena todas las métricas a partir de los resultados y la descripción del edificio
    ///
    /// Run the whole pipeline up to (and excluding) the consistency checks
    pub fn populate(
        &mut self,
        q: &QueryAdapter,
        building: &BuildingDescription,
        map: &OutputNameMap,
    ) -> Result<()> {
        self.systems = Systems::resolve(building);
        info!(
            "Systems: {} heating, {} cooling, {} water heating",
            self.systems.heating.len(),
            self.systems.cooling.len(),
            self.systems.water_heating.len()
        );

        self.get_fuels(q)?;
        self.get_peak_fuels(q)?;
        self.get_loads(q, building, map)?;
        self.get_component_loads(q)?;
        self.get_unmet_loads(q)?;
        self.get_peak_loads(q)?;
        self.get_meter_end_uses(q, building, map)?;

        disaggregation::heating_systems(self, q, map)?;
        disaggregation::cooling_systems(self, q, map)?;
        disaggregation::water_heating_systems(self, q, map)?;
        disaggregation::solar_fraction(self, building);

        aggregate::sum_system_outputs(self);

        self.get_zone_temps(q)?;
        Ok(())
    }

    fn get_fuels(&mut self, q: &QueryAdapter) -> Result<()> {
        let want_ts = self.options.include_timeseries_fuel_consumptions;
        for (fuel, metric) in self.fuels.iter_mut() {
            let src = Source::meter(fuel.facility_meter());
            let annual = q.annual_sum(&src)?;
            metric.annual_output = Some(annual);
            if want_ts {
                metric.timeseries_output = energy_series(q, &src, annual, metric.timeseries_units)?;
            }
            debug!("{}: {:.3} MBtu", metric.name, annual);
        }
        Ok(())
    }

    fn get_peak_fuels(&mut self, q: &QueryAdapter) -> Result<()> {
        for ((fuel, season), metric) in self.peak_fuels.iter_mut() {
            metric.annual_output = Some(q.tabular(&peak_fuel_tabular(*fuel, *season)?)?);
        }
        Ok(())
    }

    fn get_loads(
        &mut self,
        q: &QueryAdapter,
        building: &BuildingDescription,
        map: &OutputNameMap,
    ) -> Result<()> {
        let want_ts = self.options.include_timeseries_total_loads;
        // Simple solar systems (solar fraction) have no simulated collector
        let solar_ids: Vec<SystemId> = building
            .solar_thermal_systems
            .iter()
            .filter(|s| s.solar_fraction.is_none())
            .map(|s| SystemId::new(s.id.as_str()))
            .collect();

        for def in load_defs() {
            let src = match def.query {
                LoadQuery::Ems(name) => Source::ems(vec![name]),
                LoadQuery::SolarThermal(names) => {
                    Source::objects(map.object_keys_all(&solar_ids), names)
                }
                // Water heating system loads are read with the systems
                LoadQuery::PerSystem(_) => continue,
            };
            if let Some(metric) = self.loads.get_mut(&def.load_type) {
                let annual = q.annual_sum(&src)?;
                metric.annual_output = Some(annual);
                if want_ts {
                    metric.timeseries_output =
                        energy_series(q, &src, annual, metric.timeseries_units)?;
                }
            }
        }
        Ok(())
    }

    fn get_component_loads(&mut self, q: &QueryAdapter) -> Result<()> {
        let want_ts = self.options.include_timeseries_component_loads;
        for ((mode, comp), metric) in self.component_loads.iter_mut() {
            let src = Source::ems(vec![component_load_variable(*mode, *comp)]);
            let annual = q.annual_sum(&src)?;
            metric.annual_output = Some(annual);
            if want_ts {
                metric.timeseries_output = q.energy_timeseries(&src, metric.timeseries_units)?;
            }
        }
        Ok(())
    }

    fn get_unmet_loads(&mut self, q: &QueryAdapter) -> Result<()> {
        for (unmet, metric) in self.unmet_loads.iter_mut() {
            metric.annual_output = Some(q.annual_sum(&Source::any_key(unmet_load_variable(*unmet)))?);
        }
        Ok(())
    }

    fn get_peak_loads(&mut self, q: &QueryAdapter) -> Result<()> {
        for (peak, metric) in self.peak_loads.iter_mut() {
            // Hourly peak power read as the energy of that hour
            let watts = q.tabular(&peak_load_tabular(*peak))?;
            metric.annual_output = Some(units::convert(watts, Unit::Wh, metric.annual_units)?);
        }
        Ok(())
    }

    fn get_meter_end_uses(
        &mut self,
        q: &QueryAdapter,
        building: &BuildingDescription,
        map: &OutputNameMap,
    ) -> Result<()> {
        let want_ts = self.options.include_timeseries_end_use_consumptions;
        let solar_ids: Vec<SystemId> = building
            .solar_thermal_systems
            .iter()
            .map(|s| SystemId::new(s.id.as_str()))
            .collect();

        for def in end_use_defs() {
            let src = match def.query {
                EndUseQuery::Meter(name) => Source::meter(name),
                EndUseQuery::SolarThermal(names) => {
                    Source::objects(map.object_keys_all(&solar_ids), names)
                }
                EndUseQuery::PerSystem(_) => continue,
            };
            let metric = match self.end_uses.get_mut(&(def.fuel, def.end_use)) {
                Some(metric) => metric,
                None => continue,
            };
            let mut annual = q.annual_sum(&src)?;
            let mut ts = if want_ts {
                energy_series(q, &src, annual, metric.timeseries_units)?
            } else {
                Vec::new()
            };
            // Produced energy is reported as negative consumption
            if def.end_use == EndUseType::PV && annual > 0.0 {
                annual = -annual;
                ts = veckmul(&ts, -1.0);
            }
            metric.annual_output = Some(annual);
            metric.timeseries_output = ts;
        }
        Ok(())
    }

    fn get_zone_temps(&mut self, q: &QueryAdapter) -> Result<()> {
        if !self.options.include_timeseries_zone_temperatures {
            return Ok(());
        }
        let conv = units::factor(Unit::C, Unit::F)?;
        let offset = units::offset(Unit::C, Unit::F)?;
        for key in q.variable_keys(ZONE_TEMP_VARIABLE)? {
            let src = Source::objects(vec![key.clone()], vec![ZONE_TEMP_VARIABLE.to_string()]);
            let mut metric = Metric::new(zone_temp_name(&key), Unit::F, Unit::F);
            metric.timeseries_output = q.timeseries(&src, conv, offset)?;
            self.zone_temps.insert(key, metric);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testdb::TestDb;
    use crate::types::ReportingFrequency;
    use crate::units::J_PER_BTU;

    const MBTU: f64 = 1e6 * J_PER_BTU;

    #[test]
    fn context_taxonomy_metrics() {
        let ctx = ReportContext::new(ReportOptions::default());
        assert_eq!(ctx.fuels.len(), 7);
        assert_eq!(ctx.component_loads.len(), 34);
        assert_eq!(ctx.fuels[&FuelType::Electricity].name, "Electricity: Total");
        assert_eq!(
            ctx.end_uses[&(FuelType::Electricity, EndUseType::PV)].name,
            "Electricity: PV"
        );
    }

    #[test]
    fn context_pv_negated_and_zone_temps() {
        let db = TestDb::new(60);
        db.meter("Electricity:Facility", "Run Period", &[10.0 * MBTU])
            .meter("Photovoltaic:ElectricityProduced", "Run Period", &[4.0 * MBTU])
            .meter("Photovoltaic:ElectricityProduced", "Daily", &[2.0 * MBTU, 2.0 * MBTU])
            .variable_units("LIVING SPACE", "Zone Mean Air Temperature", "Daily", "C", &[20.0, 25.0]);
        let store = db.into_store();
        let q = QueryAdapter::new(&store, ReportingFrequency::Daily).unwrap();
        let options = ReportOptions {
            timeseries_frequency: ReportingFrequency::Daily,
            include_timeseries_end_use_consumptions: true,
            include_timeseries_zone_temperatures: true,
            ..Default::default()
        };
        let mut ctx = ReportContext::new(options);
        ctx.populate(&q, &BuildingDescription::default(), &OutputNameMap::default())
            .unwrap();

        let pv = &ctx.end_uses[&(FuelType::Electricity, EndUseType::PV)];
        assert!((pv.annual() + 4.0).abs() < 1e-9);
        assert!(pv.timeseries_output.iter().all(|v| *v < 0.0));

        let temp = &ctx.zone_temps["LIVING SPACE"];
        assert_eq!(temp.name, "Temperature: Living Space");
        assert!((temp.timeseries_output[0] - 68.0).abs() < 1e-9);
        assert!((temp.timeseries_output[1] - 77.0).abs() < 1e-9);
    }
}
