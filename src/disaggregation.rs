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
Desagregación por sistemas
==========================

Assigns heating, cooling and water heating end uses and loads to the systems
of the building description:

- distribution system efficiency (DSE) scaling, absorbed by the fuel totals
- dual-fuel heat pump split of the heating load between primary and backup
- combination boiler transfer of energy from space heating to hot water
- water heater energy adjustments
- solar fraction adjustment of the hot water delivered load
*/

use strum::IntoEnumIterator;
use tracing::debug;

use crate::context::{energy_series, ReportContext};
use crate::error::Result;
use crate::hpxml::{BuildingDescription, Efficiency};
use crate::outputmap::OutputNameMap;
use crate::query::{QueryAdapter, Source};
use crate::taxonomy::{
    end_use_defs, fuel_timeseries_units, load_defs, EndUseDef, EndUseQuery, LoadQuery,
    SystemQuery, BOILER_LOAD_VARIABLE, COMBI_HX_VARIABLE, EMS_DFHP_LOAD, EMS_EC_ADJ,
};
use crate::types::{EndUseType, FuelType, LoadType, SystemDelta, SystemId};
use crate::vecops::veckmul;

/// Design value of an ERI Reference Home run: systems are reported by seed id
pub const ERI_REFERENCE_HOME: &str = "ERI Reference Home";

/// Papel de un sistema en una bomba de calor bivalente
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DfhpRole {
    /// Not part of a dual-fuel heat pump
    None,
    /// Heat pump element
    Primary,
    /// Backup (fuel) element
    Backup,
}

/// Sistema resuelto para la desagregación
///
/// Resolved system entry
#[derive(Debug, Clone, PartialEq)]
pub struct SystemEntry {
    /// Identificador informado (id semilla en la vivienda de referencia ERI)
    pub id: SystemId,
    /// Identificador en la descripción del edificio
    pub native_id: String,
    /// Identificador en el mapa de salidas
    pub map_id: SystemId,
    /// Combustible
    pub fuel: Option<FuelType>,
    /// Fracción de la demanda atendida
    pub fraction_load_served: f64,
    /// Rendimiento del sistema de distribución
    pub dse: f64,
    /// Papel en una bomba de calor bivalente
    pub dfhp: DfhpRole,
    /// Rendimiento nominal
    pub efficiency: Option<Efficiency>,
    /// Sistema de ACS: factor de energía (UEF o EF)
    pub energy_factor: Option<f64>,
    /// Sistema de ACS: sistema de calefacción asociado (sistema combinado)
    pub related_hvac: Option<String>,
}

impl SystemEntry {
    fn new(id: SystemId, native_id: &str, fuel: Option<FuelType>, fraction: f64, dse: f64) -> Self {
        SystemEntry {
            id,
            native_id: native_id.to_string(),
            map_id: SystemId::new(native_id),
            fuel,
            fraction_load_served: fraction,
            dse,
            dfhp: DfhpRole::None,
            efficiency: None,
            energy_factor: None,
            related_hvac: None,
        }
    }
}

/// Sistemas de calefacción, refrigeración y ACS del edificio
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Systems {
    /// Sistemas de calefacción
    pub heating: Vec<SystemEntry>,
    /// Sistemas de refrigeración
    pub cooling: Vec<SystemEntry>,
    /// Sistemas de ACS
    pub water_heating: Vec<SystemEntry>,
}

fn reported_id(building: &BuildingDescription, id: &str, seed_id: &Option<String>) -> SystemId {
    match seed_id {
        Some(seed) if building.eri_design.as_ref().map(String::as_str) == Some(ERI_REFERENCE_HOME) => {
            SystemId::new(seed.as_str())
        }
        _ => SystemId::new(id),
    }
}

fn heating_dse(building: &BuildingDescription, idref: &Option<String>) -> f64 {
    idref
        .as_ref()
        .and_then(|id| building.distribution(id))
        .and_then(|d| d.heating_dse)
        .unwrap_or(1.0)
}

fn cooling_dse(building: &BuildingDescription, idref: &Option<String>) -> f64 {
    idref
        .as_ref()
        .and_then(|id| building.distribution(id))
        .and_then(|d| d.cooling_dse)
        .unwrap_or(1.0)
}

impl Systems {
    /// Resuelve los sistemas de la descripción del edificio
    pub fn resolve(building: &BuildingDescription) -> Self {
        let mut systems = Systems::default();

        for hs in &building.heating_systems {
            if hs.fraction_heat_load_served <= 0.0 {
                continue;
            }
            let mut entry = SystemEntry::new(
                reported_id(building, &hs.id, &hs.seed_id),
                &hs.id,
                Some(hs.fuel),
                hs.fraction_heat_load_served,
                heating_dse(building, &hs.distribution_idref),
            );
            entry.efficiency = hs.efficiency.clone();
            systems.heating.push(entry);
        }

        for hp in &building.heat_pumps {
            if hp.fraction_heat_load_served <= 0.0 {
                continue;
            }
            let id = reported_id(building, &hp.id, &hp.seed_id);
            let dse = heating_dse(building, &hp.distribution_idref);
            let mut entry = SystemEntry::new(
                id.clone(),
                &hp.id,
                Some(hp.fuel),
                hp.fraction_heat_load_served,
                dse,
            );
            entry.efficiency = hp.heating_efficiency.clone();
            if hp.is_dual_fuel() {
                entry.dfhp = DfhpRole::Primary;
                let mut backup = SystemEntry::new(
                    id.dfhp_backup(),
                    &hp.id,
                    hp.backup_fuel,
                    hp.fraction_heat_load_served,
                    dse,
                );
                backup.map_id = entry.map_id.dfhp_backup();
                backup.dfhp = DfhpRole::Backup;
                backup.efficiency = hp.backup_efficiency.clone();
                systems.heating.push(entry);
                systems.heating.push(backup);
            } else {
                systems.heating.push(entry);
            }
        }

        for cs in &building.cooling_systems {
            if cs.fraction_cool_load_served <= 0.0 {
                continue;
            }
            let mut entry = SystemEntry::new(
                reported_id(building, &cs.id, &cs.seed_id),
                &cs.id,
                Some(FuelType::Electricity),
                cs.fraction_cool_load_served,
                cooling_dse(building, &cs.distribution_idref),
            );
            entry.efficiency = cs.efficiency.clone();
            systems.cooling.push(entry);
        }

        for hp in &building.heat_pumps {
            if hp.fraction_cool_load_served <= 0.0 {
                continue;
            }
            let mut entry = SystemEntry::new(
                reported_id(building, &hp.id, &hp.seed_id),
                &hp.id,
                Some(hp.fuel),
                hp.fraction_cool_load_served,
                cooling_dse(building, &hp.distribution_idref),
            );
            entry.efficiency = hp.cooling_efficiency.clone();
            systems.cooling.push(entry);
        }

        for dhw in &building.water_heating_systems {
            let mut entry = SystemEntry::new(
                reported_id(building, &dhw.id, &dhw.seed_id),
                &dhw.id,
                building.water_heater_fuel(dhw),
                1.0,
                1.0,
            );
            entry.energy_factor = dhw.uniform_energy_factor.or(dhw.energy_factor);
            if dhw.is_combi() {
                entry.related_hvac = dhw.related_hvac_idref.clone();
            }
            systems.water_heating.push(entry);
        }

        systems
    }

    /// Sistema de calefacción (no de respaldo) por identificador de la descripción
    pub fn heating_by_native_id(&self, native_id: &str) -> Option<&SystemEntry> {
        self.heating
            .iter()
            .find(|e| e.native_id == native_id && e.dfhp != DfhpRole::Backup)
    }
}

/// Combustibles en orden de búsqueda: no eléctricos primero, electricidad al final
pub fn fuels_electricity_last() -> Vec<FuelType> {
    FuelType::iter()
        .filter(|f| !f.is_electricity())
        .chain(std::iter::once(FuelType::Electricity))
        .collect()
}

fn system_source(map: &OutputNameMap, entry: &SystemEntry, query: &SystemQuery) -> Source {
    match query {
        SystemQuery::Objects(names) => Source::objects(map.object_keys(&entry.map_id), names.clone()),
        SystemQuery::Ems(suffix) => Source::ems(map.ems_names(&entry.map_id, suffix)),
    }
}

fn per_system_defs<F: Fn(EndUseType) -> bool>(family: F) -> Vec<EndUseDef> {
    end_use_defs()
        .into_iter()
        .filter(|d| d.is_per_system() && family(d.end_use))
        .collect()
}

/// Lee los usos finales de un sistema y los asigna a su identificador
fn get_system_end_uses(
    ctx: &mut ReportContext,
    q: &QueryAdapter,
    map: &OutputNameMap,
    entry: &SystemEntry,
    defs: &[EndUseDef],
) -> Result<()> {
    let want_ts = ctx.options.system_end_use_timeseries();
    for def in defs {
        let query = match &def.query {
            EndUseQuery::PerSystem(query) => query,
            _ => continue,
        };
        let src = system_source(map, entry, query);
        let annual = q.annual_sum(&src)?;
        let ts = if want_ts {
            energy_series(q, &src, annual, def.timeseries_units)?
        } else {
            Vec::new()
        };
        if let Some(metric) = ctx.end_uses.get_mut(&(def.fuel, def.end_use)) {
            metric.add_to_system(&entry.id, annual, &ts);
        }
    }
    Ok(())
}

/// Escala los usos finales de un sistema por 1/DSE; el combustible absorbe la diferencia
fn apply_dse(ctx: &mut ReportContext, entry: &SystemEntry, defs: &[EndUseDef]) {
    if entry.dse == 1.0 || entry.dse <= 0.0 {
        return;
    }
    debug!("Applying DSE {} to {}", entry.dse, entry.id);
    for def in defs {
        let delta = match ctx.end_uses.get_mut(&(def.fuel, def.end_use)) {
            Some(metric) => metric.scale_system(&entry.id, 1.0 / entry.dse),
            None => continue,
        };
        if let Some(fuel) = ctx.fuels.get_mut(&def.fuel) {
            fuel.absorb(&delta);
        }
    }
}

/// Reparte una demanda total entre un sistema según una fracción
fn split_load(ctx: &mut ReportContext, load_type: LoadType, sys: &SystemId, frac: f64) {
    if let Some(load) = ctx.loads.get_mut(&load_type) {
        let annual = load.annual() * frac;
        let ts = veckmul(&load.timeseries_output, frac);
        load.add_to_system(sys, annual, &ts);
    }
}

/// Fracción de la demanda de calefacción de un elemento de bomba de calor bivalente
///
/// Share `own / (primary + backup)` of the EMS dual-fuel loads. Without dual-fuel
/// loads the primary element serves the whole load and the backup none.
fn dfhp_share(q: &QueryAdapter, map: &OutputNameMap, entry: &SystemEntry) -> Result<f64> {
    let primary_id = entry.map_id.dfhp_primary();
    let backup_id = primary_id.dfhp_backup();
    let primary = q.annual_sum(&Source::ems(map.ems_names(&primary_id, EMS_DFHP_LOAD)))?;
    let backup = q.annual_sum(&Source::ems(map.ems_names(&backup_id, EMS_DFHP_LOAD)))?;
    let total = primary + backup;
    Ok(match entry.dfhp {
        DfhpRole::Backup if total == 0.0 => 0.0,
        DfhpRole::Backup => backup / total,
        _ if total == 0.0 => 1.0,
        _ => primary / total,
    })
}

/// Sistemas de calefacción: usos finales, reparto de demanda y DSE
pub fn heating_systems(ctx: &mut ReportContext, q: &QueryAdapter, map: &OutputNameMap) -> Result<()> {
    let defs = per_system_defs(EndUseType::is_heating);
    let entries = ctx.systems.heating.clone();
    for entry in &entries {
        get_system_end_uses(ctx, q, map, entry, &defs)?;

        let mut frac = entry.fraction_load_served;
        if entry.dfhp != DfhpRole::None {
            let share = dfhp_share(q, map, entry)?;
            debug!("Dual-fuel heat pump load share of {}: {:.4}", entry.id, share);
            frac *= share;
        }
        split_load(ctx, LoadType::Heating, &entry.id, frac);

        apply_dse(ctx, entry, &defs);
    }
    Ok(())
}

/// Sistemas de refrigeración: usos finales, reparto de demanda y DSE
pub fn cooling_systems(ctx: &mut ReportContext, q: &QueryAdapter, map: &OutputNameMap) -> Result<()> {
    let defs = per_system_defs(EndUseType::is_cooling);
    let entries = ctx.systems.cooling.clone();
    for entry in &entries {
        get_system_end_uses(ctx, q, map, entry, &defs)?;
        split_load(ctx, LoadType::Cooling, &entry.id, entry.fraction_load_served);
        apply_dse(ctx, entry, &defs);
    }
    Ok(())
}

/// Sistemas de ACS: usos finales, demandas, sistemas combinados y ajustes de energía
pub fn water_heating_systems(
    ctx: &mut ReportContext,
    q: &QueryAdapter,
    map: &OutputNameMap,
) -> Result<()> {
    let defs = per_system_defs(EndUseType::is_hot_water);
    let want_load_ts = ctx.options.include_timeseries_total_loads;
    let entries = ctx.systems.water_heating.clone();
    for entry in &entries {
        get_system_end_uses(ctx, q, map, entry, &defs)?;

        for def in load_defs() {
            let names = match def.query {
                LoadQuery::PerSystem(names) => names,
                _ => continue,
            };
            let src = Source::objects(map.object_keys(&entry.map_id), names);
            let annual = q.annual_sum(&src)?;
            let ts = if want_load_ts {
                energy_series(q, &src, annual, def.timeseries_units)?
            } else {
                Vec::new()
            };
            if let Some(load) = ctx.loads.get_mut(&def.load_type) {
                load.add_to_system(&entry.id, annual, &ts);
            }
        }

        if let Some(hvac_id) = &entry.related_hvac {
            let hvac = ctx.systems.heating_by_native_id(hvac_id).cloned();
            if let Some(hvac) = hvac {
                apply_combi(ctx, q, map, entry, &hvac)?;
            }
        }

        apply_ec_adj(ctx, q, map, entry)?;
    }
    Ok(())
}

/// Traslada la energía de ACS de un sistema combinado desde calefacción a ACS
///
/// The transferred share is the heat exchanger load over the boiler load.
/// Only the first fuel (electricity last) with heating use is adjusted.
fn apply_combi(
    ctx: &mut ReportContext,
    q: &QueryAdapter,
    map: &OutputNameMap,
    dhw: &SystemEntry,
    hvac: &SystemEntry,
) -> Result<()> {
    let hx_load = q.annual_sum(&Source::objects(
        map.object_keys(&dhw.map_id),
        vec![COMBI_HX_VARIABLE.to_string()],
    ))?;
    let boiler_load = q.annual_sum(&Source::objects(
        map.object_keys(&hvac.map_id),
        vec![BOILER_LOAD_VARIABLE.to_string()],
    ))?;
    let frac = if boiler_load > 0.0 {
        (hx_load / boiler_load).max(0.0).min(1.0)
    } else {
        0.0
    };

    for fuel in fuels_electricity_last() {
        let heating_key = (fuel, EndUseType::Heating);
        let (heating, heating_ts) = match ctx.end_uses.get(&heating_key) {
            Some(m) => (
                m.system_annual(&hvac.id),
                m.timeseries_output_by_system
                    .get(&hvac.id)
                    .cloned()
                    .unwrap_or_default(),
            ),
            None => continue,
        };
        if heating <= 0.0 {
            continue;
        }
        let moved = heating * frac;
        let moved_ts = veckmul(&heating_ts, frac);
        debug!(
            "Combi system {}: moving {:.3} MBtu of {} heating to hot water",
            dhw.id,
            moved,
            fuel.name()
        );
        if let Some(m) = ctx.end_uses.get_mut(&heating_key) {
            m.add_to_system(&hvac.id, -moved, &veckmul(&moved_ts, -1.0));
        }
        if let Some(m) = ctx.end_uses.get_mut(&(fuel, EndUseType::HotWater)) {
            m.add_to_system(&dhw.id, moved, &moved_ts);
        }
        break;
    }
    Ok(())
}

/// Ajuste de energía del calentador (variable EMS `_ec_adj`)
///
/// Added to the hot water use of the first fuel (electricity last) with positive
/// use and to that fuel total.
fn apply_ec_adj(
    ctx: &mut ReportContext,
    q: &QueryAdapter,
    map: &OutputNameMap,
    dhw: &SystemEntry,
) -> Result<()> {
    let src = Source::ems(map.ems_names(&dhw.map_id, EMS_EC_ADJ));
    let ec_adj = q.annual_sum(&src)?;
    let want_ts = ctx.options.system_end_use_timeseries();

    for fuel in fuels_electricity_last() {
        let key = (fuel, EndUseType::HotWater);
        let hot_water = ctx.end_uses.get(&key).map_or(0.0, |m| m.system_annual(&dhw.id));
        if hot_water <= 0.0 {
            continue;
        }
        if ec_adj == 0.0 {
            break;
        }
        let ts = if want_ts {
            q.energy_timeseries(&src, fuel_timeseries_units(fuel))?
        } else {
            Vec::new()
        };
        debug!("Water heater {}: energy adjustment {:.3} MBtu", dhw.id, ec_adj);
        if let Some(m) = ctx.end_uses.get_mut(&key) {
            m.add_to_system(&dhw.id, ec_adj, &ts);
        }
        if let Some(m) = ctx.fuels.get_mut(&fuel) {
            m.absorb(&SystemDelta {
                annual: ec_adj,
                timeseries: ts,
            });
        }
        break;
    }
    Ok(())
}

/// Corrección por fracción solar de la demanda de ACS entregada
///
/// The delivered load of each system with a connected solar fraction `sf` is
/// scaled by `1/(1-sf)` and the solar thermal load absorbs the difference.
pub fn solar_fraction(ctx: &mut ReportContext, building: &BuildingDescription) {
    let entries = ctx.systems.water_heating.clone();
    for entry in &entries {
        let sf = building
            .solar_thermal_for(&entry.native_id)
            .and_then(|s| s.solar_fraction)
            .unwrap_or(0.0);
        if sf <= 0.0 || sf >= 1.0 {
            continue;
        }
        let delta = match ctx.loads.get_mut(&LoadType::HotWaterDelivered) {
            Some(load) => load.scale_system(&entry.id, 1.0 / (1.0 - sf)),
            None => continue,
        };
        if let Some(solar) = ctx.loads.get_mut(&LoadType::HotWaterSolarThermal) {
            solar.absorb(&delta);
        }
    }
}
