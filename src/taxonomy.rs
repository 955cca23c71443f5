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
Taxonomía de resultados
=======================

Static definitions of fuels, end uses, loads, unmet loads, peaks and component
loads: display names, units and where each one is read from in the EnergyPlus
results (meters, output variables keyed by system objects, EMS output variables
or tabular reports).
*/

use strum::IntoEnumIterator;

use crate::error::{ReportError, Result};
use crate::types::{
    ComponentLoadType, EndUseType, FuelType, HvacMode, LoadType, PeakFuelType, PeakLoadType,
    UnmetLoadType,
};
use crate::units::Unit;

/// Clave de las variables de salida EMS
pub const EMS_KEY: &str = "EMS";

/// Sufijo de las variables EMS de ventiladores y bombas de calefacción
pub const EMS_HTG_FAN_PUMP: &str = "_htg_fan_pump";
/// Sufijo de las variables EMS de ventiladores y bombas de refrigeración
pub const EMS_CLG_FAN_PUMP: &str = "_clg_fan_pump";
/// Sufijo de las variables EMS de demanda de bombas de calor bivalentes
pub const EMS_DFHP_LOAD: &str = "_dfhp_load";
/// Sufijo de las variables EMS de ajuste del consumo de los calentadores
pub const EMS_EC_ADJ: &str = "_ec_adj";

/// Sufijos que identifican variables EMS en el mapa de salidas
pub const EMS_SUFFIXES: [&str; 4] = [EMS_HTG_FAN_PUMP, EMS_CLG_FAN_PUMP, EMS_DFHP_LOAD, EMS_EC_ADJ];

/// Variable de transferencia del intercambiador de sistemas combinados
pub const COMBI_HX_VARIABLE: &str = "Fluid Heat Exchanger Heat Transfer Energy";
/// Variable de energía entregada por la caldera
pub const BOILER_LOAD_VARIABLE: &str = "Boiler Heating Energy";
/// Variable de temperatura media de zona
pub const ZONE_TEMP_VARIABLE: &str = "Zone Mean Air Temperature";

const TABULAR_TABLE: &str = "Custom Monthly Report";
const TABULAR_ROW: &str = "Maximum of Months";

/// Unidades de los valores anuales de energía
pub const ANNUAL_UNITS: Unit = Unit::MBtu;

/// Unidades de las series temporales de un combustible
///
/// Electricity timeseries are reported in kWh, other fuels in kBtu
pub fn fuel_timeseries_units(fuel: FuelType) -> Unit {
    if fuel.is_electricity() {
        Unit::KWh
    } else {
        Unit::KBtu
    }
}

/// Nombre del total de un combustible
pub fn fuel_name(fuel: FuelType) -> String {
    format!("{}: Total", fuel.name())
}

// ------------------------------- End uses -----------------------------------

/// Origen de los datos de un uso final asignado a sistemas
///
/// Per-system source of an end use
#[derive(Debug, Clone, PartialEq)]
pub enum SystemQuery {
    /// Output variables keyed by the system's EnergyPlus objects
    Objects(Vec<String>),
    /// EMS output variables of the system ending with this suffix
    Ems(&'static str),
}

/// Origen de los datos de un uso final
#[derive(Debug, Clone, PartialEq)]
pub enum EndUseQuery {
    /// Meter
    Meter(String),
    /// Per-system values
    PerSystem(SystemQuery),
    /// Output variables keyed by the solar thermal systems' objects
    SolarThermal(Vec<String>),
}

/// Definición de un uso final
///
/// End use descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct EndUseDef {
    /// Combustible
    pub fuel: FuelType,
    /// Uso final
    pub end_use: EndUseType,
    /// Origen de los datos
    pub query: EndUseQuery,
    /// Unidades anuales
    pub annual_units: Unit,
    /// Unidades de la serie temporal
    pub timeseries_units: Unit,
}

impl EndUseDef {
    fn new(fuel: FuelType, end_use: EndUseType, query: EndUseQuery) -> Self {
        EndUseDef {
            fuel,
            end_use,
            query,
            annual_units: ANNUAL_UNITS,
            timeseries_units: fuel_timeseries_units(fuel),
        }
    }

    /// Nombre del uso final, p.e. "Electricity: Heating"
    pub fn name(&self) -> String {
        end_use_name(self.fuel, self.end_use)
    }

    /// ¿Se asigna a sistemas?
    pub fn is_per_system(&self) -> bool {
        match self.query {
            EndUseQuery::PerSystem(_) => true,
            _ => false,
        }
    }
}

/// Nombre de un uso final, p.e. "Natural Gas: Hot Water"
pub fn end_use_name(fuel: FuelType, end_use: EndUseType) -> String {
    format!("{}: {}", fuel.name(), end_use.name())
}

fn objects(names: &[&str]) -> EndUseQuery {
    EndUseQuery::PerSystem(SystemQuery::Objects(
        names.iter().map(|n| n.to_string()).collect(),
    ))
}

fn subcategory_meter(subcategory: &str, fuel: FuelType) -> EndUseQuery {
    EndUseQuery::Meter(format!(
        "{}:InteriorEquipment:{}",
        subcategory,
        fuel.eplus_token()
    ))
}

fn heating_variables(fuel: FuelType) -> EndUseQuery {
    if fuel.is_electricity() {
        objects(&[
            "Heating Coil Electricity Energy",
            "Heating Coil Crankcase Heater Electricity Energy",
            "Heating Coil Defrost Electricity Energy",
            "Boiler Electricity Energy",
            "Baseboard Electricity Energy",
        ])
    } else {
        let t = fuel.eplus_token();
        EndUseQuery::PerSystem(SystemQuery::Objects(vec![
            format!("Heating Coil {} Energy", t),
            format!("Boiler {} Energy", t),
        ]))
    }
}

fn hot_water_variables(fuel: FuelType) -> EndUseQuery {
    let t = fuel.eplus_token();
    let mut names = vec![
        format!("Water Heater {} Energy", t),
        format!("Water Heater Off Cycle Parasitic {} Energy", t),
        format!("Water Heater On Cycle Parasitic {} Energy", t),
    ];
    if fuel.is_electricity() {
        names.push("Cooling Coil Water Heating Electricity Energy".to_string());
    }
    EndUseQuery::PerSystem(SystemQuery::Objects(names))
}

/// Definiciones de todos los usos finales, por combustible y en orden de informe
///
/// All end use descriptors, grouped by fuel in report order
pub fn end_use_defs() -> Vec<EndUseDef> {
    use EndUseType::*;
    use FuelType::*;

    let el = Electricity;
    let mut defs = vec![
        EndUseDef::new(el, Heating, heating_variables(el)),
        EndUseDef::new(
            el,
            HeatingFansPumps,
            EndUseQuery::PerSystem(SystemQuery::Ems(EMS_HTG_FAN_PUMP)),
        ),
        EndUseDef::new(
            el,
            Cooling,
            objects(&[
                "Cooling Coil Electricity Energy",
                "Cooling Coil Crankcase Heater Electricity Energy",
                "Evaporative Cooler Electricity Energy",
            ]),
        ),
        EndUseDef::new(
            el,
            CoolingFansPumps,
            EndUseQuery::PerSystem(SystemQuery::Ems(EMS_CLG_FAN_PUMP)),
        ),
        EndUseDef::new(el, HotWater, hot_water_variables(el)),
        EndUseDef::new(el, HotWaterRecircPump, objects(&["Pump Electricity Energy"])),
        EndUseDef::new(
            el,
            HotWaterSolarThermalPump,
            EndUseQuery::SolarThermal(vec!["Pump Electricity Energy".to_string()]),
        ),
        EndUseDef::new(
            el,
            LightingInterior,
            EndUseQuery::Meter("LightingInterior:InteriorLights:Electricity".into()),
        ),
        EndUseDef::new(
            el,
            LightingGarage,
            EndUseQuery::Meter("LightingGarage:InteriorLights:Electricity".into()),
        ),
        EndUseDef::new(
            el,
            LightingExterior,
            EndUseQuery::Meter("ExteriorLights:Electricity".into()),
        ),
        EndUseDef::new(el, MechVent, subcategory_meter("MechVent", el)),
        EndUseDef::new(el, WholeHouseFan, subcategory_meter("WholeHouseFan", el)),
        EndUseDef::new(el, Refrigerator, subcategory_meter("Refrigerator", el)),
        EndUseDef::new(el, Freezer, subcategory_meter("Freezer", el)),
        EndUseDef::new(el, Dehumidifier, subcategory_meter("Dehumidifier", el)),
        EndUseDef::new(el, Dishwasher, subcategory_meter("Dishwasher", el)),
        EndUseDef::new(el, ClothesWasher, subcategory_meter("ClothesWasher", el)),
        EndUseDef::new(el, ClothesDryer, subcategory_meter("ClothesDryer", el)),
        EndUseDef::new(el, RangeOven, subcategory_meter("CookingRange", el)),
        EndUseDef::new(el, CeilingFan, subcategory_meter("CeilingFan", el)),
        EndUseDef::new(el, Television, subcategory_meter("Television", el)),
        EndUseDef::new(el, PlugLoads, subcategory_meter("PlugLoads", el)),
        EndUseDef::new(
            el,
            PV,
            EndUseQuery::Meter("Photovoltaic:ElectricityProduced".into()),
        ),
    ];

    for fuel in FuelType::iter().filter(|f| !f.is_electricity()) {
        defs.push(EndUseDef::new(fuel, Heating, heating_variables(fuel)));
        defs.push(EndUseDef::new(fuel, HotWater, hot_water_variables(fuel)));
        if fuel != Coal {
            defs.push(EndUseDef::new(
                fuel,
                ClothesDryer,
                subcategory_meter("ClothesDryer", fuel),
            ));
            defs.push(EndUseDef::new(
                fuel,
                RangeOven,
                subcategory_meter("CookingRange", fuel),
            ));
        }
    }
    defs
}

/// Definición de un uso final
///
/// Descriptor of a (fuel, end use) pair. Pairs outside the taxonomy are a configuration error.
pub fn end_use_def(fuel: FuelType, end_use: EndUseType) -> Result<EndUseDef> {
    end_use_defs()
        .into_iter()
        .find(|d| d.fuel == fuel && d.end_use == end_use)
        .ok_or_else(|| {
            ReportError::Config(format!(
                "unknown end use \"{}\"",
                end_use_name(fuel, end_use)
            ))
        })
}

// --------------------------------- Loads ------------------------------------

/// Origen de los datos de una demanda
#[derive(Debug, Clone, PartialEq)]
pub enum LoadQuery {
    /// Building total from an EMS output variable
    Ems(String),
    /// Output variables keyed by each water heating system's objects
    PerSystem(Vec<String>),
    /// Output variables keyed by the solar thermal systems' objects
    SolarThermal(Vec<String>),
}

/// Definición de una demanda
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDef {
    /// Tipo de demanda
    pub load_type: LoadType,
    /// Origen de los datos
    pub query: LoadQuery,
    /// Unidades anuales
    pub annual_units: Unit,
    /// Unidades de la serie temporal
    pub timeseries_units: Unit,
}

impl LoadDef {
    fn new(load_type: LoadType, query: LoadQuery) -> Self {
        LoadDef {
            load_type,
            query,
            annual_units: ANNUAL_UNITS,
            timeseries_units: Unit::KBtu,
        }
    }

    /// Nombre, p.e. "Load: Hot Water: Delivered"
    pub fn name(&self) -> String {
        load_name(self.load_type)
    }
}

/// Nombre de una demanda
pub fn load_name(load_type: LoadType) -> String {
    format!("Load: {}", load_type.name())
}

/// Definiciones de todas las demandas
pub fn load_defs() -> Vec<LoadDef> {
    let vars = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
    vec![
        LoadDef::new(LoadType::Heating, LoadQuery::Ems("loads_htg_tot".into())),
        LoadDef::new(LoadType::Cooling, LoadQuery::Ems("loads_clg_tot".into())),
        LoadDef::new(
            LoadType::HotWaterDelivered,
            LoadQuery::PerSystem(vars(&["Water Use Connections Plant Hot Water Energy"])),
        ),
        LoadDef::new(
            LoadType::HotWaterTankLosses,
            LoadQuery::PerSystem(vars(&["Water Heater Heat Loss Energy"])),
        ),
        LoadDef::new(
            LoadType::HotWaterDesuperheater,
            LoadQuery::PerSystem(vars(&["Water Heater Desuperheater Heating Energy"])),
        ),
        LoadDef::new(
            LoadType::HotWaterSolarThermal,
            LoadQuery::SolarThermal(vars(&["Solar Collector Heat Transfer Energy"])),
        ),
    ]
}

// ------------------------------ Unmet loads ---------------------------------

/// Nombre de una demanda no atendida
pub fn unmet_load_name(unmet: UnmetLoadType) -> String {
    format!("Unmet Load: {}", unmet.name())
}

/// Variable de salida de una demanda no atendida (cualquier clave)
pub fn unmet_load_variable(unmet: UnmetLoadType) -> &'static str {
    match unmet {
        UnmetLoadType::Heating => "Zone Ideal Loads Zone Sensible Heating Energy",
        UnmetLoadType::Cooling => "Zone Ideal Loads Zone Sensible Cooling Energy",
    }
}

// --------------------------------- Peaks ------------------------------------

/// Referencia a un valor de los informes tabulares
///
/// Lookup of a value in TabularDataWithStrings
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRef {
    /// ReportName
    pub report: String,
    /// ReportForString
    pub report_for: String,
    /// TableName
    pub table: String,
    /// RowName
    pub row: String,
    /// ColumnName
    pub column: String,
    /// Units
    pub units: String,
}

/// Nombre de una potencia punta de combustible, p.e. "Peak Electricity: Winter Total"
pub fn peak_fuel_name(fuel: FuelType, season: PeakFuelType) -> String {
    format!("Peak {}: {} Total", fuel.name(), season.name())
}

/// Potencias punta de combustible disponibles
pub fn peak_fuel_keys() -> Vec<(FuelType, PeakFuelType)> {
    PeakFuelType::iter()
        .map(|season| (FuelType::Electricity, season))
        .collect()
}

/// Origen tabular de una potencia punta de combustible (W)
pub fn peak_fuel_tabular(fuel: FuelType, season: PeakFuelType) -> Result<TabularRef> {
    if !fuel.is_electricity() {
        return Err(ReportError::Config(format!(
            "unknown peak fuel \"{}\"",
            peak_fuel_name(fuel, season)
        )));
    }
    Ok(TabularRef {
        report: format!(
            "PEAK {} {} TOTAL",
            fuel.name().to_uppercase(),
            season.name().to_uppercase()
        ),
        report_for: "Meter".into(),
        table: TABULAR_TABLE.into(),
        row: TABULAR_ROW.into(),
        column: format!(
            "{} {{MAX FOR HOURS SHOWN",
            fuel.facility_meter().to_uppercase()
        ),
        units: "W".into(),
    })
}

/// Nombre de una demanda punta
pub fn peak_load_name(peak: PeakLoadType) -> String {
    format!("Peak Load: {}", peak.name())
}

/// Origen tabular de una demanda punta (W, valor horario)
pub fn peak_load_tabular(peak: PeakLoadType) -> TabularRef {
    let (report, var) = match peak {
        PeakLoadType::Heating => ("PEAK HEATING LOAD", "LOADS_HTG_TOT"),
        PeakLoadType::Cooling => ("PEAK COOLING LOAD", "LOADS_CLG_TOT"),
    };
    TabularRef {
        report: report.into(),
        report_for: EMS_KEY.into(),
        table: TABULAR_TABLE.into(),
        row: TABULAR_ROW.into(),
        column: format!("{} {{MAXIMUM}}", var),
        units: "W".into(),
    }
}

// ---------------------------- Component loads -------------------------------

/// Nombre de una demanda por componente, p.e. "Component Load: Heating: Roofs"
pub fn component_load_name(mode: HvacMode, component: ComponentLoadType) -> String {
    format!("Component Load: {}: {}", mode.name(), component.name())
}

/// Variable EMS de una demanda por componente, p.e. "loads_htg_roofs"
pub fn component_load_variable(mode: HvacMode, component: ComponentLoadType) -> String {
    format!("loads_{}_{}", mode.ems_tag(), component.ems_tag())
}

// ---------------------------- Zone temperatures -----------------------------

/// Nombre de la temperatura de una zona a partir de la clave de EnergyPlus
///
/// "LIVING SPACE" -> "Temperature: Living Space"
pub fn zone_temp_name(key: &str) -> String {
    let title = key
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("Temperature: {}", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_end_uses() {
        let defs = end_use_defs();
        assert_eq!(defs[0].name(), "Electricity: Heating");
        assert!(defs[0].is_per_system());
        let pv = end_use_def(FuelType::Electricity, EndUseType::PV).unwrap();
        assert_eq!(
            pv.query,
            EndUseQuery::Meter("Photovoltaic:ElectricityProduced".into())
        );
        assert_eq!(pv.timeseries_units, Unit::KWh);
        let gas = end_use_def(FuelType::NaturalGas, EndUseType::Heating).unwrap();
        assert_eq!(gas.timeseries_units, Unit::KBtu);
        assert_eq!(
            gas.query,
            EndUseQuery::PerSystem(SystemQuery::Objects(vec![
                "Heating Coil NaturalGas Energy".into(),
                "Boiler NaturalGas Energy".into()
            ]))
        );
    }

    #[test]
    fn taxonomy_unknown_key() {
        match end_use_def(FuelType::Coal, EndUseType::Cooling) {
            Err(ReportError::Config(msg)) => assert!(msg.contains("Coal: Cooling")),
            _ => panic!("coal cooling is not part of the taxonomy"),
        }
        assert!(peak_fuel_tabular(FuelType::Propane, PeakFuelType::Winter).is_err());
    }

    #[test]
    fn taxonomy_names() {
        assert_eq!(load_name(LoadType::HotWaterDelivered), "Load: Hot Water: Delivered");
        assert_eq!(
            peak_fuel_name(FuelType::Electricity, PeakFuelType::Summer),
            "Peak Electricity: Summer Total"
        );
        assert_eq!(
            component_load_name(HvacMode::Cooling, ComponentLoadType::InternalGains),
            "Component Load: Cooling: Internal Gains"
        );
        assert_eq!(
            component_load_variable(HvacMode::Heating, ComponentLoadType::Infiltration),
            "loads_htg_infil"
        );
        assert_eq!(zone_temp_name("LIVING SPACE"), "Temperature: Living Space");
    }

    #[test]
    fn taxonomy_peak_fuel_lookup() {
        let t = peak_fuel_tabular(FuelType::Electricity, PeakFuelType::Winter).unwrap();
        assert_eq!(t.report, "PEAK ELECTRICITY WINTER TOTAL");
        assert_eq!(t.column, "ELECTRICITY:FACILITY {MAX FOR HOURS SHOWN");
    }
}
