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
Descripción del edificio (HPXML)
================================

Read only subset of an HPXML building description needed to apportion results
among systems: HVAC plant, distribution efficiencies, water heating and solar
thermal systems, plus a few building summary values.

Elements are matched by local name, so any HPXML namespace prefix is accepted.
Schema validation is left to other tools.
*/

use std::str;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::types::FuelType;

/// Eficiencia declarada (unidades y valor)
///
/// Rated efficiency, e.g. AFUE 0.8, HSPF 8.2, SEER 13, EF 0.62
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Efficiency {
    /// Unidades
    pub units: String,
    /// Valor
    pub value: f64,
}

/// Sistema de calefacción
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingSystem {
    /// Identificador
    pub id: String,
    /// Identificador del edificio semilla (ERI)
    pub seed_id: Option<String>,
    /// Sistema de distribución
    pub distribution_idref: Option<String>,
    /// Tipo de sistema (Furnace, Boiler, ...)
    pub system_type: String,
    /// Combustible
    pub fuel: FuelType,
    /// Eficiencia
    pub efficiency: Option<Efficiency>,
    /// Fracción de la demanda de calefacción atendida
    pub fraction_heat_load_served: f64,
}

/// Sistema de refrigeración
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingSystem {
    /// Identificador
    pub id: String,
    /// Identificador del edificio semilla (ERI)
    pub seed_id: Option<String>,
    /// Sistema de distribución
    pub distribution_idref: Option<String>,
    /// Tipo de sistema
    pub system_type: String,
    /// Eficiencia
    pub efficiency: Option<Efficiency>,
    /// Fracción de la demanda de refrigeración atendida
    pub fraction_cool_load_served: f64,
}

/// Bomba de calor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPump {
    /// Identificador
    pub id: String,
    /// Identificador del edificio semilla (ERI)
    pub seed_id: Option<String>,
    /// Sistema de distribución
    pub distribution_idref: Option<String>,
    /// Tipo de bomba de calor
    pub heat_pump_type: String,
    /// Combustible
    pub fuel: FuelType,
    /// Combustible del equipo de respaldo
    pub backup_fuel: Option<FuelType>,
    /// Temperatura de conmutación al equipo de respaldo
    pub backup_switchover_temperature: Option<f64>,
    /// Eficiencia en calefacción
    pub heating_efficiency: Option<Efficiency>,
    /// Eficiencia en refrigeración
    pub cooling_efficiency: Option<Efficiency>,
    /// Eficiencia del equipo de respaldo
    pub backup_efficiency: Option<Efficiency>,
    /// Fracción de la demanda de calefacción atendida
    pub fraction_heat_load_served: f64,
    /// Fracción de la demanda de refrigeración atendida
    pub fraction_cool_load_served: f64,
}

impl HeatPump {
    /// ¿Bomba de calor bivalente con respaldo de combustible?
    ///
    /// Dual-fuel heat pump: switchover temperature and a non electric backup
    pub fn is_dual_fuel(&self) -> bool {
        self.backup_switchover_temperature.is_some()
            && self.backup_fuel.map_or(false, |f| !f.is_electricity())
    }
}

/// Sistema de distribución de climatización
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacDistribution {
    /// Identificador
    pub id: String,
    /// Rendimiento de distribución en calefacción
    pub heating_dse: Option<f64>,
    /// Rendimiento de distribución en refrigeración
    pub cooling_dse: Option<f64>,
}

/// Sistema de ACS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterHeatingSystem {
    /// Identificador
    pub id: String,
    /// Identificador del edificio semilla (ERI)
    pub seed_id: Option<String>,
    /// Tipo de calentador
    pub water_heater_type: String,
    /// Combustible (los sistemas combinados usan el de la caldera)
    pub fuel: Option<FuelType>,
    /// Sistema de climatización asociado (sistemas combinados)
    pub related_hvac_idref: Option<String>,
    /// Factor de energía
    pub energy_factor: Option<f64>,
    /// Factor de energía uniforme
    pub uniform_energy_factor: Option<f64>,
}

impl WaterHeatingSystem {
    /// ¿Sistema combinado con la caldera de calefacción?
    pub fn is_combi(&self) -> bool {
        self.water_heater_type == "space-heating boiler with storage tank"
            || self.water_heater_type == "space-heating boiler with tankless coil"
    }
}

/// Sistema solar térmico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarThermalSystem {
    /// Identificador
    pub id: String,
    /// Sistema de ACS conectado
    pub connected_to: Option<String>,
    /// Fracción solar
    pub solar_fraction: Option<f64>,
}

/// Descripción del edificio
///
/// Building description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingDescription {
    /// Variante del cálculo ERI (p.e. "ERI Reference Home")
    pub eri_design: Option<String>,
    /// Superficie acondicionada [ft2]
    pub conditioned_floor_area: f64,
    /// Número de dormitorios
    pub number_of_bedrooms: f64,
    /// Número de plantas acondicionadas
    pub number_of_conditioned_floors: f64,
    /// Sistemas de calefacción
    pub heating_systems: Vec<HeatingSystem>,
    /// Sistemas de refrigeración
    pub cooling_systems: Vec<CoolingSystem>,
    /// Bombas de calor
    pub heat_pumps: Vec<HeatPump>,
    /// Sistemas de distribución
    pub hvac_distributions: Vec<HvacDistribution>,
    /// Sistemas de ACS
    pub water_heating_systems: Vec<WaterHeatingSystem>,
    /// Sistemas solares térmicos
    pub solar_thermal_systems: Vec<SolarThermalSystem>,
}

impl BuildingDescription {
    /// Sistema de distribución por identificador
    pub fn distribution(&self, id: &str) -> Option<&HvacDistribution> {
        self.hvac_distributions.iter().find(|d| d.id == id)
    }

    /// Sistema de calefacción por identificador
    pub fn heating_system(&self, id: &str) -> Option<&HeatingSystem> {
        self.heating_systems.iter().find(|s| s.id == id)
    }

    /// Sistema solar térmico conectado a un sistema de ACS
    pub fn solar_thermal_for(&self, dhw_id: &str) -> Option<&SolarThermalSystem> {
        self.solar_thermal_systems
            .iter()
            .find(|s| s.connected_to.as_ref().map(String::as_str) == Some(dhw_id))
    }

    /// Combustible de un sistema de ACS (el de la caldera en sistemas combinados)
    pub fn water_heater_fuel(&self, dhw: &WaterHeatingSystem) -> Option<FuelType> {
        dhw.fuel.or_else(|| {
            dhw.related_hvac_idref
                .as_ref()
                .and_then(|idref| self.heating_system(idref))
                .map(|hs| hs.fuel)
        })
    }
}

// ----------------------------- XML helpers ----------------------------------

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'i: 'a>(node: Node<'a, 'i>, name: &'a str) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn at<'a, 'i>(node: Node<'a, 'i>, path: &[&str]) -> Option<Node<'a, 'i>> {
    path.iter().try_fold(node, |n, name| child(n, name))
}

fn text(node: Node<'_, '_>, path: &[&str]) -> Option<String> {
    at(node, path)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn number(node: Node<'_, '_>, path: &[&str]) -> Result<Option<f64>> {
    match text(node, path) {
        Some(t) => t
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ReportError::WrongInput(format!("{} is not a number: \"{}\"", path.join("/"), t))),
        None => Ok(None),
    }
}

fn system_id(node: Node<'_, '_>) -> Result<String> {
    child(node, "SystemIdentifier")
        .and_then(|n| n.attribute("id"))
        .map(str::to_string)
        .ok_or_else(|| {
            ReportError::WrongInput(format!(
                "{} without SystemIdentifier",
                node.tag_name().name()
            ))
        })
}

fn idref(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.attribute("idref"))
        .map(str::to_string)
}

fn first_child_name(node: Node<'_, '_>, name: &str) -> String {
    child(node, name)
        .and_then(|n| n.children().find(|c| c.is_element()))
        .map(|c| c.tag_name().name().to_string())
        .unwrap_or_default()
}

fn efficiency(node: Node<'_, '_>, name: &str) -> Result<Option<Efficiency>> {
    for eff in children(node, name) {
        if let (Some(units), Some(value)) = (text(eff, &["Units"]), number(eff, &["Value"])?) {
            return Ok(Some(Efficiency { units, value }));
        }
    }
    Ok(None)
}

fn fuel(node: Node<'_, '_>, name: &str) -> Result<Option<FuelType>> {
    text(node, &[name]).map(|f| FuelType::from_hpxml(&f)).transpose()
}

// ------------------------------- Parsing ------------------------------------

fn parse_heating_system(node: Node<'_, '_>) -> Result<HeatingSystem> {
    let id = system_id(node)?;
    Ok(HeatingSystem {
        seed_id: text(node, &["extension", "SeedId"]),
        distribution_idref: idref(node, "DistributionSystem"),
        system_type: first_child_name(node, "HeatingSystemType"),
        fuel: fuel(node, "HeatingSystemFuel")?.ok_or_else(|| {
            ReportError::WrongInput(format!("HeatingSystem {} without fuel", id))
        })?,
        efficiency: efficiency(node, "AnnualHeatingEfficiency")?,
        fraction_heat_load_served: number(node, &["FractionHeatLoadServed"])?.unwrap_or(1.0),
        id,
    })
}

fn parse_cooling_system(node: Node<'_, '_>) -> Result<CoolingSystem> {
    Ok(CoolingSystem {
        id: system_id(node)?,
        seed_id: text(node, &["extension", "SeedId"]),
        distribution_idref: idref(node, "DistributionSystem"),
        system_type: text(node, &["CoolingSystemType"]).unwrap_or_default(),
        efficiency: efficiency(node, "AnnualCoolingEfficiency")?,
        fraction_cool_load_served: number(node, &["FractionCoolLoadServed"])?.unwrap_or(1.0),
    })
}

fn parse_heat_pump(node: Node<'_, '_>) -> Result<HeatPump> {
    Ok(HeatPump {
        id: system_id(node)?,
        seed_id: text(node, &["extension", "SeedId"]),
        distribution_idref: idref(node, "DistributionSystem"),
        heat_pump_type: text(node, &["HeatPumpType"]).unwrap_or_default(),
        fuel: fuel(node, "HeatPumpFuel")?.unwrap_or(FuelType::Electricity),
        backup_fuel: fuel(node, "BackupSystemFuel")?,
        backup_switchover_temperature: number(node, &["BackupHeatingSwitchoverTemperature"])?,
        heating_efficiency: efficiency(node, "AnnualHeatingEfficiency")?,
        cooling_efficiency: efficiency(node, "AnnualCoolingEfficiency")?,
        backup_efficiency: efficiency(node, "BackupAnnualHeatingEfficiency")?,
        fraction_heat_load_served: number(node, &["FractionHeatLoadServed"])?.unwrap_or(1.0),
        fraction_cool_load_served: number(node, &["FractionCoolLoadServed"])?.unwrap_or(1.0),
    })
}

fn parse_distribution(node: Node<'_, '_>) -> Result<HvacDistribution> {
    Ok(HvacDistribution {
        id: system_id(node)?,
        heating_dse: number(node, &["AnnualHeatingDistributionSystemEfficiency"])?,
        cooling_dse: number(node, &["AnnualCoolingDistributionSystemEfficiency"])?,
    })
}

fn parse_water_heater(node: Node<'_, '_>) -> Result<WaterHeatingSystem> {
    Ok(WaterHeatingSystem {
        id: system_id(node)?,
        seed_id: text(node, &["extension", "SeedId"]),
        water_heater_type: text(node, &["WaterHeaterType"]).unwrap_or_default(),
        fuel: fuel(node, "FuelType")?,
        related_hvac_idref: idref(node, "RelatedHVACSystem"),
        energy_factor: number(node, &["EnergyFactor"])?,
        uniform_energy_factor: number(node, &["UniformEnergyFactor"])?,
    })
}

fn parse_solar_thermal(node: Node<'_, '_>) -> Result<SolarThermalSystem> {
    let id = system_id(node)?;
    let solar_fraction = number(node, &["SolarFraction"])?;
    if let Some(sf) = solar_fraction {
        if !(0.0..1.0).contains(&sf) {
            return Err(ReportError::WrongInput(format!(
                "SolarFraction of {} must be in [0, 1) and is {}",
                id, sf
            )));
        }
    }
    Ok(SolarThermalSystem {
        connected_to: idref(node, "ConnectedTo"),
        solar_fraction,
        id,
    })
}

impl str::FromStr for BuildingDescription {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<BuildingDescription> {
        let doc = Document::parse(s)?;
        let root = doc.root_element();
        let details = root
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "BuildingDetails")
            .ok_or_else(|| ReportError::WrongInput("HPXML without BuildingDetails".into()))?;

        let construction = at(details, &["BuildingSummary", "BuildingConstruction"]);
        let summary = |name: &str| -> Result<f64> {
            match construction {
                Some(c) => Ok(number(c, &[name])?.unwrap_or(0.0)),
                None => Ok(0.0),
            }
        };

        let mut bd = BuildingDescription {
            eri_design: text(root, &["SoftwareInfo", "extension", "ERICalculation", "Design"]),
            conditioned_floor_area: summary("ConditionedFloorArea")?,
            number_of_bedrooms: summary("NumberofBedrooms")?,
            number_of_conditioned_floors: summary("NumberofConditionedFloors")?,
            ..Default::default()
        };

        if let Some(plant) = at(details, &["Systems", "HVAC", "HVACPlant"]) {
            bd.heating_systems = children(plant, "HeatingSystem")
                .map(parse_heating_system)
                .collect::<Result<_>>()?;
            bd.cooling_systems = children(plant, "CoolingSystem")
                .map(parse_cooling_system)
                .collect::<Result<_>>()?;
            bd.heat_pumps = children(plant, "HeatPump")
                .map(parse_heat_pump)
                .collect::<Result<_>>()?;
        }
        if let Some(hvac) = at(details, &["Systems", "HVAC"]) {
            bd.hvac_distributions = children(hvac, "HVACDistribution")
                .map(parse_distribution)
                .collect::<Result<_>>()?;
        }
        if let Some(wh) = at(details, &["Systems", "WaterHeating"]) {
            bd.water_heating_systems = children(wh, "WaterHeatingSystem")
                .map(parse_water_heater)
                .collect::<Result<_>>()?;
        }
        if let Some(st) = at(details, &["Systems", "SolarThermal"]) {
            bd.solar_thermal_systems = children(st, "SolarThermalSystem")
                .map(parse_solar_thermal)
                .collect::<Result<_>>()?;
        }
        Ok(bd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HPXML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HPXML xmlns="http://hpxmlonline.com/2019/10" schemaVersion="3.0">
  <SoftwareInfo>
    <extension><ERICalculation><Design>ERI Reference Home</Design></ERICalculation></extension>
  </SoftwareInfo>
  <Building>
    <BuildingDetails>
      <BuildingSummary>
        <BuildingConstruction>
          <NumberofConditionedFloors>2</NumberofConditionedFloors>
          <NumberofBedrooms>3</NumberofBedrooms>
          <ConditionedFloorArea>2700.0</ConditionedFloorArea>
        </BuildingConstruction>
      </BuildingSummary>
      <Systems>
        <HVAC>
          <HVACPlant>
            <HeatingSystem>
              <SystemIdentifier id="Boiler"/>
              <HeatingSystemType><Boiler/></HeatingSystemType>
              <HeatingSystemFuel>natural gas</HeatingSystemFuel>
              <AnnualHeatingEfficiency><Units>AFUE</Units><Value>0.8</Value></AnnualHeatingEfficiency>
              <FractionHeatLoadServed>0.4</FractionHeatLoadServed>
              <extension><SeedId>SeedBoiler</SeedId></extension>
            </HeatingSystem>
            <HeatPump>
              <SystemIdentifier id="HeatPump"/>
              <DistributionSystem idref="HVACDistribution"/>
              <HeatPumpType>air-to-air</HeatPumpType>
              <HeatPumpFuel>electricity</HeatPumpFuel>
              <BackupSystemFuel>propane</BackupSystemFuel>
              <BackupAnnualHeatingEfficiency><Units>AFUE</Units><Value>0.95</Value></BackupAnnualHeatingEfficiency>
              <BackupHeatingSwitchoverTemperature>30.0</BackupHeatingSwitchoverTemperature>
              <FractionHeatLoadServed>0.6</FractionHeatLoadServed>
              <FractionCoolLoadServed>1.0</FractionCoolLoadServed>
              <AnnualCoolingEfficiency><Units>SEER</Units><Value>13.0</Value></AnnualCoolingEfficiency>
              <AnnualHeatingEfficiency><Units>HSPF</Units><Value>7.7</Value></AnnualHeatingEfficiency>
            </HeatPump>
          </HVACPlant>
          <HVACDistribution>
            <SystemIdentifier id="HVACDistribution"/>
            <AnnualHeatingDistributionSystemEfficiency>0.8</AnnualHeatingDistributionSystemEfficiency>
            <AnnualCoolingDistributionSystemEfficiency>0.7</AnnualCoolingDistributionSystemEfficiency>
          </HVACDistribution>
        </HVAC>
        <WaterHeating>
          <WaterHeatingSystem>
            <SystemIdentifier id="WaterHeater"/>
            <WaterHeaterType>space-heating boiler with storage tank</WaterHeaterType>
            <RelatedHVACSystem idref="Boiler"/>
          </WaterHeatingSystem>
        </WaterHeating>
        <SolarThermal>
          <SolarThermalSystem>
            <SystemIdentifier id="SolarThermal"/>
            <ConnectedTo idref="WaterHeater"/>
            <SolarFraction>0.6</SolarFraction>
          </SolarThermalSystem>
        </SolarThermal>
      </Systems>
    </BuildingDetails>
  </Building>
</HPXML>"#;

    #[test]
    fn hpxml_parse() {
        let bd: BuildingDescription = HPXML.parse().unwrap();
        assert_eq!(bd.eri_design.as_deref(), Some("ERI Reference Home"));
        assert_eq!(bd.conditioned_floor_area, 2700.0);
        assert_eq!(bd.number_of_bedrooms, 3.0);
        assert_eq!(bd.number_of_conditioned_floors, 2.0);

        let boiler = &bd.heating_systems[0];
        assert_eq!(boiler.system_type, "Boiler");
        assert_eq!(boiler.fuel, FuelType::NaturalGas);
        assert_eq!(boiler.seed_id.as_deref(), Some("SeedBoiler"));
        assert_eq!(boiler.fraction_heat_load_served, 0.4);

        let hp = &bd.heat_pumps[0];
        assert!(hp.is_dual_fuel());
        assert_eq!(hp.backup_fuel, Some(FuelType::Propane));
        assert_eq!(hp.heating_efficiency.as_ref().map(|e| e.units.as_str()), Some("HSPF"));
        assert_eq!(bd.distribution("HVACDistribution").and_then(|d| d.heating_dse), Some(0.8));

        let dhw = &bd.water_heating_systems[0];
        assert!(dhw.is_combi());
        assert_eq!(bd.water_heater_fuel(dhw), Some(FuelType::NaturalGas));
        assert_eq!(
            bd.solar_thermal_for("WaterHeater").and_then(|s| s.solar_fraction),
            Some(0.6)
        );
    }

    #[test]
    fn hpxml_solar_fraction_out_of_range() {
        let bad = HPXML.replace("<SolarFraction>0.6</SolarFraction>", "<SolarFraction>1.0</SolarFraction>");
        match bad.parse::<BuildingDescription>() {
            Err(ReportError::WrongInput(msg)) => assert!(msg.contains("SolarFraction")),
            _ => panic!("a solar fraction of 1.0 must be rejected"),
        }
    }

    #[test]
    fn hpxml_not_xml() {
        assert!("not an hpxml file".parse::<BuildingDescription>().is_err());
    }
}
