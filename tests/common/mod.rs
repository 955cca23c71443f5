//! Utilidades comunes de los tests de integración
//!
//! Synthetic EnergyPlus result stores written to temporary SQLite files

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Julios por MBtu
pub const MBTU: f64 = 1e6 * 1055.05585262;

const SCHEMA: &str = "
    CREATE TABLE ReportDataDictionary (
        ReportDataDictionaryIndex INTEGER PRIMARY KEY, IsMeter INTEGER, Type TEXT,
        IndexGroup TEXT, TimestepType TEXT, KeyValue TEXT, Name TEXT,
        ReportingFrequency TEXT, ScheduleName TEXT, Units TEXT);
    CREATE TABLE ReportData (
        ReportDataIndex INTEGER PRIMARY KEY, TimeIndex INTEGER,
        ReportDataDictionaryIndex INTEGER, Value REAL);
    CREATE TABLE Time (
        TimeIndex INTEGER PRIMARY KEY, Month INTEGER, Day INTEGER, Hour INTEGER,
        Minute INTEGER, Interval INTEGER, IntervalType INTEGER);
    CREATE TABLE TabularDataWithStrings (
        TabularDataIndex INTEGER PRIMARY KEY, Value TEXT, ReportName TEXT,
        ReportForString TEXT, TableName TEXT, RowName TEXT, ColumnName TEXT, Units TEXT);
";

/// Base de datos de resultados de EnergyPlus en un directorio temporal
pub struct ResultsDb {
    pub dir: TempDir,
    conn: Connection,
}

impl ResultsDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("eplusout.sql")).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO Time (Interval, IntervalType) VALUES (60, 0)",
            params![],
        )
        .unwrap();
        ResultsDb { dir, conn }
    }

    fn add(&self, is_meter: bool, key: &str, name: &str, freq: &str, units: &str, values: &[f64]) {
        self.conn
            .execute(
                "INSERT INTO ReportDataDictionary (IsMeter, KeyValue, Name, ReportingFrequency, Units) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![is_meter as i64, key, name, freq, units],
            )
            .unwrap();
        let idx = self.conn.last_insert_rowid();
        for (i, v) in values.iter().enumerate() {
            self.conn
                .execute(
                    "INSERT INTO ReportData (TimeIndex, ReportDataDictionaryIndex, Value) VALUES (?1, ?2, ?3)",
                    params![i as i64 + 1, idx, v],
                )
                .unwrap();
        }
    }

    /// Contador anual en MBtu
    pub fn meter_mbtu(&self, name: &str, mbtu: f64) -> &Self {
        self.add(true, "", name, "Run Period", "J", &[mbtu * MBTU]);
        self
    }

    /// Contador diario repartido uniformemente en 365 días
    pub fn meter_daily_mbtu(&self, name: &str, mbtu: f64) -> &Self {
        self.add(true, "", name, "Daily", "J", &vec![mbtu * MBTU / 365.0; 365]);
        self
    }

    /// Variable anual en MBtu
    pub fn variable_mbtu(&self, key: &str, name: &str, mbtu: f64) -> &Self {
        self.add(false, key, name, "Run Period", "J", &[mbtu * MBTU]);
        self
    }

    /// Variable diaria repartida uniformemente en 365 días
    pub fn variable_daily_mbtu(&self, key: &str, name: &str, mbtu: f64) -> &Self {
        self.add(false, key, name, "Daily", "J", &vec![mbtu * MBTU / 365.0; 365]);
        self
    }

    /// Variable diaria en las unidades indicadas
    pub fn variable_daily(&self, key: &str, name: &str, units: &str, values: &[f64]) -> &Self {
        self.add(false, key, name, "Daily", units, values);
        self
    }

    /// Ruta del archivo de resultados
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("eplusout.sql")
    }

    /// Escribe un archivo auxiliar en el directorio temporal
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

/// Texto de la ruta
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Edificio con un radiador eléctrico y sin ACS
pub const HPXML_BASEBOARD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HPXML xmlns="http://hpxmlonline.com/2019/10" schemaVersion="3.0">
  <Building>
    <BuildingDetails>
      <BuildingSummary>
        <BuildingConstruction>
          <NumberofConditionedFloors>2</NumberofConditionedFloors>
          <NumberofBedrooms>3</NumberofBedrooms>
          <ConditionedFloorArea>2000</ConditionedFloorArea>
        </BuildingConstruction>
      </BuildingSummary>
      <Systems>
        <HVAC>
          <HVACPlant>
            <HeatingSystem>
              <SystemIdentifier id="Baseboard"/>
              <HeatingSystemType><ElectricResistance/></HeatingSystemType>
              <HeatingSystemFuel>electricity</HeatingSystemFuel>
              <AnnualHeatingEfficiency><Units>Percent</Units><Value>1.0</Value></AnnualHeatingEfficiency>
              <FractionHeatLoadServed>1.0</FractionHeatLoadServed>
            </HeatingSystem>
          </HVACPlant>
        </HVAC>
      </Systems>
    </BuildingDetails>
  </Building>
</HPXML>
"#;

/// Edificio ERI con bomba de calor (DSE 0.8 en calefacción), calentador eléctrico
/// y sistema solar simplificado
pub const HPXML_HEAT_PUMP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HPXML xmlns="http://hpxmlonline.com/2019/10" schemaVersion="3.0">
  <SoftwareInfo>
    <extension>
      <ERICalculation><Design>ERI Rated Home</Design></ERICalculation>
    </extension>
  </SoftwareInfo>
  <Building>
    <BuildingDetails>
      <BuildingSummary>
        <BuildingConstruction>
          <NumberofConditionedFloors>1</NumberofConditionedFloors>
          <NumberofBedrooms>3</NumberofBedrooms>
          <ConditionedFloorArea>1500</ConditionedFloorArea>
        </BuildingConstruction>
      </BuildingSummary>
      <Systems>
        <HVAC>
          <HVACPlant>
            <HeatPump>
              <SystemIdentifier id="HeatPump"/>
              <DistributionSystem idref="Ducts"/>
              <HeatPumpType>air-to-air</HeatPumpType>
              <HeatPumpFuel>electricity</HeatPumpFuel>
              <AnnualCoolingEfficiency><Units>SEER</Units><Value>13</Value></AnnualCoolingEfficiency>
              <AnnualHeatingEfficiency><Units>HSPF</Units><Value>7.7</Value></AnnualHeatingEfficiency>
              <FractionHeatLoadServed>1</FractionHeatLoadServed>
              <FractionCoolLoadServed>1</FractionCoolLoadServed>
            </HeatPump>
          </HVACPlant>
          <HVACDistribution>
            <SystemIdentifier id="Ducts"/>
            <AnnualHeatingDistributionSystemEfficiency>0.8</AnnualHeatingDistributionSystemEfficiency>
            <AnnualCoolingDistributionSystemEfficiency>1.0</AnnualCoolingDistributionSystemEfficiency>
          </HVACDistribution>
        </HVAC>
        <WaterHeating>
          <WaterHeatingSystem>
            <SystemIdentifier id="WaterHeater"/>
            <FuelType>electricity</FuelType>
            <WaterHeaterType>storage water heater</WaterHeaterType>
            <EnergyFactor>0.95</EnergyFactor>
          </WaterHeatingSystem>
        </WaterHeating>
        <SolarThermal>
          <SolarThermalSystem>
            <SystemIdentifier id="SolarThermal"/>
            <ConnectedTo idref="WaterHeater"/>
            <SolarFraction>0.5</SolarFraction>
          </SolarThermalSystem>
        </SolarThermal>
      </Systems>
    </BuildingDetails>
  </Building>
</HPXML>
"#;

/// Mapa de salidas del edificio con bomba de calor
pub const MAP_HEAT_PUMP: &str = "# hpxml id\teplus names
HeatPump\tHeat Pump Htg Coil\tHeat Pump Clg Coil\theat_pump_htg_fan_pump\theat_pump_clg_fan_pump
WaterHeater\tWater Heater\tWater Use Connections
";

/// Resultados del edificio con bomba de calor
///
/// Electricity: 30 MBtu metered (heating 8, cooling 6, hot water 6, plug loads 10),
/// 5 MBtu of PV. The DSE of 0.8 raises heating to 10 and the total to 32.
pub fn heat_pump_results() -> ResultsDb {
    let db = ResultsDb::new();
    db.meter_mbtu("Electricity:Facility", 30.0)
        .meter_daily_mbtu("Electricity:Facility", 30.0)
        .meter_mbtu("PlugLoads:InteriorEquipment:Electricity", 10.0)
        .meter_mbtu("Photovoltaic:ElectricityProduced", 5.0)
        .variable_mbtu("HEAT PUMP HTG COIL", "Heating Coil Electricity Energy", 8.0)
        .variable_daily_mbtu("HEAT PUMP HTG COIL", "Heating Coil Electricity Energy", 8.0)
        .variable_mbtu("HEAT PUMP CLG COIL", "Cooling Coil Electricity Energy", 6.0)
        .variable_daily_mbtu("HEAT PUMP CLG COIL", "Cooling Coil Electricity Energy", 6.0)
        .variable_mbtu("WATER HEATER", "Water Heater Electricity Energy", 6.0)
        .variable_daily_mbtu("WATER HEATER", "Water Heater Electricity Energy", 6.0)
        .variable_mbtu("EMS", "loads_htg_tot", 20.0)
        .variable_mbtu("EMS", "loads_clg_tot", 15.0)
        .variable_mbtu(
            "WATER USE CONNECTIONS",
            "Water Use Connections Plant Hot Water Energy",
            4.0,
        );
    db
}
