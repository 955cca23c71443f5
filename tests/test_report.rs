mod common;

use common::*;
use pretty_assertions::assert_eq;
use simreport::*;

fn run(db: &ResultsDb, hpxml: &str, map: &str, options: &ReportOptions) -> Result<Report> {
    let store = SqlResultStore::open(db.path())?;
    let building: BuildingDescription = hpxml.parse()?;
    let map: OutputNameMap = map.parse()?;
    let report = simulation_output_report(&store, &building, &map, options);
    store.close()?;
    report
}

fn annual_value(report: &Report, row: &str) -> Option<f64> {
    report
        .annual
        .lines()
        .find(|l| l.starts_with(row))
        .and_then(|l| l.rsplit(", ").next())
        .and_then(|v| v.parse().ok())
}

#[test]
fn baseboard_end_uses_match_total() {
    let db = ResultsDb::new();
    db.meter_mbtu("Electricity:Facility", 100.0)
        .variable_mbtu("BASEBOARD", "Baseboard Electricity Energy", 100.0)
        .variable_mbtu("EMS", "loads_htg_tot", 90.0);

    let report = run(&db, HPXML_BASEBOARD, "", &ReportOptions::default()).unwrap();
    let lines: Vec<&str> = report.annual.lines().collect();
    assert_eq!(lines[0], "Electricity: Total (MBtu), 100.0");
    assert_eq!(annual_value(&report, "Electricity: Heating (MBtu)"), Some(100.0));
    assert_eq!(annual_value(&report, "Load: Heating (MBtu)"), Some(90.0));
    assert_eq!(report.eri, None);
    assert_eq!(report.timeseries, None);
    assert_eq!(report.registered["electricity_total_m_btu"], 100.0);
}

#[test]
fn heat_pump_dse_pv_and_solar_fraction() {
    let db = heat_pump_results();
    let report = run(&db, HPXML_HEAT_PUMP, MAP_HEAT_PUMP, &ReportOptions::default()).unwrap();

    assert_eq!(annual_value(&report, "Electricity: Total (MBtu)"), Some(32.0));
    assert_eq!(annual_value(&report, "Electricity: Heating (MBtu)"), Some(10.0));
    assert_eq!(annual_value(&report, "Electricity: Cooling (MBtu)"), Some(6.0));
    assert_eq!(annual_value(&report, "Electricity: Hot Water (MBtu)"), Some(6.0));
    assert_eq!(annual_value(&report, "Electricity: PV (MBtu)"), Some(-5.0));
    assert_eq!(annual_value(&report, "Load: Hot Water: Delivered (MBtu)"), Some(8.0));
    assert_eq!(annual_value(&report, "Load: Hot Water: Solar Thermal (MBtu)"), Some(4.0));

    let eri = report.eri.unwrap();
    let lines: Vec<&str> = eri.lines().collect();
    assert_eq!(lines[0], "hpxml_heat_sys_ids, ['HeatPump']");
    assert_eq!(lines[2], "hpxml_dhw_sys_ids, ['WaterHeater']");
    assert!(lines.contains(&"enduseElectricityHeating, [10.0]"));
    assert!(lines.contains(&"loadHeating, [20.0]"));
    assert!(lines.contains(&"loadHotWaterDelivered, [8.0]"));
    assert!(lines.contains(&"hpxml_cfa, 1500.0"));
}

#[test]
fn heat_pump_fuel_timeseries_reconcile() {
    let db = heat_pump_results();
    let options = ReportOptions {
        timeseries_frequency: ReportingFrequency::Daily,
        include_timeseries_fuel_consumptions: true,
        ..Default::default()
    };
    let report = run(&db, HPXML_HEAT_PUMP, MAP_HEAT_PUMP, &options).unwrap();
    let timeseries = report.timeseries.unwrap();
    let lines: Vec<&str> = timeseries.lines().collect();
    assert_eq!(lines.len(), 2 + 365);
    assert_eq!(lines[0], "Day, Electricity: Total");
    assert_eq!(lines[1], "#, kWh");
    assert!(lines[2].starts_with("1, "));
    assert!(lines[366].starts_with("365, "));
}

#[test]
fn missing_timeseries_fails_reconciliation() {
    // Annual data without daily values: the zero filled series cannot match
    let db = ResultsDb::new();
    db.meter_mbtu("Electricity:Facility", 100.0)
        .variable_mbtu("BASEBOARD", "Baseboard Electricity Energy", 100.0);
    let options = ReportOptions {
        timeseries_frequency: ReportingFrequency::Daily,
        include_timeseries_fuel_consumptions: true,
        ..Default::default()
    };
    let err = run(&db, HPXML_BASEBOARD, "", &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Timeseries outputs (0.000) do not sum to annual output (100.000) for End Use: Electricity: Heating."
    );
}

#[test]
fn end_use_mismatch_is_fatal() {
    let db = ResultsDb::new();
    db.meter_mbtu("Electricity:Facility", 100.0)
        .variable_mbtu("BASEBOARD", "Baseboard Electricity Energy", 90.0);
    let err = run(&db, HPXML_BASEBOARD, "", &ReportOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Electricity category end uses (90.000) do not sum to total (100.000)."
    );
}

#[test]
fn empty_results_unsuccessful() {
    let db = ResultsDb::new();
    let err = run(&db, HPXML_BASEBOARD, "", &ReportOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Simulation unsuccessful.");
}

#[test]
fn zone_temperatures_always_reported() {
    let db = ResultsDb::new();
    db.meter_mbtu("Electricity:Facility", 100.0)
        .variable_mbtu("BASEBOARD", "Baseboard Electricity Energy", 100.0)
        .variable_daily("LIVING SPACE", "Zone Mean Air Temperature", "C", &vec![20.0; 365]);
    let options = ReportOptions {
        timeseries_frequency: ReportingFrequency::Daily,
        include_timeseries_zone_temperatures: true,
        ..Default::default()
    };
    let report = run(&db, HPXML_BASEBOARD, "", &options).unwrap();
    let timeseries = report.timeseries.unwrap();
    let lines: Vec<&str> = timeseries.lines().collect();
    assert_eq!(lines[0], "Day, Temperature: Living Space");
    assert_eq!(lines[1], "#, F");
    assert_eq!(lines[2], "1, 68.0");
}

#[test]
fn report_runs_are_independent() {
    let db = heat_pump_results();
    let options = ReportOptions::default();
    let first = run(&db, HPXML_HEAT_PUMP, MAP_HEAT_PUMP, &options).unwrap();
    let second = run(&db, HPXML_HEAT_PUMP, MAP_HEAT_PUMP, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_write_files() {
    let db = heat_pump_results();
    let report = run(&db, HPXML_HEAT_PUMP, MAP_HEAT_PUMP, &ReportOptions::default()).unwrap();
    let outdir = tempfile::tempdir().unwrap();
    let written = report.write(outdir.path()).unwrap();
    assert_eq!(written.len(), 2);
    assert!(outdir.path().join("results_annual.csv").is_file());
    assert!(outdir.path().join("results_eri.csv").is_file());
    assert!(!outdir.path().join("results_timeseries.csv").exists());
}
