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


#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::process::exit;

use clap::{App, AppSettings, Arg};
use failure::Error;
use failure::ResultExt;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use simreport::{
    simulation_output_report, BuildingDescription, OutputNameMap, ReportError, ReportOptions,
    ReportingFrequency, SqlResultStore,
};

// Funciones auxiliares -----------------------------------------------------------------------

fn readfile(path: &Path) -> Result<String, Error> {
    let mut f = File::open(path).context(format!("Archivo {} no encontrado", path.display()))?;
    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .context("Error al leer el archivo")?;
    Ok(contents)
}

fn writefile(path: &Path, content: &[u8]) {
    let result = File::create(&path).and_then(|mut file| file.write_all(content));
    if let Err(err) = result {
        eprintln!(
            "ERROR: no se ha podido escribir en \"{}\": {}",
            path.display(),
            err
        );
        exit(exitcode::IOERR);
    }
}

/// Nivel de registro según el número de repeticiones de -v
fn log_level(verbosity: u64) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Lee y parsea un archivo de entrada, terminando el programa si hay errores
fn parse_input<T>(path: &Path, descr: &str) -> T
where
    T: std::str::FromStr<Err = ReportError>,
{
    let content = readfile(path).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: No se ha podido leer el archivo {} \"{}\" -> {}",
            descr,
            path.display(),
            err
        );
        exit(exitcode::IOERR);
    });
    content.parse::<T>().unwrap_or_else(|err| {
        eprintln!(
            "ERROR: Formato incorrecto del archivo {} \"{}\" ({})",
            descr,
            path.display(),
            err
        );
        exit(exitcode::DATAERR);
    })
}

// Función principal ------------------------------------------------------------------------------

fn main() {
    let matches = App::new("SimReport")
        .bin_name("simreport")
        .version(crate_version!())
        .author("
Copyright (c) 2018-2022 Ministerio de Fomento,
                        Instituto de CC. de la Construcción Eduardo Torroja (IETcc-CSIC)

Autores: Rafael Villar Burke <pachi@ietcc.csic.es>,
         Daniel Jiménez González <dani@ietcc.csic.es>
         Marta Sorribes Gil <msorribes@ietcc.csic.es>

Licencia: Publicado bajo licencia MIT.

")
        .about("SimReport - Informe de resultados de simulaciones EnergyPlus de edificios HPXML.")
        .setting(AppSettings::NextLineHelp)
        .arg(Arg::with_name("archivo_sql")
            .short("s")
            .long("archivo_sql")
            .value_name("ARCHIVO_SQL")
            .help("Base de datos SQLite de resultados de EnergyPlus (eplusout.sql)")
            .takes_value(true)
            .required_unless("showlicense")
            .display_order(1))
        .arg(Arg::with_name("archivo_hpxml")
            .short("x")
            .long("archivo_hpxml")
            .value_name("ARCHIVO_HPXML")
            .help("Descripción del edificio en formato HPXML")
            .takes_value(true)
            .required_unless("showlicense")
            .display_order(2))
        .arg(Arg::with_name("archivo_mapa")
            .short("m")
            .long("archivo_mapa")
            .value_name("ARCHIVO_MAPA")
            .help("Mapa de sistemas HPXML a objetos de EnergyPlus (texto separado por tabuladores)")
            .takes_value(true)
            .display_order(3))
        .arg(Arg::with_name("directorio_salida")
            .short("o")
            .long("directorio_salida")
            .value_name("DIRECTORIO_SALIDA")
            .default_value(".")
            .help("Directorio de salida de las tablas de resultados")
            .takes_value(true)
            .display_order(4))
        .arg(Arg::with_name("frecuencia")
            .short("f")
            .long("frecuencia")
            .value_name("FRECUENCIA")
            .default_value("hourly")
            .help("Frecuencia de las series temporales (timestep, hourly, daily)")
            .takes_value(true)
            .display_order(5))
        .arg(Arg::with_name("ts_fuels")
            .long("include_timeseries_fuel_consumptions")
            .help("Incluye las series temporales de consumo por combustible"))
        .arg(Arg::with_name("ts_end_uses")
            .long("include_timeseries_end_use_consumptions")
            .help("Incluye las series temporales de consumo por uso final"))
        .arg(Arg::with_name("ts_loads")
            .long("include_timeseries_total_loads")
            .help("Incluye las series temporales de demandas totales"))
        .arg(Arg::with_name("ts_component_loads")
            .long("include_timeseries_component_loads")
            .help("Incluye las series temporales de demandas por componentes"))
        .arg(Arg::with_name("ts_zone_temps")
            .long("include_timeseries_zone_temperatures")
            .help("Incluye las series temporales de temperaturas de zona"))
        .arg(Arg::with_name("archivo_salida_json")
            .long("json")
            .value_name("ARCHIVO_SALIDA_JSON")
            .help("Archivo de salida de los valores registrados en formato JSON")
            .takes_value(true))
        .arg(Arg::with_name("archivo_salida_hpxml_json")
            .long("hpxml_json")
            .value_name("ARCHIVO_SALIDA_HPXML_JSON")
            .help("Archivo de salida de la descripción del edificio interpretada, en formato JSON")
            .takes_value(true))
        .arg(Arg::with_name("showlicense")
            .short("L")
            .long("licencia")
            .help("Muestra la licencia del programa (MIT)"))
        .arg(Arg::with_name("v")
            .short("v")
            .multiple(true)
            .help("Sets the level of verbosity"))
        .get_matches();

    if matches.is_present("showlicense") {
        println!(
            "
Copyright (c) 2018-2022 Ministerio de Fomento
                        Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the 'Software'), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED 'AS IS', WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.

Author(s): Rafael Villar Burke <pachi@ietcc.csic.es>
            Daniel Jiménez González <dani@ietcc.csic.es>
            Marta Sorribes Gil <msorribes@ietcc.csic.es>"
        );
        exit(exitcode::OK);
    }

    // Prólogo ------------------------------------------------------------------------------------

    let verbosity = matches.occurrences_of("v");

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("AVISO: no se ha podido activar el registro de mensajes");
    }

    if verbosity > 2 {
        println!("Opciones indicadas: ----------");
        println!("{:#?}", matches);
        println!("------------------------------");
    }

    println!("** Datos de entrada");

    // Opciones del informe -----------------------------------------------------------------------
    let frequency = matches
        .value_of("frecuencia")
        .unwrap_or("hourly")
        .parse::<ReportingFrequency>()
        .unwrap_or_else(|err| {
            eprintln!("ERROR: {}", err);
            exit(exitcode::DATAERR);
        });
    let options = ReportOptions {
        timeseries_frequency: frequency,
        include_timeseries_fuel_consumptions: matches.is_present("ts_fuels"),
        include_timeseries_end_use_consumptions: matches.is_present("ts_end_uses"),
        include_timeseries_total_loads: matches.is_present("ts_loads"),
        include_timeseries_component_loads: matches.is_present("ts_component_loads"),
        include_timeseries_zone_temperatures: matches.is_present("ts_zone_temps"),
    };
    if verbosity > 0 {
        println!("Opciones del informe: {:?}", options);
    }

    // Descripción del edificio --------------------------------------------------------------------
    let hpxml_path = Path::new(matches.value_of("archivo_hpxml").unwrap_or_default());
    let building: BuildingDescription = parse_input(hpxml_path, "HPXML");
    println!("Descripción del edificio: \"{}\"", hpxml_path.display());
    if let Some(design) = &building.eri_design {
        println!("Diseño ERI: {}", design);
    }

    if let Some(archivo) = matches.value_of("archivo_salida_hpxml_json") {
        let path = Path::new(archivo);
        let json = serde_json::to_string_pretty(&building).unwrap_or_else(|err| {
            eprintln!("ERROR: conversión a JSON de la descripción del edificio: {}", err);
            exit(exitcode::DATAERR);
        });
        writefile(path, json.as_bytes());
        if verbosity > 0 {
            println!("Guardada descripción del edificio en formato JSON: {}", path.display());
        }
    }

    // Mapa de salidas -----------------------------------------------------------------------------
    let map: OutputNameMap = match matches.value_of("archivo_mapa") {
        Some(archivo) => {
            let path = Path::new(archivo);
            println!("Mapa de salidas: \"{}\"", path.display());
            parse_input(path, "de mapa de salidas")
        }
        None => Default::default(),
    };

    // Resultados de la simulación -----------------------------------------------------------------
    let sql_path = Path::new(matches.value_of("archivo_sql").unwrap_or_default());
    if !sql_path.is_file() {
        eprintln!(
            "ERROR: No se ha encontrado la base de datos de resultados \"{}\"",
            sql_path.display()
        );
        exit(exitcode::IOERR);
    }
    let store = SqlResultStore::open(sql_path).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: No se ha podido abrir la base de datos de resultados \"{}\" ({})",
            sql_path.display(),
            err
        );
        exit(exitcode::IOERR);
    });
    println!("Resultados de la simulación: \"{}\"", sql_path.display());

    // Cálculo del informe -------------------------------------------------------------------------
    let report = simulation_output_report(&store, &building, &map, &options);

    if let Err(err) = store.close() {
        eprintln!("AVISO: {}", err);
    }

    let report = report.unwrap_or_else(|err| {
        eprintln!("ERROR: No se ha podido generar el informe de resultados: {}", err);
        exit(exitcode::DATAERR);
    });

    // Salida de resultados ------------------------------------------------------------------------
    println!("** Resultados");

    let outdir = Path::new(matches.value_of("directorio_salida").unwrap_or("."));
    let written = report.write(outdir).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: no se han podido escribir los resultados en \"{}\": {}",
            outdir.display(),
            err
        );
        exit(exitcode::IOERR);
    });
    for path in &written {
        println!("Guardado archivo de resultados: {}", path.display());
    }

    if let Some(archivo) = matches.value_of("archivo_salida_json") {
        let path = Path::new(archivo);
        let json = report.registered_json().unwrap_or_else(|err| {
            eprintln!("ERROR: conversión a JSON de los valores registrados: {}", err);
            exit(exitcode::DATAERR);
        });
        writefile(path, json.as_bytes());
        if verbosity > 0 {
            println!("Guardados valores registrados en formato JSON: {}", path.display());
        }
    }

    if verbosity > 1 {
        println!("{}", report.annual);
    }
}
