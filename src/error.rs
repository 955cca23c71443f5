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

//! Errores de la biblioteca
//!
//! Every fatal condition of a report run ends up as a `ReportError`.
//! Degraded conditions (missing timeseries) are only logged.

use failure::Fail;

/// Errores del cálculo del informe de resultados
///
/// Report errors
#[derive(Debug, Fail)]
pub enum ReportError {
    /// La consulta a la base de datos de resultados ha fallado
    ///
    /// Result store rejected a query
    #[fail(display = "Query error: {} ({})", query, desc)]
    Query {
        /// Consulta
        query: String,
        /// Descripción del error
        desc: String,
    },
    /// El consumo total de todos los combustibles es nulo
    ///
    /// Sum of all fuel totals is zero
    #[fail(display = "Simulation unsuccessful.")]
    SimulationUnsuccessful,
    /// La suma de usos finales no coincide con el total del combustible
    ///
    /// End uses of a fuel do not add up to its total
    #[fail(
        display = "{} category end uses ({:.3}) do not sum to total ({:.3}).",
        fuel, sum, total
    )]
    EndUseMismatch {
        /// Combustible
        fuel: String,
        /// Suma de usos finales
        sum: f64,
        /// Total del combustible
        total: f64,
    },
    /// La suma de la serie temporal no coincide con el valor anual
    ///
    /// Timeseries sum does not match the annual value
    #[fail(
        display = "Timeseries outputs ({:.3}) do not sum to annual output ({:.3}) for {}: {}.",
        sum, annual, output_type, key
    )]
    TimeseriesMismatch {
        /// Suma de la serie temporal
        sum: f64,
        /// Valor anual
        annual: f64,
        /// Familia de resultados
        output_type: String,
        /// Resultado
        key: String,
    },
    /// Columnas de la tabla de series temporales de distinta longitud
    ///
    /// Timeseries columns with different lengths
    #[fail(display = "Inconsistent number of array elements: {:?}.", _0)]
    InconsistentLengths(Vec<usize>),
    /// Frecuencia de las series temporales desconocida
    ///
    /// Unknown timeseries frequency
    #[fail(display = "Unexpected timeseries_frequency: {}.", _0)]
    UnknownFrequency(String),
    /// Error de configuración (clave o unidad desconocida)
    ///
    /// Configuration error (unknown key or incompatible units)
    #[fail(display = "Configuration error: {}", _0)]
    Config(String),
    /// Error al interpretar un valor
    ///
    /// Parse error
    #[fail(display = "Parse error: {}", _0)]
    ParseError(String),
    /// Datos de entrada incorrectos
    ///
    /// Wrong input data
    #[fail(display = "Wrong input: {}", _0)]
    WrongInput(String),
}

/// Resultado con error de la biblioteca
///
/// Library result type
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<std::num::ParseFloatError> for ReportError {
    fn from(err: std::num::ParseFloatError) -> Self {
        ReportError::ParseError(err.to_string())
    }
}

impl From<roxmltree::Error> for ReportError {
    fn from(err: roxmltree::Error) -> Self {
        ReportError::WrongInput(format!("HPXML could not be read ({})", err))
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::ParseError(err.to_string())
    }
}
