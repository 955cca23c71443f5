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
Base de datos de resultados
===========================

Read only access to the SQLite output of an EnergyPlus simulation (`eplusout.sql`).

Tables used:

- `ReportDataDictionary` (IsMeter, KeyValue, Name, ReportingFrequency, Units)
- `ReportData` (TimeIndex, ReportDataDictionaryIndex, Value)
- `TabularDataWithStrings` (ReportName, ReportForString, TableName, RowName, ColumnName, Units, Value)
- `Time` (Interval, IntervalType)

Any failure reported by SQLite is a fatal `ReportError::Query`.
*/

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};

use crate::error::{ReportError, Result};

/// Selección de entradas del diccionario de resultados
///
/// Selection of ReportDataDictionary entries
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryFilter {
    /// Contadores (true) o variables (false)
    pub is_meter: bool,
    /// Claves admitidas (None = cualquiera). Se comparan en mayúsculas.
    pub keys: Option<Vec<String>>,
    /// Nombres admitidos. Se comparan en mayúsculas.
    pub names: Vec<String>,
    /// Frecuencia de EnergyPlus ("Run Period", "Hourly", ...)
    pub frequency: String,
    /// Unidades exigidas
    pub units: Option<String>,
}

impl DictionaryFilter {
    fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = vec![Value::Integer(if self.is_meter { 1 } else { 0 })];
        let mut sql = String::from(
            "SELECT ReportDataDictionaryIndex FROM ReportDataDictionary WHERE IsMeter=?",
        );
        sql.push_str(&format!(" AND UPPER(Name) IN ({})", placeholders(self.names.len())));
        params.extend(self.names.iter().map(|n| Value::Text(n.to_uppercase())));
        if let Some(keys) = &self.keys {
            sql.push_str(&format!(" AND UPPER(KeyValue) IN ({})", placeholders(keys.len())));
            params.extend(keys.iter().map(|k| Value::Text(k.to_uppercase())));
        }
        sql.push_str(" AND ReportingFrequency=?");
        params.push(Value::Text(self.frequency.clone()));
        if let Some(units) = &self.units {
            sql.push_str(" AND Units=?");
            params.push(Value::Text(units.clone()));
        }
        (sql, params)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Base de datos SQLite de resultados de EnergyPlus
///
/// EnergyPlus SQLite result store, opened once per report run
#[derive(Debug)]
pub struct SqlResultStore {
    conn: Connection,
}

impl SqlResultStore {
    /// Abre la base de datos en modo de sólo lectura
    ///
    /// Open the result store read only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| ReportError::Query {
            query: format!("open {}", path.display()),
            desc: e.to_string(),
        })?;
        Ok(SqlResultStore { conn })
    }

    /// Usa una conexión ya abierta (p.e. una base de datos en memoria)
    pub fn from_connection(conn: Connection) -> Self {
        SqlResultStore { conn }
    }

    /// Cierra la base de datos
    ///
    /// Release the store explicitly at the end of the run
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| ReportError::Query {
            query: "close".into(),
            desc: e.to_string(),
        })
    }

    /// Suma de todos los valores seleccionados (None si no hay ninguno)
    pub fn sum(&self, filter: &DictionaryFilter) -> Result<Option<f64>> {
        let (dict_sql, params) = filter.to_sql();
        let sql = format!(
            "SELECT SUM(Value) FROM ReportData WHERE ReportDataDictionaryIndex IN ({})",
            dict_sql
        );
        self.conn
            .query_row(&sql, params_from_iter(params), |row| row.get::<_, Option<f64>>(0))
            .map_err(|e| query_error(&sql, e))
    }

    /// Serie temporal de la suma de los valores seleccionados, `value * conv + offset`
    ///
    /// Ordered per-interval sums of the selected entries
    pub fn series(&self, filter: &DictionaryFilter, conv: f64, offset: f64) -> Result<Vec<f64>> {
        let (dict_sql, dict_params) = filter.to_sql();
        let sql = format!(
            "SELECT SUM(Value*?+?) FROM ReportData WHERE ReportDataDictionaryIndex IN ({}) \
             GROUP BY TimeIndex ORDER BY TimeIndex",
            dict_sql
        );
        let mut params = vec![Value::Real(conv), Value::Real(offset)];
        params.extend(dict_params);

        let mut stmt = self.conn.prepare(&sql).map_err(|e| query_error(&sql, e))?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| row.get::<_, Option<f64>>(0))
            .map_err(|e| query_error(&sql, e))?;
        rows.map(|r| r.map(|v| v.unwrap_or(0.0)))
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| query_error(&sql, e))
    }

    /// Valor de un informe tabular (None si no existe)
    pub fn tabular(
        &self,
        report: &str,
        report_for: &str,
        table: &str,
        row: &str,
        column: &str,
        units: &str,
    ) -> Result<Option<f64>> {
        let sql = "SELECT Value FROM TabularDataWithStrings WHERE ReportName=? AND ReportForString=? \
                   AND TableName=? AND RowName=? AND ColumnName=? AND Units=?";
        let value = self
            .conn
            .query_row(
                sql,
                rusqlite::params![report, report_for, table, row, column, units],
                |r| r.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| query_error(sql, e))?;
        match value {
            Some(v) => Ok(Some(v.trim().parse::<f64>()?)),
            None => Ok(None),
        }
    }

    /// Claves disponibles para una variable y frecuencia, ordenadas
    pub fn variable_keys(&self, name: &str, frequency: &str) -> Result<Vec<String>> {
        let sql = "SELECT DISTINCT KeyValue FROM ReportDataDictionary \
                   WHERE IsMeter=0 AND Name=? AND ReportingFrequency=? ORDER BY KeyValue";
        let mut stmt = self.conn.prepare(sql).map_err(|e| query_error(sql, e))?;
        let rows = stmt
            .query_map(rusqlite::params![name, frequency], |r| r.get::<_, String>(0))
            .map_err(|e| query_error(sql, e))?;
        rows.collect::<std::result::Result<Vec<String>, _>>()
            .map_err(|e| query_error(sql, e))
    }

    /// Número de pasos de cálculo por hora de las zonas (1 si no consta)
    ///
    /// Zone timesteps per hour, from the shortest zone timestep interval in minutes
    pub fn timesteps_per_hour(&self) -> Result<u32> {
        let sql = "SELECT MIN(Interval) FROM Time WHERE IntervalType=0";
        let interval = self
            .conn
            .query_row(sql, [], |r| r.get::<_, Option<i64>>(0))
            .map_err(|e| query_error(sql, e))?;
        Ok(match interval {
            Some(minutes) if minutes > 0 && minutes < 60 => (60 / minutes) as u32,
            _ => 1,
        })
    }
}

fn query_error(sql: &str, err: rusqlite::Error) -> ReportError {
    ReportError::Query {
        query: sql.to_string(),
        desc: err.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testdb {
    //! Base de datos de resultados sintética para las pruebas

    use rusqlite::{params, Connection};

    use super::SqlResultStore;

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

    /// Constructor de bases de datos de resultados en memoria
    pub struct TestDb {
        conn: Connection,
    }

    impl TestDb {
        pub fn new(minutes_per_timestep: i64) -> Self {
            let conn = Connection::open_in_memory().unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            conn.execute(
                "INSERT INTO Time (Interval, IntervalType) VALUES (?1, 0)",
                params![minutes_per_timestep],
            )
            .unwrap();
            TestDb { conn }
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

        pub fn meter(&self, name: &str, freq: &str, values: &[f64]) -> &Self {
            self.add(true, "", name, freq, "J", values);
            self
        }

        pub fn variable(&self, key: &str, name: &str, freq: &str, values: &[f64]) -> &Self {
            self.add(false, key, name, freq, "J", values);
            self
        }

        pub fn variable_units(&self, key: &str, name: &str, freq: &str, units: &str, values: &[f64]) -> &Self {
            self.add(false, key, name, freq, units, values);
            self
        }

        pub fn tabular(&self, report: &str, report_for: &str, table: &str, row: &str, column: &str, units: &str, value: &str) -> &Self {
            self.conn
                .execute(
                    "INSERT INTO TabularDataWithStrings (Value, ReportName, ReportForString, TableName, RowName, ColumnName, Units) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![value, report, report_for, table, row, column, units],
                )
                .unwrap();
            self
        }

        pub fn into_store(self) -> SqlResultStore {
            SqlResultStore::from_connection(self.conn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testdb::TestDb;
    use super::*;

    fn filter(is_meter: bool, keys: Option<Vec<&str>>, names: &[&str], freq: &str) -> DictionaryFilter {
        DictionaryFilter {
            is_meter,
            keys: keys.map(|k| k.iter().map(|s| s.to_string()).collect()),
            names: names.iter().map(|s| s.to_string()).collect(),
            frequency: freq.into(),
            units: None,
        }
    }

    #[test]
    fn store_sum_and_series() {
        let db = TestDb::new(60);
        db.variable("Furnace", "Heating Coil NaturalGas Energy", "Run Period", &[30.0])
            .variable("Boiler", "Heating Coil NaturalGas Energy", "Run Period", &[12.0])
            .variable("Furnace", "Heating Coil NaturalGas Energy", "Hourly", &[1.0, 2.0, 3.0])
            .variable("Boiler", "Heating Coil NaturalGas Energy", "Hourly", &[1.0, 1.0, 1.0]);
        let store = db.into_store();

        let f = filter(false, Some(vec!["furnace", "BOILER"]), &["Heating Coil NaturalGas Energy"], "Run Period");
        assert_eq!(store.sum(&f).unwrap(), Some(42.0));

        let f = filter(false, Some(vec!["FURNACE"]), &["heating coil naturalgas energy"], "Hourly");
        assert_eq!(store.series(&f, 2.0, 1.0).unwrap(), vec![3.0, 5.0, 7.0]);

        let f = filter(false, None, &["Heating Coil NaturalGas Energy"], "Hourly");
        assert_eq!(store.series(&f, 1.0, 0.0).unwrap(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn store_no_match() {
        let store = TestDb::new(60).into_store();
        let f = filter(true, None, &["NaturalGas:Facility"], "Run Period");
        assert_eq!(store.sum(&f).unwrap(), None);
        assert!(store.series(&f, 1.0, 0.0).unwrap().is_empty());
    }

    #[test]
    fn store_tabular_keys_timesteps() {
        let db = TestDb::new(10);
        db.tabular("PEAK HEATING LOAD", "EMS", "Custom Monthly Report", "Maximum of Months", "LOADS_HTG_TOT {MAXIMUM}", "W", "  5000.0 ")
            .variable_units("LIVING SPACE", "Zone Mean Air Temperature", "Hourly", "C", &[20.0])
            .variable_units("BASEMENT", "Zone Mean Air Temperature", "Hourly", "C", &[18.0]);
        let store = db.into_store();
        assert_eq!(
            store
                .tabular("PEAK HEATING LOAD", "EMS", "Custom Monthly Report", "Maximum of Months", "LOADS_HTG_TOT {MAXIMUM}", "W")
                .unwrap(),
            Some(5000.0)
        );
        assert_eq!(
            store.variable_keys("Zone Mean Air Temperature", "Hourly").unwrap(),
            vec!["BASEMENT".to_string(), "LIVING SPACE".to_string()]
        );
        assert_eq!(store.timesteps_per_hour().unwrap(), 6);
    }

    #[test]
    fn store_missing_table_is_query_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let store = SqlResultStore::from_connection(conn);
        match store.timesteps_per_hour() {
            Err(ReportError::Query { query, .. }) => assert!(query.contains("FROM Time")),
            _ => panic!("missing tables must be reported as query errors"),
        }
    }
}
