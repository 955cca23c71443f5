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

//! Identificadores de sistemas

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sufijo del elemento de respaldo de una bomba de calor bivalente
///
/// Suffix of the synthesized identifier of a dual-fuel heat pump backup element
pub const DFHP_BACKUP_SUFFIX: &str = "_dfhp_backup_system";

/// Identificador de un sistema de calefacción, refrigeración o ACS
///
/// Heating, cooling or water heating system identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(String);

impl SystemId {
    /// Nuevo identificador
    pub fn new<S: Into<String>>(id: S) -> Self {
        SystemId(id.into())
    }

    /// Identificador del elemento de respaldo de una bomba de calor bivalente
    ///
    /// Identifier of the backup element of a dual-fuel heat pump
    pub fn dfhp_backup(&self) -> SystemId {
        SystemId(format!("{}{}", self.0, DFHP_BACKUP_SUFFIX))
    }

    /// Identificador del equipo principal (el propio si no es respaldo)
    pub fn dfhp_primary(&self) -> SystemId {
        SystemId(self.0.trim_end_matches(DFHP_BACKUP_SUFFIX).to_string())
    }

    /// Cadena del identificador
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SystemId {
    fn from(id: &str) -> Self {
        SystemId::new(id)
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
