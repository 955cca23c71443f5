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
Mapa de salidas de EnergyPlus por sistema
=========================================

Tab separated file relating each HPXML system id to the names of the
EnergyPlus objects (and EMS output variables) created for it:

```text
# hpxml id	eplus names...
HeatPump	HEAT PUMP HTG COIL	HEAT PUMP CLG COIL	heat_pump_htg_fan_pump
HeatPump_dfhp_backup_system	HEAT PUMP BACKUP FURNACE
```

Systems missing from the map use their own id as the only object name.
*/

use std::fmt;
use std::str;

use indexmap::IndexMap;

use crate::error::ReportError;
use crate::taxonomy::EMS_SUFFIXES;
use crate::types::SystemId;

/// Mapa de identificadores de sistemas a nombres de salidas de EnergyPlus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputNameMap {
    entries: IndexMap<String, Vec<String>>,
}

fn is_ems_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    EMS_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

impl OutputNameMap {
    /// Nombres de EnergyPlus de un sistema (el propio id si no figura en el mapa)
    pub fn names(&self, id: &SystemId) -> Vec<String> {
        self.entries
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| vec![id.to_string()])
    }

    /// Claves de objetos de EnergyPlus de un sistema, en mayúsculas
    ///
    /// Object keys of a system, excluding EMS output variable names
    pub fn object_keys(&self, id: &SystemId) -> Vec<String> {
        self.names(id)
            .into_iter()
            .filter(|n| !is_ems_name(n))
            .map(|n| n.to_uppercase())
            .collect()
    }

    /// Variables EMS de un sistema que terminan con el sufijo indicado
    pub fn ems_names(&self, id: &SystemId, suffix: &str) -> Vec<String> {
        self.names(id)
            .into_iter()
            .filter(|n| n.to_lowercase().ends_with(suffix))
            .collect()
    }

    /// Claves de objetos de un conjunto de sistemas
    pub fn object_keys_all<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a SystemId>,
    {
        ids.into_iter().flat_map(|id| self.object_keys(id)).collect()
    }
}

impl str::FromStr for OutputNameMap {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<OutputNameMap, Self::Err> {
        let s_nobom = s.trim_start_matches('\u{feff}');
        let mut entries = IndexMap::new();
        for line in s_nobom.lines() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t').map(str::trim);
            let id = fields.next().unwrap_or_default();
            if id.is_empty() {
                return Err(ReportError::ParseError(format!(
                    "output map line without system id: \"{}\"",
                    line
                )));
            }
            let names: Vec<String> = fields
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            entries
                .entry(id.to_string())
                .or_insert_with(Vec::new)
                .extend(names);
        }
        Ok(OutputNameMap { entries })
    }
}

impl fmt::Display for OutputNameMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .entries
            .iter()
            .map(|(id, names)| {
                let mut fields = vec![id.as_str()];
                fields.extend(names.iter().map(String::as_str));
                fields.join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", lines)
    }
}
