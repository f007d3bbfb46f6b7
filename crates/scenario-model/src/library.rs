//! The scenario library: recents, imports, and locally saved scenarios.
//!
//! Persisted as a single JSON document:
//!
//! ```json
//! {
//!   "version": 2,
//!   "recents": [ {scenario record}, ... ],
//!   "imported": [ {scenario record}, ... ],
//!   "local_scenarios": { "<identity>": { "name": "...", "data": {scenario record} } }
//! }
//! ```
//!
//! `recents` and `imported` are newest first and deduplicated by identity.
//! `local_scenarios` keeps insertion order; renaming moves an entry to the end.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::directions::Directions;
use crate::history::StoreError;
use crate::identity::ScenarioIdentity;
use crate::naming::auto_name;
use crate::record::ScenarioRecord;

/// Current library file version.
pub const LIBRARY_VERSION: u32 = 2;

/// Entries kept in `recents` and in `imported`.
pub const DEFAULT_MAX_RECENTS: usize = 30;

/// Name given to a local scenario saved without one.
pub const DEFAULT_LOCAL_NAME: &str = "New Scenario";

/// A scenario saved to the local library under a user-chosen name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalScenario {
    pub identity: ScenarioIdentity,
    pub name: String,
    pub data: ScenarioRecord,
}

impl LocalScenario {
    pub fn new(name: impl Into<String>, data: ScenarioRecord) -> Self {
        Self {
            identity: ScenarioIdentity::of(&data),
            name: name.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
struct LibraryFile<'a> {
    version: u32,
    recents: &'a [ScenarioRecord],
    imported: &'a [ScenarioRecord],
    #[serde(serialize_with = "local_map::serialize")]
    local_scenarios: &'a [LocalScenario],
}

/// On-disk layout as read back. List entries stay untyped until each one
/// is checked, so one bad record cannot take the rest of the file with it.
#[derive(Debug, Default, Deserialize)]
struct StoredLibrary {
    #[serde(default)]
    version: u32,

    #[serde(default)]
    recents: Vec<serde_json::Value>,

    #[serde(default)]
    imported: Vec<serde_json::Value>,

    #[serde(default, deserialize_with = "local_map::deserialize")]
    local_scenarios: Vec<LocalScenario>,
}

/// The library file plus its in-memory contents.
#[derive(Debug, Clone)]
pub struct ScenarioLibrary {
    path: PathBuf,
    recents: Vec<ScenarioRecord>,
    imported: Vec<ScenarioRecord>,
    local: Vec<LocalScenario>,
    max_recents: usize,
}

impl ScenarioLibrary {
    /// Load the library at `path`.
    ///
    /// A missing file yields the factory presets. A file that fails to parse
    /// is logged and replaced by an empty library on the next save.
    pub fn load(path: impl AsRef<Path>, max_recents: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let max_recents = max_recents.max(1);

        if !path.exists() {
            return Ok(Self {
                path,
                recents: Vec::new(),
                imported: Vec::new(),
                local: factory_presets(),
                max_recents,
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| StoreError::IoError {
            path: path.clone(),
            source: e,
        })?;

        let file: StoredLibrary = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Scenario library unreadable, using defaults");
                StoredLibrary {
                    version: LIBRARY_VERSION,
                    ..Default::default()
                }
            }
        };

        if file.version < LIBRARY_VERSION {
            info!(
                path = %path.display(),
                from = file.version,
                to = LIBRARY_VERSION,
                "Upgrading scenario library"
            );
        }

        let recents = parse_records(&path, "recents", file.recents);
        let imported = parse_records(&path, "imported", file.imported);

        Ok(Self {
            path,
            recents,
            imported,
            local: file.local_scenarios,
            max_recents,
        })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file = LibraryFile {
            version: LIBRARY_VERSION,
            recents: &self.recents,
            imported: &self.imported,
            local_scenarios: &self.local,
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Move `record` to the top of the recents list and save.
    pub fn add_recent(&mut self, record: &ScenarioRecord) -> Result<(), StoreError> {
        push_front_unique(&mut self.recents, record, self.max_recents);
        self.save()
    }

    /// Move `record` to the top of the imported list and save.
    pub fn add_imported(&mut self, record: &ScenarioRecord) -> Result<(), StoreError> {
        push_front_unique(&mut self.imported, record, self.max_recents);
        self.save()
    }

    /// Save `record` to the local library. An existing entry with the same
    /// identity is overwritten in place.
    pub fn save_local(
        &mut self,
        record: &ScenarioRecord,
        name: Option<&str>,
    ) -> Result<(), StoreError> {
        let entry = LocalScenario::new(name.unwrap_or(DEFAULT_LOCAL_NAME), record.clone());
        match self.local.iter_mut().find(|e| e.identity == entry.identity) {
            Some(existing) => *existing = entry,
            None => self.local.push(entry),
        }
        self.save()
    }

    /// Rename a local scenario, moving it to the end of the list. Saves it
    /// first if it was not local yet.
    pub fn rename_local(&mut self, record: &ScenarioRecord, new_name: &str) -> Result<(), StoreError> {
        let identity = ScenarioIdentity::of(record);
        self.local.retain(|e| e.identity != identity);
        self.local.push(LocalScenario::new(new_name, record.clone()));
        self.save()
    }

    /// Remove a local scenario. Returns whether anything was removed.
    pub fn delete_local(&mut self, record: &ScenarioRecord) -> Result<bool, StoreError> {
        let identity = ScenarioIdentity::of(record);
        let before = self.local.len();
        self.local.retain(|e| e.identity != identity);
        if self.local.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn is_local(&self, record: &ScenarioRecord) -> bool {
        self.find_local(&ScenarioIdentity::of(record)).is_some()
    }

    pub fn find_local(&self, identity: &ScenarioIdentity) -> Option<&LocalScenario> {
        self.local.iter().find(|e| &e.identity == identity)
    }

    /// Name to show for a scenario: its own name, then the local library
    /// name for its identity, then the generated name.
    pub fn display_name(&self, record: &ScenarioRecord) -> String {
        if let Some(name) = record.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.find_local(&ScenarioIdentity::of(record)) {
            Some(entry) => entry.name.clone(),
            None => auto_name(record),
        }
    }

    pub fn recents(&self) -> &[ScenarioRecord] {
        &self.recents
    }

    pub fn imported(&self) -> &[ScenarioRecord] {
        &self.imported
    }

    pub fn local_scenarios(&self) -> &[LocalScenario] {
        &self.local
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_records(path: &Path, list: &str, entries: Vec<serde_json::Value>) -> Vec<ScenarioRecord> {
    let total = entries.len();
    let records: Vec<ScenarioRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if records.len() < total {
        warn!(
            path = %path.display(),
            list,
            skipped = total - records.len(),
            "Skipped malformed scenario records"
        );
    }

    records
}

fn push_front_unique(list: &mut Vec<ScenarioRecord>, record: &ScenarioRecord, cap: usize) {
    let identity = ScenarioIdentity::of(record);
    list.retain(|existing| ScenarioIdentity::of(existing) != identity);
    list.insert(0, record.clone());
    list.truncate(cap);
}

/// Starter scenarios placed in a fresh library.
pub fn factory_presets() -> Vec<LocalScenario> {
    let preset = |name: &str, start: f64, end: f64, tolerance: f64, directions: Directions| {
        let mut record = ScenarioRecord::flat(start, end, tolerance, 10.0)
            .with_directions(directions)
            .with_warmup(1.0);
        record.zoom_scale = Some(2.0);
        LocalScenario::new(name, record)
    };

    vec![
        preset("Standard Horizontal", 500.0, 500.0, 75.0, Directions::HORIZONTAL),
        preset("Micro Control", 150.0, 150.0, 20.0, Directions::ALL),
        preset("Vertical Speed", 500.0, 500.0, 100.0, Directions::VERTICAL),
        preset("Accel Ramp Test", 100.0, 1000.0, 100.0, Directions::HORIZONTAL),
    ]
}

#[derive(Deserialize)]
struct ScenarioWrapper {
    name: String,
    data: ScenarioRecord,
}

/// Read a scenario file.
///
/// Accepts either a bare scenario record or a `{"name": ..., "data": {...}}`
/// wrapper; a wrapper's name is applied when the record has none.
pub fn load_scenario_file(path: &Path) -> Result<ScenarioRecord, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let is_wrapper = value.get("data").is_some() && value.get("name").is_some();
    let parsed = if is_wrapper {
        serde_json::from_value::<ScenarioWrapper>(value).map(|wrapper| {
            let mut record = wrapper.data;
            record.name.get_or_insert(wrapper.name);
            record
        })
    } else {
        serde_json::from_value(value)
    };

    parsed.map_err(|e| StoreError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load every `*.json` scenario in `dir`, sorted by file name. Files that
/// fail to load are logged and skipped.
pub fn load_scenario_dir(dir: &Path) -> Result<Vec<ScenarioRecord>, StoreError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| StoreError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter_map(|path| match load_scenario_file(path) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Skipping scenario file");
                None
            }
        })
        .collect())
}

/// `local_scenarios` is a JSON object keyed by identity, kept in insertion
/// order. Identities are recomputed from the data on load so files written
/// under an older hash scheme re-key themselves.
mod local_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tracing::warn;

    use super::LocalScenario;
    use crate::record::ScenarioRecord;

    #[derive(Serialize)]
    struct EntryRef<'a> {
        name: &'a str,
        data: &'a ScenarioRecord,
    }

    #[derive(Deserialize)]
    struct EntryOwned {
        name: String,
        data: ScenarioRecord,
    }

    pub fn serialize<S: Serializer>(entries: &[LocalScenario], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in entries {
            map.serialize_entry(
                entry.identity.as_str(),
                &EntryRef {
                    name: &entry.name,
                    data: &entry.data,
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<LocalScenario>, D::Error> {
        deserializer.deserialize_map(OrderedVisitor)
    }

    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<LocalScenario>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of scenario identities to named scenarios")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries: Vec<LocalScenario> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                match serde_json::from_value::<EntryOwned>(value) {
                    Ok(entry) => {
                        let entry = LocalScenario::new(entry.name, entry.data);
                        entries.retain(|e| e.identity != entry.identity);
                        entries.push(entry);
                    }
                    Err(e) => warn!(key = %key, error = %e, "Skipping unreadable local scenario"),
                }
            }
            Ok(entries)
        }
    }
}
