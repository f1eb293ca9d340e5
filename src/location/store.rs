//! Location storage.
//!
//! `LocationStore` is the seam the workflow talks to. `JsonLocationStore`
//! keeps every record in one JSON file (default
//! ~/.event-locations/locations.json) or purely in memory.

use super::types::{Location, LocationFilter, LocationId, NewLocation, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Query, load and persist location records.
pub trait LocationStore {
    /// Ids of all records matching `filter`, ascending by id unless the
    /// filter asks for newest first.
    fn query(&self, filter: &LocationFilter) -> Result<Vec<LocationId>, StoreError>;

    fn load(&self, id: LocationId) -> Result<Location, StoreError>;

    /// Load several records; ids that do not exist are skipped.
    fn load_many(&self, ids: &[LocationId]) -> Result<Vec<Location>, StoreError>;

    /// All records of a bundle, active or not.
    fn load_by_type(&self, bundle: &str) -> Result<Vec<Location>, StoreError>;

    /// Build a new record with a fresh id and creation time. Nothing is
    /// persisted until [`save`](Self::save) is called.
    fn create(&mut self, fields: NewLocation) -> Result<Location, StoreError>;

    fn save(&mut self, location: &Location) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    next_id: u64,
    #[serde(default)]
    locations: Vec<Location>,
}

/// The JSON-file location store.
pub struct JsonLocationStore {
    path: Option<PathBuf>,
    next_id: u64,
    locations: BTreeMap<LocationId, Location>,
}

impl JsonLocationStore {
    /// Open the store at the default path (~/.event-locations/locations.json).
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path())
    }

    /// Open the store backed by `path`. A missing file is an empty store.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let file = Self::read_file(&path)?;
        debug!(path = %path.display(), count = file.locations.len(), "opened location store");
        Ok(Self::from_file(Some(path), file))
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::from_file(None, StoreFile::default())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".event-locations")
            .join("locations.json")
    }

    fn from_file(path: Option<PathBuf>, file: StoreFile) -> Self {
        let locations: BTreeMap<_, _> = file.locations.into_iter().map(|l| (l.id, l)).collect();
        let max_id = locations.keys().next_back().map_or(0, |id| id.0);
        Self {
            path,
            next_id: file.next_id.max(max_id + 1),
            locations,
        }
    }

    fn read_file(path: &Path) -> Result<StoreFile, StoreError> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `locations` to disk. Memory is left alone; callers commit
    /// only after this succeeds.
    fn persist(&self, locations: &BTreeMap<LocationId, Location>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            next_id: self.next_id,
            locations: locations.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        // Replace atomically: write a sibling file, then rename over.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Number of saved records.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationStore for JsonLocationStore {
    fn query(&self, filter: &LocationFilter) -> Result<Vec<LocationId>, StoreError> {
        let mut matched: Vec<&Location> = self.locations.values().filter(|l| filter.matches(l)).collect();
        if filter.newest_first {
            matched.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        }
        Ok(matched.into_iter().map(|l| l.id).collect())
    }

    fn load(&self, id: LocationId) -> Result<Location, StoreError> {
        self.locations
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn load_many(&self, ids: &[LocationId]) -> Result<Vec<Location>, StoreError> {
        Ok(ids.iter().filter_map(|id| self.locations.get(id).cloned()).collect())
    }

    fn load_by_type(&self, bundle: &str) -> Result<Vec<Location>, StoreError> {
        Ok(self
            .locations
            .values()
            .filter(|l| l.bundle == bundle)
            .cloned()
            .collect())
    }

    fn create(&mut self, fields: NewLocation) -> Result<Location, StoreError> {
        let id = LocationId(self.next_id);
        self.next_id += 1;
        Ok(Location {
            id,
            bundle: fields.bundle,
            title: fields.title,
            address: fields.address,
            active: fields.active,
            created_at: Utc::now(),
        })
    }

    fn save(&mut self, location: &Location) -> Result<(), StoreError> {
        let mut updated = self.locations.clone();
        updated.insert(location.id, location.clone());
        self.persist(&updated)?;
        self.locations = updated;
        debug!(id = %location.id, title = %location.title, "saved location");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use tempfile::TempDir;

    fn test_store() -> (JsonLocationStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locations.json");
        (JsonLocationStore::open(path).unwrap(), dir)
    }

    fn new_location(title: &str, active: bool) -> NewLocation {
        NewLocation {
            bundle: "event_location".into(),
            title: title.into(),
            address: Address {
                country_code: "SE".into(),
                locality: title.into(),
                ..Default::default()
            },
            active,
        }
    }

    #[test]
    fn test_create_does_not_persist() {
        let (mut store, _dir) = test_store();
        let loc = store.create(new_location("Stockholm", true)).unwrap();
        assert_eq!(loc.id, LocationId(1));
        assert!(store.is_empty());
        assert!(matches!(store.load(loc.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let (mut store, _dir) = test_store();
        let loc = store.create(new_location("Stockholm", true)).unwrap();
        store.save(&loc).unwrap();

        let loaded = store.load(loc.id).unwrap();
        assert_eq!(loaded, loc);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("locations.json");

        let id = {
            let mut store = JsonLocationStore::open(path.clone()).unwrap();
            let loc = store.create(new_location("Tromsø", true)).unwrap();
            store.save(&loc).unwrap();
            loc.id
        };

        let mut store = JsonLocationStore::open(path).unwrap();
        assert_eq!(store.load(id).unwrap().title, "Tromsø");
        // ids keep increasing across reopen
        let next = store.create(new_location("Oslo", true)).unwrap();
        assert!(next.id > id);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonLocationStore::open(path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("locations.json");
        let mut store = JsonLocationStore::open(path.clone()).unwrap();
        // a plain file where the store directory should be
        fs::write(dir.path().join("sub"), "").unwrap();

        let loc = store.create(new_location("Stockholm", true)).unwrap();
        assert!(matches!(store.save(&loc), Err(StoreError::Io(_))));
        assert!(store.is_empty());
        assert!(matches!(store.load(loc.id), Err(StoreError::NotFound(_))));
        assert!(store.query(&LocationFilter::default()).unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_query_filters_and_sorts() {
        let mut store = JsonLocationStore::in_memory();
        for (title, active) in [("First", true), ("Hidden", false), ("Second", true)] {
            let loc = store.create(new_location(title, active)).unwrap();
            store.save(&loc).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let filter = LocationFilter::default()
            .bundle("event_location")
            .active(true)
            .newest_first();
        let ids = store.query(&filter).unwrap();
        let titles: Vec<_> = store
            .load_many(&ids)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);

        let all = store.query(&LocationFilter::default()).unwrap();
        assert_eq!(all, vec![LocationId(1), LocationId(2), LocationId(3)]);
    }

    #[test]
    fn test_load_by_type_includes_inactive() {
        let mut store = JsonLocationStore::in_memory();
        for (title, active) in [("A", true), ("B", false)] {
            let loc = store.create(new_location(title, active)).unwrap();
            store.save(&loc).unwrap();
        }
        assert_eq!(store.load_by_type("event_location").unwrap().len(), 2);
        assert!(store.load_by_type("page").unwrap().is_empty());
    }

    #[test]
    fn test_load_many_skips_missing() {
        let mut store = JsonLocationStore::in_memory();
        let loc = store.create(new_location("A", true)).unwrap();
        store.save(&loc).unwrap();
        let loaded = store.load_many(&[loc.id, LocationId(99)]).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("42".parse::<LocationId>().unwrap(), LocationId(42));
        assert!(matches!("abc".parse::<LocationId>(), Err(StoreError::NotFound(s)) if s == "abc"));
    }
}
