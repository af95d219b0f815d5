//! Data store for cities, address records and the global checklist.
//!
//! Every operation reads the whole collection it touches, mutates it and
//! writes the whole collection back. Storage failures and malformed values
//! are logged and treated as empty; no operation returns an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::checklist;
use crate::db::KeyValueStore;
use crate::error::AppError;
use crate::events::{EventBus, StoreEvent, SubscriptionId};
use crate::models::{
    city_prefix, record_key, AddressRecord, Checklist, ChecklistCategory, City, Photo, Platform,
    ProfitabilityData,
};
use crate::profitability;

pub const CITIES_KEY: &str = "cities";
pub const GLOBAL_CHECKLIST_KEY: &str = "globalChecklist";
pub const ADDRESS_DATA_KEY: &str = "addressData";

type AddressData = BTreeMap<String, AddressRecord>;

pub struct DataStore<S: KeyValueStore> {
    storage: S,
    events: EventBus,
    default_platforms: Vec<String>,
    // Serializes read-modify-write cycles across command threads.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> DataStore<S> {
    pub fn new(storage: S, default_platforms: Vec<String>) -> Self {
        let store = DataStore {
            storage,
            events: EventBus::new(),
            default_platforms,
            write_lock: Mutex::new(()),
        };
        store.ensure_initialized();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Seeds each top-level collection that is absent. Safe to call repeatedly.
    pub fn ensure_initialized(&self) {
        let _guard = self.lock();

        if self.read_raw(CITIES_KEY).is_none() {
            self.write(CITIES_KEY, &Vec::<City>::new());
        }
        if self.read_raw(GLOBAL_CHECKLIST_KEY).is_none() {
            info!("seeding default global checklist");
            self.write(GLOBAL_CHECKLIST_KEY, &checklist::default_template());
        }
        if self.read_raw(ADDRESS_DATA_KEY).is_none() {
            self.write(ADDRESS_DATA_KEY, &AddressData::new());
        }
    }

    // ----- cities -----

    pub fn list_cities(&self) -> Vec<City> {
        self.read(CITIES_KEY).unwrap_or_default()
    }

    pub fn add_city(&self, name: &str) {
        let inserted = {
            let _guard = self.lock();
            self.insert_city(name)
        };

        if inserted {
            self.events.emit(StoreEvent::CityAdded {
                city: name.to_string(),
            });
        }
    }

    pub fn delete_city(&self, name: &str) {
        let existed = {
            let _guard = self.lock();

            let mut cities = self.list_cities();
            let before = cities.len();
            cities.retain(|city| city.name != name);
            let existed = cities.len() != before;
            if existed {
                self.write(CITIES_KEY, &cities);
            }

            // A remaining city named e.g. "Lyon:Nord" shares the "Lyon:" prefix;
            // its records stay.
            let kept: HashSet<String> = cities
                .iter()
                .flat_map(|city| city.addresses.iter().map(|a| record_key(&city.name, a)))
                .collect();

            let prefix = city_prefix(name);
            let mut records = self.address_data();
            let before = records.len();
            records.retain(|key, _| !key.starts_with(&prefix) || kept.contains(key));
            if records.len() != before {
                debug!(city = name, removed = before - records.len(), "removed address records");
                self.write(ADDRESS_DATA_KEY, &records);
            }

            existed
        };

        if existed {
            self.events.emit(StoreEvent::CityDeleted {
                city: name.to_string(),
            });
        }
    }

    // ----- addresses -----

    pub fn list_addresses(&self, city: &str) -> Vec<String> {
        self.list_cities()
            .into_iter()
            .find(|c| c.name == city)
            .map(|c| c.addresses)
            .unwrap_or_default()
    }

    /// Creates the city when missing. The address appears at most once in
    /// the city's list whichever path is taken.
    pub fn add_address(&self, city: &str, address: &str) {
        let city_created = {
            let _guard = self.lock();

            let city_created = self.insert_city(city);

            let mut cities = self.list_cities();
            if let Some(entry) = cities.iter_mut().find(|c| c.name == city) {
                if !entry.addresses.iter().any(|a| a == address) {
                    entry.addresses.push(address.to_string());
                    self.write(CITIES_KEY, &cities);
                }
            }

            self.ensure_record(city, address);
            city_created
        };

        if city_created {
            self.events.emit(StoreEvent::CityAdded {
                city: city.to_string(),
            });
        }
    }

    pub fn delete_address(&self, city: &str, address: &str) {
        let changed = {
            let _guard = self.lock();
            let mut changed = false;

            let mut cities = self.list_cities();
            if let Some(entry) = cities.iter_mut().find(|c| c.name == city) {
                let before = entry.addresses.len();
                entry.addresses.retain(|a| a != address);
                if entry.addresses.len() != before {
                    self.write(CITIES_KEY, &cities);
                    changed = true;
                }
            }

            let mut records = self.address_data();
            if records.remove(&record_key(city, address)).is_some() {
                self.write(ADDRESS_DATA_KEY, &records);
                changed = true;
            }

            changed
        };

        if changed {
            self.events.emit(StoreEvent::AddressDeleted {
                city: city.to_string(),
                address: address.to_string(),
            });
        }
    }

    // ----- address records -----

    /// Returns the stored record, creating and persisting a default one the
    /// first time an address is read.
    pub fn get_address_record(&self, city: &str, address: &str) -> AddressRecord {
        let _guard = self.lock();
        self.ensure_record(city, address)
    }

    pub fn update_profitability(&self, city: &str, address: &str, data: ProfitabilityData) {
        self.modify_record(city, address, |record| record.profitability = data);
    }

    pub fn update_checklist(&self, city: &str, address: &str, data: Checklist) {
        self.modify_record(city, address, |record| record.checklist = data);
    }

    pub fn update_photos(&self, city: &str, address: &str, photos: Vec<Photo>) {
        self.modify_record(city, address, |record| record.photos = photos);
    }

    /// Recomputes derived profitability fields, writing only when a value
    /// changed. Returns the current data, or `None` if there is no record.
    pub fn recalculate_profitability(&self, city: &str, address: &str) -> Option<ProfitabilityData> {
        let _guard = self.lock();

        let key = record_key(city, address);
        let mut records = self.address_data();
        let record = records.get_mut(&key)?;

        if profitability::refresh(&mut record.profitability) {
            let data = record.profitability.clone();
            self.write(ADDRESS_DATA_KEY, &records);
            return Some(data);
        }

        Some(record.profitability.clone())
    }

    pub fn toggle_checklist_item(
        &self,
        city: &str,
        address: &str,
        category_id: &str,
        item_id: &str,
    ) -> Option<Checklist> {
        let _guard = self.lock();

        let mut records = self.address_data();
        let record = records.get_mut(&record_key(city, address))?;
        if !checklist::toggle_item(&mut record.checklist.categories, category_id, item_id) {
            return None;
        }

        let updated = record.checklist.clone();
        self.write(ADDRESS_DATA_KEY, &records);
        Some(updated)
    }

    pub fn add_photo(&self, city: &str, address: &str, url: &str, caption: &str) -> Option<Photo> {
        let photo = Photo {
            id: format!("photo-{}", Uuid::new_v4().simple()),
            url: url.to_string(),
            caption: caption.to_string(),
        };

        let added = self.modify_record(city, address, |record| record.photos.push(photo.clone()));
        added.then_some(photo)
    }

    /// Looks a photo up without creating the record.
    pub fn find_photo(&self, city: &str, address: &str, photo_id: &str) -> Option<Photo> {
        self.address_data()
            .remove(&record_key(city, address))?
            .photos
            .into_iter()
            .find(|photo| photo.id == photo_id)
    }

    pub fn remove_photo(&self, city: &str, address: &str, photo_id: &str) -> bool {
        let _guard = self.lock();

        let mut records = self.address_data();
        let Some(record) = records.get_mut(&record_key(city, address)) else {
            return false;
        };

        let before = record.photos.len();
        record.photos.retain(|photo| photo.id != photo_id);
        if record.photos.len() == before {
            return false;
        }

        self.write(ADDRESS_DATA_KEY, &records);
        true
    }

    pub fn update_photo_caption(&self, city: &str, address: &str, photo_id: &str, caption: &str) -> bool {
        let _guard = self.lock();

        let mut records = self.address_data();
        let photo = records
            .get_mut(&record_key(city, address))
            .and_then(|record| record.photos.iter_mut().find(|p| p.id == photo_id));

        match photo {
            Some(photo) => {
                photo.caption = caption.to_string();
                self.write(ADDRESS_DATA_KEY, &records);
                true
            }
            None => false,
        }
    }

    // ----- global checklist -----

    pub fn get_global_checklist(&self) -> Vec<ChecklistCategory> {
        let _guard = self.lock();
        self.global_checklist()
    }

    /// Replaces the template and overwrites every address checklist with a
    /// fresh, uncompleted copy of it.
    pub fn update_global_checklist(&self, categories: Vec<ChecklistCategory>) {
        {
            let _guard = self.lock();

            self.write(GLOBAL_CHECKLIST_KEY, &checklist::strip_completion(&categories));

            let mut records = self.address_data();
            for record in records.values_mut() {
                record.checklist = Checklist {
                    categories: checklist::reset_copy(&categories),
                };
            }
            info!(records = records.len(), "propagated global checklist");
            self.write(ADDRESS_DATA_KEY, &records);
        }

        self.events.emit(StoreEvent::GlobalChecklistUpdated);
    }

    // ----- internals -----

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn global_checklist(&self) -> Vec<ChecklistCategory> {
        if let Some(categories) = self.read::<Vec<ChecklistCategory>>(GLOBAL_CHECKLIST_KEY) {
            return categories;
        }

        info!("seeding default global checklist");
        let template = checklist::default_template();
        self.write(GLOBAL_CHECKLIST_KEY, &template);
        template
    }

    fn insert_city(&self, name: &str) -> bool {
        let mut cities = self.list_cities();
        if cities.iter().any(|city| city.name == name) {
            return false;
        }

        cities.push(City::new(name));
        self.write(CITIES_KEY, &cities);
        true
    }

    fn default_record(&self) -> AddressRecord {
        AddressRecord {
            profitability: ProfitabilityData {
                monthly_rent: 0.0,
                platforms: self
                    .default_platforms
                    .iter()
                    .map(|name| Platform::placeholder(name))
                    .collect(),
            },
            checklist: Checklist {
                categories: checklist::reset_copy(&self.global_checklist()),
            },
            photos: Vec::new(),
        }
    }

    fn ensure_record(&self, city: &str, address: &str) -> AddressRecord {
        let key = record_key(city, address);
        let mut records = self.address_data();

        if let Some(record) = records.get(&key) {
            return record.clone();
        }

        debug!(city, address, "creating address record");
        let record = self.default_record();
        records.insert(key, record.clone());
        self.write(ADDRESS_DATA_KEY, &records);
        record
    }

    /// Applies `update` to an existing record and persists. Returns false,
    /// without writing, when the record does not exist.
    fn modify_record<F>(&self, city: &str, address: &str, update: F) -> bool
    where
        F: FnOnce(&mut AddressRecord),
    {
        let _guard = self.lock();

        let mut records = self.address_data();
        let Some(record) = records.get_mut(&record_key(city, address)) else {
            debug!(city, address, "no address record to update");
            return false;
        };

        update(record);
        self.write(ADDRESS_DATA_KEY, &records);
        true
    }

    /// Decodes records one by one so a single malformed entry is dropped
    /// without emptying the rest of the map.
    fn address_data(&self) -> AddressData {
        let Some(raw) = self.read::<BTreeMap<String, serde_json::Value>>(ADDRESS_DATA_KEY) else {
            return AddressData::new();
        };

        raw.into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<AddressRecord>(value) {
                Ok(record) => Some((key, record)),
                Err(e) => {
                    warn!(key = %key, error = %e, "dropping malformed address record");
                    None
                }
            })
            .collect()
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "malformed value in storage");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(AppError::from)
            .and_then(|json| self.storage.set(key, &json));

        if let Err(e) = result {
            warn!(key, error = %e, "storage write failed");
        }
    }
}
