//! Persisted string endpoints.
//!
//! One storage key holds a JSON array of `{a, b}` records in creation order.
//! Persistence is best effort: failures are logged and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Endpoints of one drawn string; replaying them rebuilds the string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredString {
    pub a: Point,
    pub b: Point,
}

pub fn encode(strings: &[StoredString]) -> Option<String> {
    match serde_json::to_string(strings) {
        Ok(raw) => Some(raw),
        Err(err) => {
            log::warn!("spaghetti store: encode failed: {}", err);
            None
        }
    }
}

/// Missing, empty or malformed data decodes to no strings.
pub fn decode(raw: Option<&str>) -> Vec<StoredString> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<StoredString>>>(raw) {
        Ok(strings) => strings.unwrap_or_default(),
        Err(err) => {
            log::warn!("spaghetti store: ignoring malformed data: {}", err);
            Vec::new()
        }
    }
}

pub trait StringStore {
    fn load(&self) -> Vec<StoredString>;
    fn save(&mut self, strings: &[StoredString]);
    fn clear(&mut self);

    fn append(&mut self, string: StoredString) {
        let mut strings = self.load();
        strings.push(string);
        self.save(&strings);
    }
}

/// In-process store holding the encoded text. Clones share the same slot,
/// so a store can outlive the board that wrote to it.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self { raw: Rc::new(RefCell::new(Some(raw.to_string()))) }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl StringStore for MemoryStore {
    fn load(&self) -> Vec<StoredString> {
        decode(self.raw.borrow().as_deref())
    }

    fn save(&mut self, strings: &[StoredString]) {
        if let Some(raw) = encode(strings) {
            *self.raw.borrow_mut() = Some(raw);
        }
    }

    fn clear(&mut self) {
        *self.raw.borrow_mut() = None;
    }
}

/// `window.localStorage` under a fixed key.
#[derive(Clone, Debug)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("spaghetti store: local storage unavailable");
        }
        storage
    }
}

impl StringStore for LocalStorageStore {
    fn load(&self) -> Vec<StoredString> {
        let Some(storage) = self.storage() else {
            return Vec::new();
        };
        let raw = storage.get_item(&self.key).ok().flatten();
        decode(raw.as_deref())
    }

    fn save(&mut self, strings: &[StoredString]) {
        let (Some(storage), Some(raw)) = (self.storage(), encode(strings)) else {
            return;
        };
        if storage.set_item(&self.key, &raw).is_err() {
            log::warn!("spaghetti store: write to '{}' failed", self.key);
        }
    }

    fn clear(&mut self) {
        if let Some(storage) = self.storage() {
            if storage.remove_item(&self.key).is_err() {
                log::warn!("spaghetti store: clearing '{}' failed", self.key);
            }
        }
    }
}
