use serde::{de::DeserializeOwned, Serialize};
use web_sys::window;

/// Origin-scoped string key-value storage. The browser implementations
/// wrap localStorage/sessionStorage; tests run against an in-memory map.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StorageArea {
    Local,
    Session,
}

pub struct BrowserStore {
    area: StorageArea,
}

impl BrowserStore {
    /// Persisted across browser sessions (token, user record).
    pub fn local() -> Self {
        Self {
            area: StorageArea::Local,
        }
    }

    /// Scoped to the current browser session (pending drafts, chat id).
    pub fn session() -> Self {
        Self {
            area: StorageArea::Session,
        }
    }

    fn raw(&self) -> Option<web_sys::Storage> {
        let win = window()?;
        match self.area {
            StorageArea::Local => win.local_storage().ok().flatten(),
            StorageArea::Session => win.session_storage().ok().flatten(),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.raw()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match self.raw() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("⚠️ Failed to write '{}' to browser storage", key);
                }
            }
            None => log::warn!("⚠️ Browser storage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.raw() {
            let _ = storage.remove_item(key);
        }
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string(value).map_err(|e| format!("Error serializing '{}': {}", key, e))?;
    store.set(key, &json);
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    serde_json::from_str(&json).ok()
}

#[cfg(test)]
pub mod memory {
    use super::KeyValueStore;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory stand-in for browser storage.
    #[derive(Default)]
    pub struct MemoryStore {
        map: RefCell<HashMap<String, String>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.map.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.map.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.map.borrow_mut().remove(key);
        }
    }
}
