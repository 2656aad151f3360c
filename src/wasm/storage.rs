use web_sys::Storage;

use crate::session::{KeyValueStore, MemoryStore};

/// `localStorage`, or process memory when the browser refuses access
/// (private mode, disabled storage).
pub enum BrowserStore {
    Local(Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().and_then(|window| window.local_storage().ok().flatten()) {
            Some(storage) => BrowserStore::Local(storage),
            None => {
                gloo::console::warn!("storage: localStorage unavailable, state will not persist");
                BrowserStore::Memory(MemoryStore::default())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).ok().flatten(),
            BrowserStore::Memory(memory) => memory.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            BrowserStore::Local(storage) => {
                if storage.set_item(key, value).is_err() {
                    gloo::console::warn!("storage: write failed", key);
                }
            }
            BrowserStore::Memory(memory) => memory.set(key, value),
        }
    }

    fn remove(&self, key: &str) {
        match self {
            BrowserStore::Local(storage) => {
                let _ = storage.remove_item(key);
            }
            BrowserStore::Memory(memory) => memory.remove(key),
        }
    }
}
