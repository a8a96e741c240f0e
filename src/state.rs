// Shared state managed by Tauri.
// Tauri hands state to commands and callbacks on any thread, so each piece
// sits behind a lock even though events arrive one at a time.

use std::sync::{Mutex, RwLock};

use crate::modules::credentials::CredentialStore;
use crate::modules::tabs::TabManager;
use crate::settings::Settings;

pub struct AppState {
    pub settings: RwLock<Settings>,
    pub tabs: Mutex<TabManager>,
    pub credentials: Mutex<CredentialStore>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            tabs: Mutex::new(TabManager::new()),
            credentials: Mutex::new(CredentialStore::new()),
        }
    }
}
