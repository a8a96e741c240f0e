// IPC commands invoked by the bundled toolbar and dialog pages.
//
// Commands that can create a window or webview are async so they run off
// the main thread; creating webviews from a synchronous command deadlocks
// on Windows.

use tauri::{AppHandle, State};

use crate::browser::{self, BrowserEvent};
use crate::dialogs;
use crate::modules::credentials::Credential;
use crate::modules::shortcuts::{self, Shortcut};
use crate::modules::tabs::TabsPayload;
use crate::state::AppState;

#[tauri::command]
pub fn navigate(app: AppHandle, input: String) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::AddressEntered(input))
}

#[tauri::command]
pub fn go_back(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::Back)
}

#[tauri::command]
pub fn go_forward(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::Forward)
}

#[tauri::command]
pub fn reload(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::Reload)
}

#[tauri::command]
pub fn go_home(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::Home)
}

#[tauri::command]
pub fn list_shortcuts() -> Vec<Shortcut> {
    shortcuts::SHORTCUTS.to_vec()
}

#[tauri::command]
pub fn open_shortcut(app: AppHandle, name: String) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::ShortcutSelected(name))
}

#[tauri::command]
pub async fn new_tab(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::NewTab)
}

#[tauri::command]
pub fn close_tab(app: AppHandle, index: usize) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::CloseTab(index))
}

#[tauri::command]
pub fn select_tab(app: AppHandle, index: usize) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::SelectTab(index))
}

#[tauri::command]
pub fn get_tabs(state: State<'_, AppState>) -> Result<TabsPayload, String> {
    Ok(state.tabs.lock().map_err(|e| e.to_string())?.payload())
}

#[tauri::command]
pub async fn toggle_save_password(app: AppHandle, enabled: bool) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::SavePasswordToggled(enabled))
}

#[tauri::command]
pub async fn show_credential_history(app: AppHandle) -> Result<(), String> {
    browser::dispatch(&app, BrowserEvent::ShowCredentialHistory)
}

/// Returns whether the pair was stored. Empty fields are dropped silently.
#[tauri::command]
pub fn save_credentials(
    app: AppHandle,
    state: State<'_, AppState>,
    identifier: String,
    secret: String,
) -> Result<bool, String> {
    let (saved, count) = {
        let mut store = state.credentials.lock().map_err(|e| e.to_string())?;
        let saved = store.add(identifier, secret);
        (saved, store.len())
    };

    if saved {
        log::info!("[Credentials] Saved entry #{}", count);
        dialogs::inform(
            &app,
            "Success",
            "Credentials saved successfully. You are trusting Ripe Browser.",
        );
    }
    Ok(saved)
}

#[tauri::command]
pub fn list_credentials(state: State<'_, AppState>) -> Result<Vec<Credential>, String> {
    Ok(state
        .credentials
        .lock()
        .map_err(|e| e.to_string())?
        .list_all()
        .to_vec())
}
