// Event dispatcher and tab webview plumbing.
//
// Every toolbar click, menu item and keyboard shortcut becomes a
// `BrowserEvent` and goes through `dispatch`. Engine callbacks (page loads,
// downloads) come in through the handlers installed on each tab webview.
//
// Invariant: no state lock is held while calling into a webview, since
// the engine may answer with a callback that needs the same lock.

use serde::Serialize;
use std::path::PathBuf;
use tauri::webview::{DownloadEvent, PageLoadEvent, PageLoadPayload};
use tauri::{
    AppHandle, Emitter, Manager, PhysicalPosition, PhysicalSize, Runtime, Webview, WebviewBuilder,
    WebviewUrl, Window, Wry,
};
use tauri_plugin_opener::OpenerExt;
use url::Url;

use crate::dialogs;
use crate::modules::downloads::{DownloadError, DownloadRequest};
use crate::modules::navigation::{self, NavCommand, PageView};
use crate::modules::shortcuts;
use crate::modules::tabs::CloseOutcome;
use crate::state::AppState;

pub const MAIN_WINDOW: &str = "main";

// Toolbar row + tab strip, in logical pixels.
const TOOLBAR_HEIGHT_LOGICAL: f64 = 48.0 + 32.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    AddressEntered(String),
    Back,
    Forward,
    Reload,
    Home,
    ShortcutSelected(String),
    NewTab,
    CloseTab(usize),
    /// Close whichever tab is active (menu accelerator).
    CloseActiveTab,
    SelectTab(usize),
    SavePasswordToggled(bool),
    ShowCredentialHistory,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    pub url: String,
    pub path: Option<String>,
    pub timestamp: String,
    pub success: Option<bool>,
}

impl<R: Runtime> PageView for Webview<R> {
    fn load(&self, url: &str) -> Result<(), String> {
        let target = Url::parse(url).map_err(|e| format!("{}: {}", url, e))?;
        self.navigate(target).map_err(|e| e.to_string())
    }

    fn back(&self) -> Result<(), String> {
        self.eval("window.history.back()").map_err(|e| e.to_string())
    }

    fn forward(&self) -> Result<(), String> {
        self.eval("window.history.forward()").map_err(|e| e.to_string())
    }

    fn reload(&self) -> Result<(), String> {
        self.eval("window.location.reload()").map_err(|e| e.to_string())
    }
}

pub fn dispatch(app: &AppHandle, event: BrowserEvent) -> Result<(), String> {
    log::debug!("[Browser] {:?}", event);
    let state = app.state::<AppState>();

    match event {
        BrowserEvent::AddressEntered(text) => {
            let engine = state.settings.read().map_err(|e| e.to_string())?.search_engine;
            let target = navigation::resolve_address(&text, engine);
            navigate_active(app, &state, NavCommand::Navigate(target))
        }
        BrowserEvent::Back => navigate_active(app, &state, NavCommand::Back),
        BrowserEvent::Forward => navigate_active(app, &state, NavCommand::Forward),
        BrowserEvent::Reload => navigate_active(app, &state, NavCommand::Reload),
        BrowserEvent::Home => {
            let home = state.settings.read().map_err(|e| e.to_string())?.homepage.clone();
            navigate_active(app, &state, NavCommand::Navigate(home))
        }
        BrowserEvent::ShortcutSelected(name) => match shortcuts::lookup(&name) {
            Some(shortcut) => {
                navigate_active(app, &state, NavCommand::Navigate(shortcut.url.to_string()))
            }
            None => {
                log::warn!("[Browser] Unknown shortcut '{}'", name);
                Ok(())
            }
        },
        BrowserEvent::NewTab => {
            let home = state.settings.read().map_err(|e| e.to_string())?.homepage.clone();
            open_tab(app, &home).map(|_| ())
        }
        BrowserEvent::CloseTab(index) => close_tab(app, &state, index),
        BrowserEvent::CloseActiveTab => {
            let active = state.tabs.lock().map_err(|e| e.to_string())?.active_index();
            match active {
                Some(index) => close_tab(app, &state, index),
                None => Ok(()),
            }
        }
        BrowserEvent::SelectTab(index) => select_tab(app, &state, index),
        BrowserEvent::SavePasswordToggled(true) => dialogs::show_password_manager(app),
        BrowserEvent::SavePasswordToggled(false) => Ok(()),
        BrowserEvent::ShowCredentialHistory => dialogs::show_credential_history(app),
    }
}

fn active_view(app: &AppHandle, state: &AppState) -> Result<Option<Webview>, String> {
    let label = state
        .tabs
        .lock()
        .map_err(|e| e.to_string())?
        .active_tab()
        .map(|t| t.webview_label.clone());
    Ok(label.and_then(|l| app.get_webview(&l)))
}

fn navigate_active(app: &AppHandle, state: &AppState, command: NavCommand) -> Result<(), String> {
    let view = active_view(app, state)?;
    if !navigation::dispatch(view.as_ref(), &command) {
        log::debug!("[Browser] No active tab for {:?}", command);
    }
    Ok(())
}

fn emit_tabs(app: &AppHandle, state: &AppState) -> Result<(), String> {
    let payload = state.tabs.lock().map_err(|e| e.to_string())?.payload();
    app.emit_to(MAIN_WINDOW, "update-tabs", payload).map_err(|e| e.to_string())
}

/// Opens `url` in a new tab webview and brings it to the front.
pub fn open_tab(app: &AppHandle, url: &str) -> Result<usize, String> {
    let state = app.state::<AppState>();
    let window = app
        .get_window(MAIN_WINDOW)
        .ok_or_else(|| "main window is gone".to_string())?;
    let target = Url::parse(url).map_err(|e| format!("{}: {}", url, e))?;

    let (label, previous) = {
        let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
        let previous = tabs.active_tab().map(|t| t.webview_label.clone());
        (tabs.allocate_label(), previous)
    };

    let (position, size) = content_bounds(&window)?;
    let webview = window
        .add_child(tab_webview_builder(app, &label, target), position, size)
        .map_err(|e| {
            log::error!("[Tabs] Error creating tab {}: {}", label, e);
            e.to_string()
        })?;

    let index = state
        .tabs
        .lock()
        .map_err(|e| e.to_string())?
        .open_new_tab(label.clone(), url);

    if let Some(old) = previous.and_then(|l| app.get_webview(&l)) {
        let _ = old.hide();
    }
    let _ = webview.show();
    let _ = webview.set_focus();

    log::info!("[Tabs] Opened {} at index {}", label, index);
    emit_tabs(app, &state)?;
    Ok(index)
}

fn close_tab(app: &AppHandle, state: &AppState, index: usize) -> Result<(), String> {
    let outcome = state.tabs.lock().map_err(|e| e.to_string())?.close_tab(index);

    match outcome {
        CloseOutcome::Removed { tab, active } => {
            if let Some(webview) = app.get_webview(&tab.webview_label) {
                webview.close().map_err(|e| e.to_string())?;
            }
            log::info!("[Tabs] Closed {}", tab.webview_label);
            show_only(app, state, active)?;
            emit_tabs(app, state)
        }
        CloseOutcome::CloseWindow => {
            log::info!("[Tabs] Last tab closed, closing window");
            match app.get_window(MAIN_WINDOW) {
                Some(window) => window.close().map_err(|e| e.to_string()),
                None => Ok(()),
            }
        }
        CloseOutcome::Missing => {
            log::warn!("[Tabs] No tab at index {}", index);
            Ok(())
        }
    }
}

fn select_tab(app: &AppHandle, state: &AppState, index: usize) -> Result<(), String> {
    if !state.tabs.lock().map_err(|e| e.to_string())?.select(index) {
        log::warn!("[Tabs] No tab at index {}", index);
        return Ok(());
    }
    show_only(app, state, index)?;
    emit_tabs(app, state)?;

    let url = state
        .tabs
        .lock()
        .map_err(|e| e.to_string())?
        .active_tab()
        .map(|t| t.url.clone());
    if let Some(url) = url {
        let _ = app.emit_to(MAIN_WINDOW, "url-changed", url);
    }
    Ok(())
}

/// Shows the tab at `index` and hides every other tab webview.
fn show_only(app: &AppHandle, state: &AppState, index: usize) -> Result<(), String> {
    let labels: Vec<String> = state
        .tabs
        .lock()
        .map_err(|e| e.to_string())?
        .tabs()
        .iter()
        .map(|t| t.webview_label.clone())
        .collect();

    for (i, label) in labels.iter().enumerate() {
        let Some(webview) = app.get_webview(label) else {
            continue;
        };
        if i == index {
            let _ = webview.show();
            let _ = webview.set_focus();
        } else {
            let _ = webview.hide();
        }
    }
    Ok(())
}

fn tab_webview_builder(app: &AppHandle, label: &str, url: Url) -> WebviewBuilder<Wry> {
    let download_app = app.clone();
    let load_app = app.clone();

    WebviewBuilder::new(label, WebviewUrl::External(url))
        .on_download(move |_webview, event| handle_download(&download_app, event))
        .on_page_load(move |webview, payload| record_page_load(&load_app, &webview, &payload))
}

fn record_page_load(app: &AppHandle, webview: &Webview, payload: &PageLoadPayload<'_>) {
    let state = app.state::<AppState>();
    let loading = matches!(payload.event(), PageLoadEvent::Started);
    let label = webview.label().to_string();

    let is_active = match state.tabs.lock() {
        Ok(mut tabs) => {
            if !tabs.record_load(&label, payload.url(), loading) {
                return;
            }
            tabs.is_active(&label)
        }
        Err(e) => {
            log::error!("[Tabs] State poisoned: {}", e);
            return;
        }
    };

    if let Err(e) = emit_tabs(app, &state) {
        log::warn!("[Tabs] Failed to emit update: {}", e);
    }
    if is_active {
        let _ = app.emit_to(MAIN_WINDOW, "url-changed", payload.url().to_string());
    }
}

/// Decides on a download the engine is about to start. Returning false
/// rejects it.
fn handle_download(app: &AppHandle, event: DownloadEvent<'_>) -> bool {
    match event {
        DownloadEvent::Requested { url, destination } => {
            let suggested = destination
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());

            match prepare_download(app, url.clone(), suggested.as_deref()) {
                Ok(path) => {
                    log::info!("[Downloads] {} -> {}", url, path.display());
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let record = DownloadRecord {
                        url: url.to_string(),
                        path: Some(path.display().to_string()),
                        timestamp: chrono::Utc::now().to_rfc3339(),
                        success: None,
                    };
                    *destination = path;

                    let _ = app.emit_to(MAIN_WINDOW, "download-started", record);
                    dialogs::inform(app, "Download Started", format!("Downloading {}", file_name));
                    true
                }
                Err(e) => {
                    log::error!("[Downloads] Rejected {}: {}", url, e);
                    dialogs::report_error(app, format!("An error occurred during download: {}", e));
                    false
                }
            }
        }
        DownloadEvent::Finished { url, path, success } => {
            finish_download(app, &url, path, success);
            true
        }
        _ => true,
    }
}

fn prepare_download(app: &AppHandle, url: Url, suggested: Option<&str>) -> Result<PathBuf, DownloadError> {
    let state = app.state::<AppState>();
    let override_dir = state
        .settings
        .read()
        .map_err(|_| DownloadError::NoDownloadDirectory)?
        .download_dir
        .clone();

    let directory = match override_dir {
        Some(dir) => dir,
        None => app
            .path()
            .download_dir()
            .map_err(|_| DownloadError::NoDownloadDirectory)?,
    };

    DownloadRequest::new(url, suggested, directory).resolve()
}

fn finish_download(app: &AppHandle, url: &Url, path: Option<PathBuf>, success: bool) {
    let record = DownloadRecord {
        url: url.to_string(),
        path: path.as_ref().map(|p| p.display().to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        success: Some(success),
    };
    let _ = app.emit_to(MAIN_WINDOW, "download-finished", record);

    if !success {
        let e = DownloadError::TransferFailed(url.to_string());
        log::error!("[Downloads] {}", e);
        dialogs::report_error(app, format!("An error occurred during download: {}", e));
        return;
    }

    log::info!("[Downloads] Finished {}", url);
    let open = app
        .state::<AppState>()
        .settings
        .read()
        .map(|s| s.open_completed_downloads)
        .unwrap_or(false);

    if let (true, Some(path)) = (open, path) {
        if let Err(e) = app.opener().open_path(path.display().to_string(), None::<&str>) {
            log::warn!("[Downloads] Could not open {}: {}", path.display(), e);
        }
    }
}

fn content_bounds(window: &Window) -> Result<(PhysicalPosition<i32>, PhysicalSize<u32>), String> {
    let physical_size = window.inner_size().map_err(|e| e.to_string())?;
    let scale_factor = window.scale_factor().map_err(|e| e.to_string())?;
    Ok(bounds_below_toolbar(physical_size, scale_factor))
}

fn bounds_below_toolbar(window_size: PhysicalSize<u32>, scale: f64) -> (PhysicalPosition<i32>, PhysicalSize<u32>) {
    let toolbar_physical = (TOOLBAR_HEIGHT_LOGICAL * scale) as u32;
    let content_height = window_size.height.saturating_sub(toolbar_physical).max(100);
    (
        PhysicalPosition::new(0, toolbar_physical as i32),
        PhysicalSize::new(window_size.width, content_height),
    )
}

/// Keeps every tab webview filling the area under the toolbar.
pub fn watch_resize(window: &Window, app: AppHandle) {
    let window_clone = window.clone();
    window.on_window_event(move |event| {
        if let tauri::WindowEvent::Resized(new_physical_size) = event {
            let scale = window_clone.scale_factor().unwrap_or(1.0);
            let (position, size) = bounds_below_toolbar(*new_physical_size, scale);

            let labels: Vec<String> = match app.state::<AppState>().tabs.lock() {
                Ok(tabs) => tabs.tabs().iter().map(|t| t.webview_label.clone()).collect(),
                Err(_) => return,
            };
            for label in labels {
                if let Some(wv) = app.get_webview(&label) {
                    let _ = wv.set_bounds(tauri::Rect {
                        position: tauri::Position::Physical(position),
                        size: tauri::Size::Physical(size),
                    });
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_sits_below_toolbar() {
        let (position, size) = bounds_below_toolbar(PhysicalSize::new(1000, 700), 1.0);
        assert_eq!(position, PhysicalPosition::new(0, 80));
        assert_eq!(size, PhysicalSize::new(1000, 620));
    }

    #[test]
    fn test_content_scales_with_dpi() {
        let (position, size) = bounds_below_toolbar(PhysicalSize::new(2000, 1400), 2.0);
        assert_eq!(position.y, 160);
        assert_eq!(size.height, 1240);
    }

    #[test]
    fn test_tiny_window_keeps_minimum_height() {
        let (_, size) = bounds_below_toolbar(PhysicalSize::new(300, 90), 1.0);
        assert_eq!(size.height, 100);
    }
}
