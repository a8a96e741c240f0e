// Tab bookkeeping - Pure logic, no Tauri imports.
// The webviews themselves are created and destroyed by the browser layer;
// this module owns their order, titles and which one is active.

use serde::Serialize;
use url::Url;

pub const NEW_TAB_TITLE: &str = "New Tab";

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub webview_label: String,
    pub title: String,
    pub url: String,
    pub is_loading: bool,
}

/// Snapshot sent to the toolbar with `update-tabs`.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabsPayload {
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed; `active` is the index now selected.
    Removed { tab: Tab, active: usize },
    /// It was the last tab. Nothing was removed; the window should close.
    CloseWindow,
    Missing,
}

#[derive(Debug, Default)]
pub struct TabManager {
    tabs: Vec<Tab>,
    active: Option<usize>,
    next_id: u64,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh webview label. Labels are never reused.
    pub fn allocate_label(&mut self) -> String {
        self.next_id += 1;
        format!("webview-{}", self.next_id)
    }

    /// Appends a tab, makes it active and returns its index.
    pub fn open_new_tab(&mut self, webview_label: String, url: &str) -> usize {
        self.tabs.push(Tab {
            webview_label,
            title: NEW_TAB_TITLE.to_string(),
            url: url.to_string(),
            is_loading: true,
        });
        let index = self.tabs.len() - 1;
        self.active = Some(index);
        index
    }

    /// Closes the tab at `index`, unless it is the only one left.
    pub fn close_tab(&mut self, index: usize) -> CloseOutcome {
        if index >= self.tabs.len() {
            return CloseOutcome::Missing;
        }
        if self.tabs.len() == 1 {
            return CloseOutcome::CloseWindow;
        }

        let tab = self.tabs.remove(index);
        let last = self.tabs.len() - 1;
        let active = match self.active {
            Some(a) if a > index => a - 1,
            Some(a) if a == index => index.min(last),
            Some(a) => a,
            None => index.min(last),
        };
        self.active = Some(active);

        CloseOutcome::Removed { tab, active }
    }

    /// Makes `index` active. Returns false if there is no such tab.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn is_active(&self, webview_label: &str) -> bool {
        self.active_tab().is_some_and(|t| t.webview_label == webview_label)
    }

    /// Updates a tab after its view reported a load. Returns false for
    /// labels that no longer belong to a tab.
    pub fn record_load(&mut self, webview_label: &str, url: &Url, loading: bool) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.webview_label == webview_label) else {
            return false;
        };
        tab.url = url.to_string();
        tab.is_loading = loading;
        tab.title = title_for(url);
        true
    }

    pub fn payload(&self) -> TabsPayload {
        TabsPayload {
            tabs: self.tabs.clone(),
            active_tab_id: self.active_tab().map(|t| t.webview_label.clone()),
        }
    }
}

fn title_for(url: &Url) -> String {
    match url.host_str() {
        Some(host) if !host.is_empty() => host.trim_start_matches("www.").to_string(),
        _ => NEW_TAB_TITLE.to_string(),
    }
}
