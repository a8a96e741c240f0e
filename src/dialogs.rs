// Secondary windows and message boxes.

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

pub const PASSWORD_MANAGER: &str = "password-manager";
pub const CREDENTIAL_HISTORY: &str = "credential-history";

fn show_dialog_window(
    app: &AppHandle,
    label: &str,
    page: &str,
    title: &str,
    size: (f64, f64),
) -> Result<(), String> {
    if let Some(win) = app.get_window(label) {
        return win.set_focus().map_err(|e| e.to_string());
    }

    let window = WebviewWindowBuilder::new(app, label, WebviewUrl::App(page.into()))
        .title(title)
        .inner_size(size.0, size.1)
        .resizable(false)
        .minimizable(false)
        .maximizable(false)
        .center()
        .focused(true)
        .build();

    window.map(|_| ()).map_err(|e| {
        log::error!("[Dialogs] Failed to create {} window: {}", label, e);
        e.to_string()
    })
}

/// The add-credential form.
pub fn show_password_manager(app: &AppHandle) -> Result<(), String> {
    show_dialog_window(app, PASSWORD_MANAGER, "password.html", "Password Manager", (320.0, 240.0))
}

/// Lists every saved credential.
pub fn show_credential_history(app: &AppHandle) -> Result<(), String> {
    show_dialog_window(app, CREDENTIAL_HISTORY, "history.html", "Saved Password History", (420.0, 360.0))
}

pub fn inform(app: &AppHandle, title: &str, message: impl Into<String>) {
    app.dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

pub fn report_error(app: &AppHandle, message: impl Into<String>) {
    app.dialog()
        .message(message)
        .title("Error")
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}
