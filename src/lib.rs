// Ripe Browser Library Entry Point
// main.rs only calls `run`; everything else lives here so it can be tested.

use tauri::Manager;

pub mod browser;
pub mod commands;
pub mod dialogs;
pub mod menu;
pub mod settings;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

use crate::settings::Settings;
use crate::state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let settings = Settings::load_or_init(app.handle());
            let homepage = settings.homepage.clone();
            app.manage(AppState::new(settings));

            menu::install(app)?;

            let main_window = app
                .get_window(browser::MAIN_WINDOW)
                .ok_or("main window missing from tauri.conf.json")?;
            browser::watch_resize(&main_window, app.handle().clone());

            browser::open_tab(app.handle(), &homepage)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::navigate,
            commands::go_back,
            commands::go_forward,
            commands::reload,
            commands::go_home,
            commands::list_shortcuts,
            commands::open_shortcut,
            commands::new_tab,
            commands::close_tab,
            commands::select_tab,
            commands::get_tabs,
            commands::toggle_save_password,
            commands::show_credential_history,
            commands::save_credentials,
            commands::list_credentials
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
