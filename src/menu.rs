use tauri::menu::{MenuBuilder, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder};
use tauri::App;

use crate::browser::{self, BrowserEvent};

/// Maps a menu item id to the event it triggers.
fn event_for_menu(id: &str) -> Option<BrowserEvent> {
    match id {
        "new_tab" => Some(BrowserEvent::NewTab),
        "close_tab" => Some(BrowserEvent::CloseActiveTab),
        "reload" => Some(BrowserEvent::Reload),
        "go_home" => Some(BrowserEvent::Home),
        "go_back" => Some(BrowserEvent::Back),
        "go_forward" => Some(BrowserEvent::Forward),
        "save_password" => Some(BrowserEvent::SavePasswordToggled(true)),
        "saved_passwords" => Some(BrowserEvent::ShowCredentialHistory),
        _ => None,
    }
}

pub fn install(app: &App) -> tauri::Result<()> {
    let app_menu = SubmenuBuilder::new(app, "Ripe")
        .item(&PredefinedMenuItem::about(app, Some("About Ripe Browser"), None)?)
        .separator()
        .item(&PredefinedMenuItem::quit(app, Some("Quit Ripe Browser"))?)
        .build()?;

    let file_menu = SubmenuBuilder::new(app, "File")
        .item(&MenuItemBuilder::with_id("new_tab", "New Tab").accelerator("CmdOrCtrl+T").build(app)?)
        .item(&MenuItemBuilder::with_id("close_tab", "Close Tab").accelerator("CmdOrCtrl+W").build(app)?)
        .build()?;

    let edit_menu = SubmenuBuilder::new(app, "Edit")
        .item(&PredefinedMenuItem::undo(app, Some("Undo"))?)
        .item(&PredefinedMenuItem::redo(app, Some("Redo"))?)
        .separator()
        .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
        .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
        .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
        .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
        .build()?;

    let view_menu = SubmenuBuilder::new(app, "View")
        .item(&MenuItemBuilder::with_id("reload", "Reload Page").accelerator("CmdOrCtrl+R").build(app)?)
        .item(&MenuItemBuilder::with_id("go_home", "Home").accelerator("Alt+Home").build(app)?)
        .build()?;

    let history_menu = SubmenuBuilder::new(app, "History")
        .item(&MenuItemBuilder::with_id("go_back", "Back").accelerator("CmdOrCtrl+[").build(app)?)
        .item(&MenuItemBuilder::with_id("go_forward", "Forward").accelerator("CmdOrCtrl+]").build(app)?)
        .build()?;

    let passwords_menu = SubmenuBuilder::new(app, "Passwords")
        .item(&MenuItemBuilder::with_id("save_password", "Save Password...").build(app)?)
        .item(&MenuItemBuilder::with_id("saved_passwords", "Saved Passwords...").build(app)?)
        .build()?;

    let menu = MenuBuilder::new(app)
        .items(&[&app_menu, &file_menu, &edit_menu, &view_menu, &history_menu, &passwords_menu])
        .build()?;

    app.set_menu(menu)?;

    app.on_menu_event(|app_handle, event| {
        let id = event.id().0.as_str();
        let Some(browser_event) = event_for_menu(id) else {
            return;
        };
        if let Err(e) = browser::dispatch(app_handle, browser_event) {
            log::error!("[Menu] '{}' failed: {}", id, e);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("new_tab", BrowserEvent::NewTab)]
    #[case("close_tab", BrowserEvent::CloseActiveTab)]
    #[case("go_back", BrowserEvent::Back)]
    #[case("save_password", BrowserEvent::SavePasswordToggled(true))]
    #[case("saved_passwords", BrowserEvent::ShowCredentialHistory)]
    fn test_menu_ids(#[case] id: &str, #[case] expected: BrowserEvent) {
        assert_eq!(event_for_menu(id), Some(expected));
    }

    #[test]
    fn test_predefined_items_are_not_dispatched() {
        assert_eq!(event_for_menu("quit"), None);
        assert_eq!(event_for_menu(""), None);
    }
}
