use crate::commands::AppStateExt;
use crate::models::{normalize_name, City};
use tauri::AppHandle;

#[tauri::command]
pub fn get_cities(app: AppHandle) -> Result<Vec<City>, String> {
    Ok(app.app_state().store.list_cities())
}

#[tauri::command]
pub fn add_city(app: AppHandle, name: String) -> Result<Vec<City>, String> {
    let store = &app.app_state().store;
    store.add_city(normalize_name(&name));

    Ok(store.list_cities())
}

#[tauri::command]
pub fn delete_city(app: AppHandle, name: String) -> Result<(), String> {
    app.app_state().store.delete_city(normalize_name(&name));

    Ok(())
}
