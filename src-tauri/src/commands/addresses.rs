use crate::commands::AppStateExt;
use crate::models::normalize_name;
use tauri::AppHandle;

#[tauri::command]
pub fn get_city_addresses(app: AppHandle, city: String) -> Result<Vec<String>, String> {
    Ok(app.app_state().store.list_addresses(normalize_name(&city)))
}

#[tauri::command]
pub fn add_address(app: AppHandle, city: String, address: String) -> Result<Vec<String>, String> {
    let store = &app.app_state().store;
    let city = normalize_name(&city);
    store.add_address(city, normalize_name(&address));

    Ok(store.list_addresses(city))
}

#[tauri::command]
pub fn delete_address(app: AppHandle, city: String, address: String) -> Result<(), String> {
    app.app_state()
        .store
        .delete_address(normalize_name(&city), normalize_name(&address));

    Ok(())
}
