use crate::checklist::{self, ChecklistProgress};
use crate::commands::AppStateExt;
use crate::models::{normalize_name, AddressRecord, Checklist, Photo, ProfitabilityData};
use crate::profitability::{self, ProfitabilitySummary};
use tauri::AppHandle;

#[tauri::command]
pub fn get_address_data(app: AppHandle, city: String, address: String) -> Result<AddressRecord, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    Ok(app.app_state().store.get_address_record(&city, &address))
}

#[tauri::command]
pub fn update_profitability_data(
    app: AppHandle,
    city: String,
    address: String,
    data: ProfitabilityData,
) -> Result<ProfitabilityData, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    let store = &app.app_state().store;
    store.update_profitability(&city, &address, data);

    store
        .recalculate_profitability(&city, &address)
        .ok_or_else(|| format!("No data for {} / {}", city, address))
}

#[tauri::command]
pub fn get_profitability_summary(
    app: AppHandle,
    city: String,
    address: String,
) -> Result<Option<ProfitabilitySummary>, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    let record = app.app_state().store.get_address_record(&city, &address);

    Ok(profitability::summarize(&record.profitability))
}

#[tauri::command]
pub fn update_checklist_data(
    app: AppHandle,
    city: String,
    address: String,
    data: Checklist,
) -> Result<(), String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    app.app_state().store.update_checklist(&city, &address, data);

    Ok(())
}

#[tauri::command]
pub fn toggle_checklist_item(
    app: AppHandle,
    city: String,
    address: String,
    category_id: String,
    item_id: String,
) -> Result<Checklist, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    app.app_state()
        .store
        .toggle_checklist_item(&city, &address, &category_id, &item_id)
        .ok_or_else(|| "Checklist item not found".to_string())
}

#[tauri::command]
pub fn get_checklist_progress(
    app: AppHandle,
    city: String,
    address: String,
) -> Result<ChecklistProgress, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    let record = app.app_state().store.get_address_record(&city, &address);

    Ok(checklist::progress(&record.checklist.categories))
}

#[tauri::command]
pub fn update_photo_gallery(
    app: AppHandle,
    city: String,
    address: String,
    photos: Vec<Photo>,
) -> Result<(), String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    app.app_state().store.update_photos(&city, &address, photos);

    Ok(())
}

#[tauri::command]
pub fn upload_photo(
    app: AppHandle,
    city: String,
    address: String,
    file_name: String,
    bytes: Vec<u8>,
    caption: Option<String>,
) -> Result<Photo, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    let state = app.app_state();

    let url = state
        .uploads
        .save(&city, &address, &file_name, &bytes)
        .map_err(|e| {
            tracing::warn!(city = %city, address = %address, error = %e, "upload failed");
            e.to_string()
        })?;

    let caption = caption.unwrap_or_else(|| file_name.clone());
    match state.store.add_photo(&city, &address, &url, &caption) {
        Some(photo) => Ok(photo),
        None => {
            // Nothing references the file; drop it.
            if let Some(path) = state.uploads.resolve(&url) {
                let _ = std::fs::remove_file(path);
            }
            Err(format!("No data for {} / {}", city, address))
        }
    }
}

#[tauri::command]
pub fn remove_photo(app: AppHandle, city: String, address: String, id: String) -> Result<bool, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    let state = app.app_state();
    let photo = state.store.find_photo(&city, &address, &id);
    let removed = state.store.remove_photo(&city, &address, &id);

    if let Some(path) = photo
        .filter(|_| removed)
        .and_then(|photo| state.uploads.resolve(&photo.url))
    {
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove uploaded file");
        }
    }

    Ok(removed)
}

#[tauri::command]
pub fn update_photo_caption(
    app: AppHandle,
    city: String,
    address: String,
    id: String,
    caption: String,
) -> Result<bool, String> {
    let (city, address) = (normalize_name(&city), normalize_name(&address));
    Ok(app
        .app_state()
        .store
        .update_photo_caption(&city, &address, &id, &caption))
}
