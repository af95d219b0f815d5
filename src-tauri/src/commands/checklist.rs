use crate::checklist;
use crate::commands::AppStateExt;
use crate::models::ChecklistCategory;
use tauri::AppHandle;

#[tauri::command]
pub fn get_global_checklist(app: AppHandle) -> Result<Vec<ChecklistCategory>, String> {
    Ok(app.app_state().store.get_global_checklist())
}

#[tauri::command]
pub fn update_global_checklist(
    app: AppHandle,
    categories: Vec<ChecklistCategory>,
) -> Result<(), String> {
    app.app_state().store.update_global_checklist(categories);

    Ok(())
}

#[tauri::command]
pub fn add_checklist_category(app: AppHandle, name: String) -> Result<Vec<ChecklistCategory>, String> {
    let store = &app.app_state().store;
    let updated = checklist::add_category(&store.get_global_checklist(), name.trim());
    store.update_global_checklist(updated.clone());

    Ok(updated)
}

#[tauri::command]
pub fn remove_checklist_category(
    app: AppHandle,
    category_id: String,
) -> Result<Vec<ChecklistCategory>, String> {
    let store = &app.app_state().store;
    let updated = checklist::remove_category(&store.get_global_checklist(), &category_id);
    store.update_global_checklist(updated.clone());

    Ok(updated)
}

#[tauri::command]
pub fn add_checklist_item(
    app: AppHandle,
    category_id: String,
    label: String,
) -> Result<Vec<ChecklistCategory>, String> {
    let store = &app.app_state().store;
    let template = store.get_global_checklist();
    if !template.iter().any(|c| c.id == category_id) {
        return Err(format!("Unknown checklist category: {}", category_id));
    }

    let updated = checklist::add_item(&template, &category_id, label.trim());
    store.update_global_checklist(updated.clone());

    Ok(updated)
}

#[tauri::command]
pub fn remove_checklist_item(
    app: AppHandle,
    category_id: String,
    item_id: String,
) -> Result<Vec<ChecklistCategory>, String> {
    let store = &app.app_state().store;
    let updated = checklist::remove_item(&store.get_global_checklist(), &category_id, &item_id);
    store.update_global_checklist(updated.clone());

    Ok(updated)
}
