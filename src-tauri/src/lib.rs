pub mod checklist;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod profitability;
pub mod store;
pub mod uploads;


#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::commands::{addresses, checklist, cities, records, AppState, AppStateExt};
    use crate::config::AppConfig;
    use crate::db::SqliteStorage;
    use crate::store::DataStore;
    use crate::uploads::{self, UploadStore, UPLOADS_SCHEME};
    use tauri::http::{header::CONTENT_TYPE, Response, StatusCode};
    use tauri::{Emitter, Manager};

    fn init_tracing() {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sublet_manager_lib=info"));
        let _ = fmt().with_env_filter(filter).try_init();
    }

    /// Serves `<scheme>/<city>/<address>/<file>` from the uploads directory.
    fn serve_upload(store: &UploadStore, path: &str) -> Response<Vec<u8>> {
        let file = store
            .resolve_path(path)
            .and_then(|file| std::fs::read(&file).ok().map(|bytes| (file, bytes)));

        let response = match file {
            Some((file, bytes)) => Response::builder()
                .header(CONTENT_TYPE, uploads::content_type(&file))
                .body(bytes),
            None => {
                tracing::debug!(path, "upload not found");
                Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Vec::new())
            }
        };

        response.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build upload response");
            let mut fallback = Response::new(Vec::new());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        init_tracing();

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_dialog::init())
            .plugin(tauri_plugin_fs::init())
            .register_uri_scheme_protocol(UPLOADS_SCHEME, |ctx, request| {
                let state = ctx.app_handle().app_state();
                serve_upload(&state.uploads, request.uri().path())
            })
            .setup(|app| {
                let data_dir = app.path().app_data_dir()?;
                let config = AppConfig::load(&data_dir);
                tracing::info!(data_dir = %data_dir.display(), "starting");

                let storage = SqliteStorage::open(&config.database_path())?;
                let store = DataStore::new(storage, config.default_platforms.clone());

                // Forward store changes to every web view.
                let handle = app.handle().clone();
                store.subscribe(move |event| {
                    if let Err(e) = handle.emit("store-changed", event) {
                        tracing::warn!(error = %e, "failed to forward store event");
                    }
                });

                app.manage(AppState {
                    store,
                    uploads: UploadStore::new(config.uploads_path()),
                });

                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                // Cities
                cities::get_cities,
                cities::add_city,
                cities::delete_city,
                // Addresses
                addresses::get_city_addresses,
                addresses::add_address,
                addresses::delete_address,
                // Address records
                records::get_address_data,
                records::update_profitability_data,
                records::get_profitability_summary,
                records::update_checklist_data,
                records::toggle_checklist_item,
                records::get_checklist_progress,
                records::update_photo_gallery,
                records::upload_photo,
                records::remove_photo,
                records::update_photo_caption,
                // Global checklist
                checklist::get_global_checklist,
                checklist::update_global_checklist,
                checklist::add_checklist_category,
                checklist::remove_checklist_category,
                checklist::add_checklist_item,
                checklist::remove_checklist_item,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
