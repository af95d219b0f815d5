pub mod addresses;
pub mod checklist;
pub mod cities;
pub mod records;

use tauri::{AppHandle, Manager};

use crate::db::SqliteStorage;
use crate::store::DataStore;
use crate::uploads::UploadStore;

pub struct AppState {
    pub store: DataStore<SqliteStorage>,
    pub uploads: UploadStore,
}

pub trait AppStateExt {
    fn app_state(&self) -> &AppState;
}

impl AppStateExt for AppHandle {
    fn app_state(&self) -> &AppState {
        self.state::<AppState>().inner()
    }
}
