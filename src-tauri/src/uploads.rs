use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Custom URI scheme the desktop shell serves uploaded files from.
pub const UPLOADS_SCHEME: &str = "uploads";

/// Origin under which the web view reaches `UPLOADS_SCHEME`. Windows and
/// Android webviews only accept custom schemes as `http://<scheme>.localhost`.
pub fn default_url_base() -> String {
    if cfg!(any(windows, target_os = "android")) {
        format!("http://{}.localhost", UPLOADS_SCHEME)
    } else {
        format!("{}://localhost", UPLOADS_SCHEME)
    }
}

/// Stores uploaded photo files under `<root>/<city>/<address>/` and hands
/// back the URL the gallery records.
pub struct UploadStore {
    root: PathBuf,
    url_base: String,
}

impl UploadStore {
    pub fn new(root: PathBuf) -> Self {
        Self::with_url_base(root, default_url_base())
    }

    pub fn with_url_base(root: PathBuf, url_base: String) -> Self {
        UploadStore {
            root,
            url_base: url_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    /// Writes the file and returns its URL, each segment percent-encoded.
    pub fn save(&self, city: &str, address: &str, file_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::Upload("No file uploaded".to_string()));
        }
        for component in [city, address, file_name] {
            check_component(component)?;
        }

        let dir = self.root.join(city).join(address);
        std::fs::create_dir_all(&dir)?;

        let stored_name = format!("{}-{}", chrono::Utc::now().timestamp_millis(), file_name);
        let path = dir.join(&stored_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "saved upload");

        Ok(format!(
            "{}/{}/{}/{}",
            self.url_base,
            urlencoding::encode(city),
            urlencoding::encode(address),
            urlencoding::encode(&stored_name)
        ))
    }

    /// Maps a URL returned by `save` back to the file on disk.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.strip_prefix(self.url_base.as_str())?;
        self.resolve_path(path)
    }

    /// Maps the path part of an upload URL (`/<city>/<address>/<file>`,
    /// percent-encoded) to the file on disk.
    pub fn resolve_path(&self, path: &str) -> Option<PathBuf> {
        let relative = path.strip_prefix('/')?;
        let mut resolved = self.root.clone();
        let mut count = 0;

        for part in relative.split('/') {
            let decoded = urlencoding::decode(part).ok()?;
            check_component(&decoded).ok()?;
            resolved.push(&*decoded);
            count += 1;
        }

        (count == 3).then_some(resolved)
    }
}

/// MIME type for a served upload, from its extension.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn check_component(component: &str) -> AppResult<()> {
    let invalid = component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\']);

    if invalid {
        return Err(AppError::Upload(format!("invalid path component: {:?}", component)));
    }
    Ok(())
}
