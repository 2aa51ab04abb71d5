use crate::config::upload::{UploadConfig, ALLOWED_EXTENSIONS};
use crate::error::{AppError, AppResult};
use anyhow::Context;
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

pub struct UploadService;

impl UploadService {
    /// Extension allow-list check, case-insensitive. A rejected file is a
    /// benign skip for the caller, not an error.
    pub fn allowed_file(filename: &str) -> bool {
        match extension_of(filename) {
            Some(ext) => ALLOWED_EXTENSIONS.contains(&ext.as_str()),
            None => false,
        }
    }

    /// Replace anything outside [A-Za-z0-9._-] so the name cannot escape the
    /// upload directory.
    pub fn sanitize_filename(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Persist an item photo under a uuid-prefixed sanitized name and return
    /// the relative path stored on the item.
    pub async fn save_image(
        config: &UploadConfig,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<String> {
        if data.len() > config.max_size {
            return Err(AppError::PayloadTooLarge);
        }

        let filename = format!("{}_{}", Uuid::new_v4(), Self::sanitize_filename(original_name));
        let dir = Path::new(&config.upload_dir);

        fs::create_dir_all(dir)
            .await
            .context("Failed to create upload directory")?;

        let file_path = dir.join(&filename);
        fs::write(&file_path, data)
            .await
            .context("Failed to write uploaded file")?;

        Ok(format!("uploads/{}", filename))
    }
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
