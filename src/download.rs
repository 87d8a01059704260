use crate::error::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub fn download_filename(unix_millis: i64) -> String {
    format!("generated-image-{}.png", unix_millis)
}

/// Writes image bytes into `dir` under a timestamped name and returns the path.
pub async fn write_image(image_id: Uuid, bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(download_filename(chrono::Utc::now().timestamp_millis()));
    tokio::fs::write(&path, bytes).await?;

    log::info!("💾 Image {} saved to: {}", image_id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_millis() {
        assert_eq!(
            download_filename(1700000000123),
            "generated-image-1700000000123.png"
        );
    }

    #[tokio::test]
    async fn write_creates_dir_and_file() {
        let dir = std::env::temp_dir()
            .join(format!("pollinate-write-{}", Uuid::new_v4()))
            .join("nested");

        let path = write_image(Uuid::new_v4(), &[137, 80, 78, 71], &dir)
            .await
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("generated-image-"));
        assert!(name.ends_with(".png"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![137, 80, 78, 71]);

        tokio::fs::remove_dir_all(dir.parent().unwrap()).await.unwrap();
    }
}
