use std::path::Path;

/// Extensions of files a report may have written on an earlier run.
pub const STALE_EXTENSIONS: [&str; 5] = ["pdf", "png", "svg", "json", "eps"];

fn is_stale(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            STALE_EXTENSIONS
                .iter()
                .any(|stale| stale.eq_ignore_ascii_case(ext))
        })
}

/// Removes stale chart files from `dir`, creating the directory when it is
/// missing. Subdirectories and other files are kept.
///
/// # Errors
///
/// Returns an error when the directory cannot be created or listed, or a
/// file cannot be removed.
pub async fn clean_output_dir(dir: &Path) -> Result<usize, std::io::Error> {
    tokio::fs::create_dir_all(dir).await?;
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut removed = 0usize;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() || !is_stale(&path) {
            continue;
        }
        if let Err(err) = tokio::fs::remove_file(&path).await
            && err.kind() != std::io::ErrorKind::NotFound
        {
            return Err(err);
        }
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn clean_output_dir_removes_only_chart_files() -> Result<(), String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        for name in ["a.png", "b.PDF", "c.json", "keep.txt"] {
            std::fs::write(dir.path().join(name), "x")
                .map_err(|err| format!("write failed: {}", err))?;
        }
        std::fs::create_dir_all(dir.path().join("sub.png"))
            .map_err(|err| format!("create_dir_all failed: {}", err))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("runtime build failed: {}", err))?;
        let removed = runtime
            .block_on(clean_output_dir(dir.path()))
            .map_err(|err| format!("clean_output_dir failed: {}", err))?;

        if removed != 3 {
            return Err(format!("Expected 3 removed files, got {}", removed));
        }
        if !dir.path().join("keep.txt").exists() {
            return Err("Expected keep.txt to remain".to_owned());
        }
        if !dir.path().join("sub.png").is_dir() {
            return Err("Expected subdirectory to remain".to_owned());
        }
        Ok(())
    }

    #[test]
    fn clean_output_dir_creates_missing_dir() -> Result<(), String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let target = dir.path().join("out").join("nested");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("runtime build failed: {}", err))?;
        runtime
            .block_on(clean_output_dir(&target))
            .map_err(|err| format!("clean_output_dir failed: {}", err))?;
        if !target.is_dir() {
            return Err("Expected output dir created".to_owned());
        }
        Ok(())
    }
}
