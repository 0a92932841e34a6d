//! Writing emitted files under a bundle's output directory.
//!
//! Every filename is cleaned and joined onto the output directory; names that
//! would resolve outside of it are rejected. Files are written to `.tmp`
//! siblings first and renamed once all of them are on disk. Files being
//! replaced are moved to `.bak` siblings during the renames and put back if a
//! later rename fails, so a failed write leaves the previous bundle in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use path_clean::PathClean;

/// One file ready to be written.
pub(crate) struct EmittedFile<'a> {
    pub filename: &'a str,
    pub contents: &'a [u8],
}

pub(crate) async fn write_files(dir: &Path, files: &[EmittedFile<'_>]) -> anyhow::Result<()> {
    let dir = dir.clean();
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let mut targets = Vec::with_capacity(files.len());
    for file in files {
        targets.push((resolve_output_path(&dir, file.filename)?, file.contents));
    }

    let mut staged = Vec::with_capacity(targets.len());
    for (target, contents) in &targets {
        match stage(target, contents).await {
            Ok(temp) => staged.push((temp, target)),
            Err(err) => {
                discard(staged.iter().map(|(temp, _)| temp)).await;
                return Err(err);
            }
        }
    }

    let mut committed = Vec::with_capacity(staged.len());
    for (index, (temp, target)) in staged.iter().enumerate() {
        match commit(temp, target).await {
            Ok(backup) => committed.push(Committed {
                target: target.as_path(),
                backup,
            }),
            Err(err) => {
                restore(&committed).await;
                discard(staged[index..].iter().map(|(temp, _)| temp)).await;
                return Err(err);
            }
        }
    }
    discard(committed.iter().filter_map(|done| done.backup.as_ref())).await;

    tracing::debug!(files = staged.len(), dir = %dir.display(), "wrote bundle output");
    Ok(())
}

/// A target already renamed into place, with the file it displaced.
struct Committed<'a> {
    target: &'a Path,
    backup: Option<PathBuf>,
}

/// Move `temp` onto `target`, keeping any existing target as a `.bak` sibling.
async fn commit(temp: &Path, target: &Path) -> anyhow::Result<Option<PathBuf>> {
    let backup = if tokio::fs::try_exists(target).await.unwrap_or(false) {
        let backup = sibling(target, ".bak");
        tokio::fs::rename(target, &backup)
            .await
            .with_context(|| format!("failed to move aside '{}'", target.display()))?;
        Some(backup)
    } else {
        None
    };

    if let Err(err) = tokio::fs::rename(temp, target).await {
        if let Some(backup) = &backup {
            let _ = tokio::fs::rename(backup, target).await;
        }
        return Err(err).with_context(|| format!("failed to write '{}'", target.display()));
    }
    Ok(backup)
}

/// Undo `committed` renames, newest first.
async fn restore(committed: &[Committed<'_>]) {
    for done in committed.iter().rev() {
        let result = match &done.backup {
            Some(backup) => tokio::fs::rename(backup, done.target).await,
            None => tokio::fs::remove_file(done.target).await,
        };
        if let Err(err) = result {
            tracing::warn!("failed to restore '{}': {}", done.target.display(), err);
        }
    }
}

fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let mut path = target.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

async fn stage(target: &Path, contents: &[u8]) -> anyhow::Result<PathBuf> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    let temp = sibling(target, ".tmp");

    tokio::fs::write(&temp, contents)
        .await
        .with_context(|| format!("failed to write '{}'", temp.display()))?;
    Ok(temp)
}

async fn discard<'a>(temps: impl Iterator<Item = &'a PathBuf>) {
    for temp in temps {
        let _ = tokio::fs::remove_file(temp).await;
    }
}

/// Join `filename` onto `base_dir`, refusing anything that escapes it.
pub(crate) fn resolve_output_path(base_dir: &Path, filename: &str) -> anyhow::Result<PathBuf> {
    if filename.is_empty() {
        bail!("emitted file has an empty name");
    }
    if filename.contains('\0') {
        bail!("emitted file name contains a null byte");
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();
    if !full_path.starts_with(base_dir) {
        bail!(
            "emitted file '{}' escapes output directory '{}'",
            filename,
            base_dir.display()
        );
    }

    Ok(full_path)
}
