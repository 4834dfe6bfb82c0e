//! Zip archive extraction.
//!
//! Decompression is CPU-bound, so [`ZipExtractor`] runs it on the blocking thread
//! pool and keeps the async caller free.
//!
//! Before anything is written the extractor checks that the archive exists and that
//! the destination folder can be created. Failures are reported as:
//!
//! | Condition | Kind |
//! |-----------|------|
//! | archive file missing | `ArchiveMissing` |
//! | not a zip, bad entry, bad compressed data | `ArchiveCorrupt` |
//! | existing file and `overwrite == false` | `FileExists` |
//! | file where a folder should go | `DirectoryConflict` |
//! | OS refused access | `PermissionDenied` |
//! | any other I/O failure | `DiskIo` |
//!
//! Entries whose names would escape the destination (`../`, absolute paths) are
//! skipped with a warning.

use crate::core::UpdraftError;
use crate::paths::{FolderPath, ValidatedPath, ZipPath};
use crate::utils::progress::ProgressBar;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// What an extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Folder the archive was expanded into
    pub destination: FolderPath,
    /// Top-level files and folders that did not exist before extraction
    pub root_entries: Vec<PathBuf>,
    /// Number of regular files written
    pub files_written: usize,
}

/// Something that can expand an archive into a folder.
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Expand `archive` into `destination`.
    async fn extract(
        &self,
        archive: &ZipPath,
        destination: &FolderPath,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<ExtractionReport, UpdraftError>;
}

/// Extractor for `.zip` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

#[async_trait]
impl ArchiveExtractor for ZipExtractor {
    async fn extract(
        &self,
        archive: &ZipPath,
        destination: &FolderPath,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<ExtractionReport, UpdraftError> {
        if cancel.is_cancelled() {
            return Err(UpdraftError::Cancelled {
                stage: "extraction".to_string(),
            });
        }

        match tokio::fs::metadata(archive.as_path()).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(UpdraftError::DirectoryConflict {
                    path: archive.to_string(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(UpdraftError::ArchiveMissing {
                    path: archive.to_string(),
                });
            }
            Err(e) => return Err(UpdraftError::from_io(e, "inspect archive", archive.to_string())),
        }

        tokio::fs::create_dir_all(destination.as_path())
            .await
            .map_err(|e| UpdraftError::from_io(e, "create extraction folder", destination.as_str()))?;
        assert!(destination.path_exists(), "{destination} missing right after create_dir_all succeeded");

        info!("Extracting {archive} to {destination}");
        let archive_path = archive.as_path().to_path_buf();
        let dest = destination.clone();
        let cancel = cancel.clone();

        let joined = tokio::task::spawn_blocking(move || {
            extract_blocking(&archive_path, &dest, overwrite, &cancel)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(UpdraftError::Cancelled {
                stage: "extraction completion".to_string(),
            }),
        }
    }
}

fn corrupt(archive: &Path, reason: impl ToString) -> UpdraftError {
    UpdraftError::ArchiveCorrupt {
        path: archive.display().to_string(),
        reason: reason.to_string(),
    }
}

fn extract_blocking(
    archive_path: &Path,
    destination: &FolderPath,
    overwrite: bool,
    cancel: &CancellationToken,
) -> Result<ExtractionReport, UpdraftError> {
    let file = File::open(archive_path)
        .map_err(|e| UpdraftError::from_io(e, "open archive", archive_path.display().to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| corrupt(archive_path, e))?;

    let dest_root = destination.as_path();
    let spinner = ProgressBar::new_spinner();
    spinner.set_prefix("Extracting");

    // Top-level names present before we start are never reported as created
    let mut created_roots = BTreeSet::new();
    let mut seen_roots = BTreeSet::new();
    let mut files_written = 0usize;

    for i in 0..archive.len() {
        if cancel.is_cancelled() {
            spinner.finish_and_clear();
            return Err(UpdraftError::Cancelled {
                stage: "extraction completion".to_string(),
            });
        }

        let mut entry = archive.by_index(i).map_err(|e| corrupt(archive_path, e))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry outside the destination: {}", entry.name());
            continue;
        };

        if let Some(Component::Normal(first)) = relative.components().next() {
            let root = dest_root.join(first);
            if seen_roots.insert(root.clone()) && !root.exists() {
                created_roots.insert(root);
            }
        }

        let out_path = dest_root.join(&relative);
        let out_display = out_path.display().to_string();

        if entry.is_dir() {
            if out_path.is_file() {
                return Err(UpdraftError::DirectoryConflict {
                    path: out_display,
                });
            }
            fs::create_dir_all(&out_path)
                .map_err(|e| UpdraftError::from_io(e, "create folder", &out_display))?;
        } else {
            if let Some(parent) = out_path.parent() {
                if parent.is_file() {
                    return Err(UpdraftError::DirectoryConflict {
                        path: parent.display().to_string(),
                    });
                }
                fs::create_dir_all(parent)
                    .map_err(|e| UpdraftError::from_io(e, "create folder", parent.display().to_string()))?;
            }
            if out_path.is_dir() {
                return Err(UpdraftError::DirectoryConflict {
                    path: out_display,
                });
            }

            let mut options = OpenOptions::new();
            options.write(true);
            if overwrite {
                options.create(true).truncate(true);
            } else {
                options.create_new(true);
            }
            let mut out_file =
                options.open(&out_path).map_err(|e| UpdraftError::from_io(e, "write file", &out_display))?;

            io::copy(&mut entry, &mut out_file).map_err(|e| {
                if e.kind() == io::ErrorKind::InvalidData {
                    corrupt(archive_path, e)
                } else {
                    UpdraftError::from_io(e, "write file", &out_display)
                }
            })?;
            files_written += 1;
            spinner.set_message(relative.display().to_string());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| UpdraftError::from_io(e, "set permissions", &out_display))?;
            }
        }
    }

    spinner.finish_and_clear();
    debug!("Extracted {files_written} files into {destination}");

    Ok(ExtractionReport {
        destination: destination.clone(),
        root_entries: created_roots.into_iter().collect(),
        files_written,
    })
}
