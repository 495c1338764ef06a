use crate::core::error::PxError;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeOptions {
    /// Descend into sub-directories instead of only the top level
    pub recursive: bool,
    /// Report what would be removed without removing it
    pub dry_run: bool,
}

#[derive(Debug, Default)]
pub struct PurgeReport {
    pub removed: Vec<PathBuf>,
    pub kept: usize,
    /// Entries that could not be read or removed; they are skipped
    pub errors: usize,
    pub dry_run: bool,
}

/// Remove regular files under `dir` last modified more than `max_age` ago.
///
/// Directories and symlinks are left alone. An entry that vanishes, cannot be
/// read or cannot be removed is logged and counted in `errors`; the rest of
/// the directory is still purged.
pub fn purge_older_than(
    dir: &Path,
    max_age: Duration,
    options: PurgeOptions,
) -> Result<PurgeReport, PxError> {
    if !dir.is_dir() {
        return Err(PxError::Input(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut report = PurgeReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return Ok(report);
    };

    let mut walker = WalkBuilder::new(dir);
    walker.standard_filters(false);
    if !options.recursive {
        walker.max_depth(Some(1));
    }

    let files = walker.build().filter_map(|entry| match entry {
        Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
            Some(Ok(entry.into_path()))
        }
        Ok(_) => None,
        Err(e) => Some(Err(e)),
    });
    purge_paths(files, cutoff, options, &mut report);

    info!(
        dir = %dir.display(),
        removed = report.removed.len(),
        kept = report.kept,
        errors = report.errors,
        dry_run = options.dry_run,
        "purge finished"
    );
    Ok(report)
}

fn purge_paths<I>(paths: I, cutoff: SystemTime, options: PurgeOptions, report: &mut PurgeReport)
where
    I: IntoIterator<Item = Result<PathBuf, ignore::Error>>,
{
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                report.errors += 1;
                continue;
            }
        };

        let modified = match fs::symlink_metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file without metadata");
                report.errors += 1;
                continue;
            }
        };
        if modified >= cutoff {
            report.kept += 1;
            continue;
        }

        if options.dry_run {
            debug!(path = %path.display(), "would purge");
        } else if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "failed to purge file");
            report.errors += 1;
            continue;
        }
        report.removed.push(path);
    }
}
