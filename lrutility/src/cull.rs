//! Deletes rejected shots.
//!
//! In Lightroom, a one-star rating is a common way to mark a frame as a
//! reject while culling. This walks a folder for sidecars, and removes each
//! rejected raw file together with its sidecar.
//!
//! Reading sidecars happens in parallel. Deleting doesn't, so the log reads in
//! path order and a dry run lists exactly what a real run would remove.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{ExtractError, MetadataRecord, extract::Extractor};

/// What to cull, and whether to actually do it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CullOptions {
    /// Log what would be removed, but leave every file alone.
    pub dry_run: bool,

    /// Sidecars with exactly this rating are culled.
    pub reject_rating: i64,
}

impl Default for CullOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            reject_rating: 1,
        }
    }
}

/// What a cull did.
#[derive(Clone, Debug, Default)]
pub struct CullReport {
    /// Every sidecar found, in path order.
    pub scanned: Vec<PathBuf>,

    /// Files removed (or, on a dry run, files that would've been).
    pub removed: Vec<PathBuf>,

    /// Sidecars without a rating.
    pub unrated: Vec<PathBuf>,

    /// Problems with single sidecars. None of these stopped the run.
    pub failures: Vec<CullFailure>,

    pub dry_run: bool,
}

/// One sidecar we couldn't fully handle.
#[derive(Clone, Debug)]
pub struct CullFailure {
    pub sidecar: PathBuf,
    pub kind: CullFailureKind,
}

#[derive(Clone, Debug)]
pub enum CullFailureKind {
    /// The sidecar couldn't be read.
    Extract(ExtractError),

    /// The sidecar is a reject, but doesn't name its raw file. Nothing was
    /// removed.
    NoRawFileName,

    /// The named raw file isn't a plain file name (it's absolute, or has
    /// directories in it). Nothing was removed.
    UnsafeRawFileName { name: String },

    /// Removing a file failed.
    Remove {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },
}

impl core::fmt::Display for CullFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sidecar = self.sidecar.display();
        match &self.kind {
            CullFailureKind::Extract(e) => write!(f, "`{sidecar}`: {e}"),
            CullFailureKind::NoRawFileName => {
                write!(f, "`{sidecar}` doesn't name its raw file")
            }
            CullFailureKind::UnsafeRawFileName { name } => write!(
                f,
                "`{sidecar}` names its raw file as `{name}`, which isn't a file name"
            ),
            CullFailureKind::Remove { path, source } => write!(
                f,
                "`{sidecar}`: couldn't remove `{}`. err: {source}",
                path.display()
            ),
        }
    }
}

/// A reason the cull couldn't run at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CullError {
    MissingDirectory { path: PathBuf },
}

impl core::fmt::Display for CullError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CullError::MissingDirectory { path } => {
                write!(f, "Target directory does not exist: `{}`", path.display())
            }
        }
    }
}

impl core::error::Error for CullError {}

/// Culls every sidecar under `dir`, recursively.
pub fn cull(dir: impl AsRef<Path>, options: &CullOptions) -> Result<CullReport, CullError> {
    let dir = dir.as_ref();
    log::info!("Target directory: `{}`", dir.display());

    if !dir.is_dir() {
        return Err(CullError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let sidecars = find_sidecars(dir);
    log::debug!("Found {} sidecar(s).", sidecars.len());

    // `par_iter` keeps the input order when collecting
    let records: Vec<Result<MetadataRecord, ExtractError>> = sidecars
        .par_iter()
        .map(|sidecar| Extractor.extract(sidecar))
        .collect();

    let mut report = CullReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for (sidecar, record) in sidecars.iter().zip(records) {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::error!("Couldn't read `{}`. err: {e}", sidecar.display());
                report.failures.push(CullFailure {
                    sidecar: sidecar.clone(),
                    kind: CullFailureKind::Extract(e),
                });
                continue;
            }
        };

        let Some(rating) = record.basic.rating else {
            log::debug!("No rating in sidecar: `{}`", sidecar.display());
            report.unrated.push(sidecar.clone());
            continue;
        };

        if rating != options.reject_rating {
            log::trace!("Keeping `{}` (rated {rating}).", sidecar.display());
            continue;
        }

        remove_pair(sidecar, record.develop.raw_file_name.as_deref(), options, &mut report);
    }

    report.scanned = sidecars;
    Ok(report)
}

/// Every `.xmp` file under `dir` (any case), sorted.
fn find_sidecars(dir: &Path) -> Vec<PathBuf> {
    let mut sidecars: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| {
            entry
                .inspect_err(|e| log::error!("Couldn't walk an entry. err: {e}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xmp"))
        })
        .collect();

    sidecars.sort();
    sidecars
}

/// Removes a rejected raw file, then its sidecar.
///
/// The raw file sits next to its sidecar. If it can't be found or removed, the
/// sidecar is kept so the pair can be found again.
fn remove_pair(
    sidecar: &Path,
    raw_file_name: Option<&str>,
    options: &CullOptions,
    report: &mut CullReport,
) {
    let fail = |kind| CullFailure {
        sidecar: sidecar.to_path_buf(),
        kind,
    };

    let Some(name) = raw_file_name else {
        log::error!(
            "Sidecar `{}` is a reject, but doesn't name its raw file. Keeping it.",
            sidecar.display()
        );
        report.failures.push(fail(CullFailureKind::NoRawFileName));
        return;
    };

    // only a bare file name may point at the sibling raw file
    if !is_bare_file_name(name) {
        log::error!(
            "Sidecar `{}` names its raw file as `{name}`, which isn't a plain file name. \
            Keeping both.",
            sidecar.display()
        );
        report.failures.push(fail(CullFailureKind::UnsafeRawFileName {
            name: name.to_owned(),
        }));
        return;
    }

    let raw = sidecar.parent().unwrap_or(Path::new("")).join(name);
    if let Err(failure) = remove(&raw, sidecar, options, report) {
        report.failures.push(failure);
        return;
    }

    if let Err(failure) = remove(sidecar, sidecar, options, report) {
        report.failures.push(failure);
    }
}

/// Whether `name` is exactly one normal path component, like `DSC0001.ARW`.
fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn remove(
    path: &Path,
    sidecar: &Path,
    options: &CullOptions,
    report: &mut CullReport,
) -> Result<(), CullFailure> {
    if options.dry_run {
        log::debug!("[DRY RUN]: Deleted: {}", path.display());
        report.removed.push(path.to_path_buf());
        return Ok(());
    }

    std::fs::remove_file(path).map_err(|e| {
        log::error!("Couldn't remove `{}`. err: {e}", path.display());
        CullFailure {
            sidecar: sidecar.to_path_buf(),
            kind: CullFailureKind::Remove {
                path: path.to_path_buf(),
                source: e.into(),
            },
        }
    })?;

    log::info!("Deleted: {}", path.display());
    report.removed.push(path.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{find_sidecars, is_bare_file_name};

    #[test]
    fn raw_file_names_must_be_bare() {
        assert!(is_bare_file_name("DSC04217.ARW"));
        assert!(is_bare_file_name("with space.ARW"));

        assert!(!is_bare_file_name(""));
        assert!(!is_bare_file_name("."));
        assert!(!is_bare_file_name(".."));
        assert!(!is_bare_file_name("../DSC04217.ARW"));
        assert!(!is_bare_file_name("raws/DSC04217.ARW"));
        assert!(!is_bare_file_name("/tmp/DSC04217.ARW"));
    }

    #[test]
    fn sidecar_search_is_recursive_sorted_and_case_insensitive() {
        crate::util::logger();

        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path();
        fs::create_dir(root.join("day2")).expect("subdir");

        for name in ["b.xmp", "a.XMP", "a.ARW", "notes.txt", "day2/c.Xmp"] {
            fs::write(root.join(name), b"").expect("write");
        }
        // a directory named like a sidecar isn't one
        fs::create_dir(root.join("odd.xmp")).expect("subdir");

        let found: Vec<_> = find_sidecars(root)
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(found, vec!["a.XMP", "b.xmp", "day2/c.Xmp"]);
    }
}
