//! Packs a folder into zip archives that each stay under a size limit.
//!
//! Many upload targets cap the size of a single file, so a shoot of raw files
//! has to be split before it can go anywhere. Archives are written next to
//! the folder as `<folder>_1.zip`, `<folder>_2.zip`, and so on.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use zip::{CompressionMethod, ZipWriter, result::ZipError, write::SimpleFileOptions};

/// The default chunk size: 20 GiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 20 * 1024 * 1024 * 1024;

/// Splits `files` into consecutive groups whose sizes add up to at most `max`.
///
/// Files stay in the order given. A file bigger than `max` can't fit anywhere
/// else, so it gets a group to itself.
pub fn group_files(files: &[(PathBuf, u64)], max: u64) -> Vec<Vec<PathBuf>> {
    split_sized(files, max)
        .into_iter()
        .map(|group| group.iter().map(|(path, _)| path.clone()).collect())
        .collect()
}

/// Like [`group_files`], but each group borrows its run of `files`, sizes and
/// all.
fn split_sized(files: &[(PathBuf, u64)], max: u64) -> Vec<&[(PathBuf, u64)]> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut current_size = 0_u64;

    for (i, (path, size)) in files.iter().enumerate() {
        if i > start && current_size.saturating_add(*size) > max {
            groups.push(&files[start..i]);
            start = i;
            current_size = 0;
        }

        if *size > max {
            log::debug!(
                "`{}` ({size} bytes) is larger than the chunk size ({max} bytes).",
                path.display()
            );
        }

        current_size = current_size.saturating_add(*size);
    }

    if start < files.len() {
        groups.push(&files[start..]);
    }

    groups
}

/// Zips the regular files directly inside `dir` into size-limited archives.
///
/// Returns the paths of the archives written, in order. A directory with no
/// files (or one we can't list) produces no archives.
pub fn chunk_directory(dir: impl AsRef<Path>, max: u64) -> Result<Vec<PathBuf>, ChunkError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ChunkError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let files = list_files(dir);
    if files.is_empty() {
        log::error!("No files found in `{}`.", dir.display());
        return Ok(Vec::new());
    }

    let (parent, name) = archive_location(dir)?;
    let groups = split_sized(&files, max);
    log::debug!(
        "Packing {} file(s) from `{}` into {} archive(s).",
        files.len(),
        dir.display(),
        groups.len()
    );

    let mut archives = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let archive = parent.join(format!("{name}_{}.zip", i + 1));
        write_archive(&archive, group)?;
        log::info!("Created `{}`.", archive.display());
        archives.push(archive);
    }

    Ok(archives)
}

/// Lists the regular files in `dir` with their sizes, sorted by path.
///
/// Entries whose size can't be read are logged and left out.
fn list_files(dir: &Path) -> Vec<(PathBuf, u64)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Couldn't list `{}`. err: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<(PathBuf, u64)> = entries
        .flat_map(|entry| {
            entry
                .inspect_err(|e| {
                    log::error!("Couldn't read an entry of `{}`. err: {e}", dir.display())
                })
                .ok()
        })
        .filter_map(|entry| {
            let path = entry.path();
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => Some((path, meta.len())),
                Ok(_) => None,
                Err(e) => {
                    log::error!("Failed to get file size: `{}`. err: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    files.sort();
    files
}

/// Where archives for `dir` go, and the stem they share.
fn archive_location(dir: &Path) -> Result<(PathBuf, String), ChunkError> {
    // paths like `.` have no name of their own
    let dir = match dir.file_name() {
        Some(_) => dir.to_path_buf(),
        None => dir.canonicalize().map_err(|e| ChunkError::Io {
            path: dir.to_path_buf(),
            source: e.into(),
        })?,
    };

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("archive"));
    let parent = dir.parent().map(Path::to_path_buf).unwrap_or_default();

    Ok((parent, name))
}

/// Writes one archive holding every file in `group`.
///
/// On failure, whatever part of the archive was written is removed again.
fn write_archive(archive: &Path, group: &[(PathBuf, u64)]) -> Result<(), ChunkError> {
    let result = fill_archive(archive, group);

    if result.is_err() {
        match std::fs::remove_file(archive) {
            Ok(()) => log::warn!("Removed partial archive `{}`.", archive.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::error!(
                "Couldn't remove partial archive `{}`. err: {e}",
                archive.display()
            ),
        }
    }

    result
}

fn fill_archive(archive: &Path, group: &[(PathBuf, u64)]) -> Result<(), ChunkError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |e: std::io::Error| ChunkError::Io {
            path,
            source: e.into(),
        }
    };
    let zip_err = |e: ZipError| ChunkError::Zip {
        path: archive.to_path_buf(),
        source: e.into(),
    };

    let out = File::create(archive).map_err(io_err(archive))?;
    let mut writer = ZipWriter::new(BufWriter::new(out));

    for (path, size) in group {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(*size >= u64::from(u32::MAX));

        let entry_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::trace!("Adding `{entry_name}` to `{}`.", archive.display());
        writer.start_file(entry_name, options).map_err(zip_err)?;

        let mut input = File::open(path).map_err(io_err(path))?;
        std::io::copy(&mut input, &mut writer).map_err(io_err(path))?;
    }

    writer.finish().map_err(zip_err)?;
    Ok(())
}

/// A reason we couldn't finish chunking a directory.
#[derive(Clone, Debug)]
pub enum ChunkError {
    /// The directory doesn't exist (or isn't a directory).
    MissingDirectory { path: PathBuf },

    /// Reading a file or creating an archive failed.
    Io {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    /// The zip writer failed.
    Zip {
        path: PathBuf,
        source: Arc<ZipError>,
    },
}

impl core::fmt::Display for ChunkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChunkError::MissingDirectory { path } => {
                write!(f, "`{}` is not a valid directory.", path.display())
            }
            ChunkError::Io { path, source } => {
                write!(f, "I/O failed on `{}`. err: {source}", path.display())
            }
            ChunkError::Zip { path, source } => {
                write!(f, "Couldn't write archive `{}`. err: {source}", path.display())
            }
        }
    }
}

impl core::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ChunkError::MissingDirectory { .. } => None,
            ChunkError::Io { source, .. } => Some(source.as_ref()),
            ChunkError::Zip { source, .. } => Some(source.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::{ChunkError, group_files, split_sized, write_archive};

    fn sized(sizes: &[(&str, u64)]) -> Vec<(PathBuf, u64)> {
        sizes
            .iter()
            .map(|(name, size)| (PathBuf::from(name), *size))
            .collect()
    }

    fn names(groups: Vec<Vec<PathBuf>>) -> Vec<Vec<String>> {
        groups
            .into_iter()
            .map(|g| g.into_iter().map(|p| p.display().to_string()).collect())
            .collect()
    }

    #[test]
    fn fills_chunks_greedily_in_order() {
        crate::util::logger();

        let files = sized(&[("a", 5), ("b", 5), ("c", 5)]);
        assert_eq!(
            names(group_files(&files, 10)),
            vec![vec!["a", "b"], vec!["c"]]
        );
    }

    #[test]
    fn oversize_files_get_their_own_chunk() {
        crate::util::logger();

        let files = sized(&[("small", 3), ("huge", 25), ("tiny", 1)]);
        assert_eq!(
            names(group_files(&files, 10)),
            vec![vec!["small"], vec!["huge"], vec!["tiny"]]
        );

        // leading oversize file doesn't leave an empty chunk behind
        let files = sized(&[("huge", 25)]);
        assert_eq!(names(group_files(&files, 10)), vec![vec!["huge"]]);
    }

    #[test]
    fn exact_fit_stays_together() {
        crate::util::logger();

        let files = sized(&[("a", 4), ("b", 6), ("c", 0)]);
        assert_eq!(names(group_files(&files, 10)), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn no_files_no_chunks() {
        crate::util::logger();
        assert!(group_files(&[], 10).is_empty());
    }

    #[test]
    fn groups_keep_their_sizes() {
        crate::util::logger();

        let files = sized(&[("a", 5), ("b", 5), ("huge", 25), ("c", 2)]);
        let groups = split_sized(&files, 10);

        assert_eq!(groups, vec![&files[0..2], &files[2..3], &files[3..4]]);
    }

    #[test]
    fn failed_archive_is_removed() {
        crate::util::logger();

        let dir = tempfile::tempdir().expect("temp dir");
        let present = dir.path().join("a.ARW");
        let missing = dir.path().join("b.ARW");
        fs::write(&present, [1_u8; 5]).expect("write");

        let archive = dir.path().join("shoot_1.zip");
        let err = write_archive(&archive, &[(present, 5), (missing.clone(), 5)])
            .expect_err("second file is missing");

        assert!(matches!(err, ChunkError::Io { ref path, .. } if *path == missing), "{err}");
        assert!(!archive.exists(), "partial archive left behind");
    }
}
