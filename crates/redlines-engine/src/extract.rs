//! Bundled archive extraction.
//!
//! Unpacks a whole `.tar.gz` or `.zip` artifact into a target directory.
//! Entry names are sanitized so a malformed archive cannot write outside the
//! target.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, warn};
use tar::Archive;
use zip::ZipArchive;

use crate::artifact::ArchiveKind;
use crate::error::{EngineError, EngineResult};

/// Strips `..`, `.`, root and drive prefixes from an archive entry name.
///
/// Returns None if nothing is left.
fn sanitize_path(name: &str) -> Option<PathBuf> {
    let mut sanitized = PathBuf::new();

    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            sanitized.push(part);
        }
    }

    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Extracts every entry of `archive` into `dest`.
///
/// Returns the number of entries written.
pub fn extract_archive(archive: &Path, kind: ArchiveKind, dest: &Path) -> EngineResult<usize> {
    debug!(
        "Extracting {} ({:?}) into {}",
        archive.display(),
        kind,
        dest.display()
    );

    let with_context = |source: io::Error| EngineError::Extract {
        archive: archive.to_path_buf(),
        source,
    };

    match kind {
        ArchiveKind::TarGz => extract_tar_gz(archive, dest).map_err(with_context),
        ArchiveKind::Zip => extract_zip(archive, dest, with_context),
    }
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> io::Result<usize> {
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut written = 0;
    for entry in tar.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();

        // unpack_in refuses entries that would escape dest
        if entry.unpack_in(dest)? {
            written += 1;
        } else {
            warn!(
                "Skipping archive entry outside target: {}",
                entry_path.display()
            );
        }
    }

    Ok(written)
}

fn extract_zip(
    archive: &Path,
    dest: &Path,
    with_context: impl Fn(io::Error) -> EngineError,
) -> EngineResult<usize> {
    let file = File::open(archive).map_err(&with_context)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let raw_name = entry.name().to_string();

        let Some(relative) = sanitize_path(&raw_name) else {
            warn!("Skipping invalid archive entry: {raw_name}");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(&with_context)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(&with_context)?;
        }
        let mut out = File::create(&out_path).map_err(&with_context)?;
        io::copy(&mut entry, &mut out).map_err(&with_context)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(&with_context)?;
        }

        written += 1;
    }

    Ok(written)
}

/// Adds execute permission to `path` if it is missing.
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    let mode = perms.mode();
    if mode & 0o111 != 0o111 {
        perms.set_mode(mode | 0o755);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn ensure_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
