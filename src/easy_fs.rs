use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::fs::{self, File};
use std::ffi::OsString;

use anyhow::{Result, Context, anyhow};

use crate::random_util::randomidstring;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dir,
    File,
    Other
}

pub fn easy_filenames_in_dir<P>(
    path: P
) -> Result<impl Iterator<Item = Result<(OsString, FileKind)>>>
where PathBuf: From<P>
{
    let pathbuf: PathBuf = path.into();
    Ok(fs::read_dir(&pathbuf).with_context(
        || anyhow!("can't open directory for reading: {:?}",
                   pathbuf.to_string_lossy()))?
       .map(
           move |entry_result: Result<fs::DirEntry, std::io::Error>|
                                      -> Result<(OsString, FileKind)>
           {
               let entry = entry_result.with_context(
                   || anyhow!("reading directory: {:?}", pathbuf.to_string_lossy()))?;
               let ft = entry.file_type().with_context(
                   || anyhow!("getting file type of {:?}", entry.path()))?;
               let filename = entry.file_name();
               Ok(
                   (
                       filename,
                       if ft.is_dir() {
                           FileKind::Dir
                       } else if ft.is_file() {
                           FileKind::File
                       } else {
                           FileKind::Other
                       }
                   ))
           }))
}


pub fn open_log_output<P>(
    path: P
) -> Result<Box<BufWriter<File>>>
where PathBuf: From<P>
{
    let mut outp = File::options();
    outp.write(true).append(true).create(true);
    let pathb = PathBuf::from(path);
    if let Some(parent) = pathb.parent() {
        let _ignore = std::fs::create_dir(parent);
    }
    Ok(Box::new(BufWriter::new(outp.open(&pathb).with_context(
        || anyhow!("opening log for output: {:?}", pathb.to_string_lossy()))?)))
}


/// Create a new file that, from the start, only the owner can read
/// or write. Fails if `path` exists.
#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    File::options().write(true).create_new(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    File::options().write(true).create_new(true).open(path)
}

/// The umask may have taken away bits from the creation mode.
#[cfg(unix)]
fn set_owner_only(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_file: &File) -> std::io::Result<()> {
    Ok(())
}

/// Write `contents` to `path` by way of a temporary file in the same
/// directory that is renamed over `path` once it is complete, so
/// readers see either the old or the new contents, never a mix. The
/// file ends up readable and writable by the owner only.
pub fn write_file_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let filename = path.file_name().ok_or_else(
        || std::io::Error::new(std::io::ErrorKind::InvalidInput,
                               format!("not a file path: {:?}", path)))?;
    let suffix = randomidstring().map_err(
        |e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let mut tmpname = OsString::from(".");
    tmpname.push(filename);
    tmpname.push(format!(".tmp-{suffix}"));
    let tmppath = dir.join(tmpname);

    let result = (|| -> std::io::Result<()> {
        let mut file = create_private_file(&tmppath)?;
        set_owner_only(&file)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmppath, path)
    })();
    if result.is_err() {
        let _ignore = fs::remove_file(&tmppath);
    }
    result
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_write_file_atomically() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("A.txt");
        write_file_atomically(&path, b"x")?;
        write_file_atomically(&path, b"yz")?;
        assert_eq!(fs::read(&path)?, b"yz");

        let names: Vec<_> = easy_filenames_in_dir(dir.path())?
            .collect::<Result<_>>()?;
        assert_eq!(names.len(), 1, "no temporary files left behind");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn t_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("B.txt");
        write_file_atomically(&path, b"")?;
        assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn t_create_private_file() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".D.txt.tmp");
        let file = create_private_file(&path)?;
        let mode = file.metadata()?.permissions().mode() & 0o777;
        assert_eq!(mode & 0o077, 0, "not accessible to others: {mode:o}");
        assert!(create_private_file(&path).is_err(), "refuses existing files");
        Ok(())
    }

    #[test]
    fn t_write_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("C.txt");
        assert!(write_file_atomically(&path, b"z").is_err());
    }
}
