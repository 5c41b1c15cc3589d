//! Small file helpers shared by the stores.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use crate::{Error, Result};

pub fn persistence(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Error {
  let path = path.to_path_buf();
  move |source| Error::Persistence { action, path, source }
}

/// Read `path` as UTF-8, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(text) => Ok(Some(text)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(persistence("read", path)(e)),
  }
}

/// Replace `path` with `bytes` via a sibling temp file and a rename, creating
/// parent directories as needed. A failed write leaves the old file intact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(persistence("create directory", parent))?;
  }
  let tmp_path = tmp_path(path);
  fs::write(&tmp_path, bytes).map_err(persistence("write", &tmp_path))?;
  fs::rename(&tmp_path, path).map_err(persistence("replace", path))?;
  Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}
