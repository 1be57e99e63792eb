use std::path::{Path, PathBuf};

pub trait PathExt {
    /// Last path component, or the whole path when there is none (`/`, `.`).
    fn base_label(&self) -> String;
}

impl PathExt for Path {
    fn base_label(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; on an unknown variable the path is returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}
