use log::{debug, trace};
use std::{
    env,
    path::{Component, Path, PathBuf},
};

/// Name babel gets for a file: its path relative to the working directory,
/// or the path as given when the two share no root.
pub(crate) fn relativize_to_cwd(path: &Path) -> String {
    let relative = match env::current_dir() {
        Ok(cwd) => relative_to(path, &cwd),
        Err(e) => {
            debug!("Failed to get current directory: {}", e);
            None
        }
    };
    let name = relative.as_deref().unwrap_or(path).to_string_lossy().to_string();
    trace!("Babel filename for {} is '{}'", path.display(), name);
    name
}

/// `target` expressed relative to the directory `base`. Both must be absolute.
pub(crate) fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    if target.first() != base.first() {
        return None;
    }

    let shared = target.iter().zip(&base).take_while(|(t, b)| t == b).count();
    let mut result: PathBuf = base[shared..].iter().map(|_| Component::ParentDir).collect();
    result.extend(&target[shared..]);

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}
