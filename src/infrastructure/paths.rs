//! Path utilities for trace and data files.

use std::env;
use std::path::PathBuf;

/// Directory name used under the platform data directory.
const APP_DIR_NAME: &str = "themeapp";

/// Returns the directory for trace files.
///
/// Resolution order:
/// 1. `configured`, with a leading `~` expanded
/// 2. `$XDG_DATA_HOME/themeapp`
/// 3. `~/.local/share/themeapp`
/// 4. `./.themeapp` when no home directory is known
#[must_use]
pub fn data_dir(configured: Option<&str>) -> PathBuf {
    if let Some(path) = configured {
        return PathBuf::from(expand_tilde(path));
    }

    if let Some(xdg) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }

    home_dir().map_or_else(
        || PathBuf::from(".").join(format!(".{APP_DIR_NAME}")),
        |home| home.join(".local").join("share").join(APP_DIR_NAME),
    )
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~`, or with no known home directory, are returned
/// unchanged. `~user` forms are not supported.
///
/// # Examples
///
/// ```
/// use themeapp::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_wins() {
        assert_eq!(data_dir(Some("/srv/theme")), PathBuf::from("/srv/theme"));
    }

    #[test]
    fn non_tilde_paths_are_untouched() {
        assert_eq!(expand_tilde("relative/dir"), "relative/dir");
        assert_eq!(expand_tilde("/abs/~/dir"), "/abs/~/dir");
        assert_eq!(expand_tilde("~user/dir"), "~user/dir");
    }
}
