use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Build the URL the review tool uses to fetch a medium: `prefix` followed
/// by `path` relative to `root`, with `/` separators.
///
/// Relative `path`s are taken as already relative to `root`.
pub fn media_url(prefix: &str, root: &Path, path: &Path) -> Result<String> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root).map_err(|_| Error::OutsideMediaRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?
    } else {
        path
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::OutsideMediaRoot {
                    path: path.to_path_buf(),
                    root: root.to_path_buf(),
                });
            }
        }
    }

    Ok(format!("{}{}", prefix, parts.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PREFIX: &str = "/data/local-files/?d=data/";

    #[test]
    fn test_absolute_path_under_root() {
        let url =
            media_url(PREFIX, Path::new("/data"), Path::new("/data/videos/clip 1.mp4")).unwrap();
        assert_eq!(url, "/data/local-files/?d=data/videos/clip 1.mp4");
    }

    #[test]
    fn test_relative_path() {
        let url = media_url(PREFIX, Path::new("/data"), Path::new("./videos/a.mp4")).unwrap();
        assert_eq!(url, "/data/local-files/?d=data/videos/a.mp4");
    }

    #[test]
    fn test_root_with_trailing_slash() {
        let url = media_url("p:", Path::new("/data/"), Path::new("/data/a.avi")).unwrap();
        assert_eq!(url, "p:a.avi");
    }

    #[test]
    fn test_outside_root() {
        assert_matches!(
            media_url(PREFIX, Path::new("/data"), Path::new("/other/a.mp4")),
            Err(Error::OutsideMediaRoot { .. })
        );
        assert_matches!(
            media_url(PREFIX, Path::new("/data"), Path::new("../a.mp4")),
            Err(Error::OutsideMediaRoot { .. })
        );
    }
}
