use std::path::{Component, Path, PathBuf};

/// Resolves a path captured from zig output against the working directory.
///
/// The path is joined onto `cwd` only when it is relative, `cwd` is not empty,
/// and `cwd` is itself absolute. Anything else is returned unchanged. The join
/// is lexical: `.` is dropped and `..` pops a component, the filesystem is never
/// consulted.
///
/// # Example
/// ```
/// use zig_e::resolve_file_path;
///
/// assert_eq!(resolve_file_path("/p", "src/main.zig"), "/p/src/main.zig");
/// assert_eq!(resolve_file_path("/p", "/other/main.zig"), "/other/main.zig");
/// assert_eq!(resolve_file_path("", "src/main.zig"), "src/main.zig");
/// assert_eq!(resolve_file_path("relative", "src/main.zig"), "src/main.zig");
/// ```
pub fn resolve_file_path(cwd: &str, file: &str) -> String {
    let path = Path::new(file);
    if path.is_absolute() || cwd.is_empty() {
        return file.to_string();
    }
    let base = Path::new(cwd);
    if !base.is_absolute() {
        return file.to_string();
    }
    normalize(&base.join(path)).to_string_lossy().into_owned()
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // never pops past the root
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
