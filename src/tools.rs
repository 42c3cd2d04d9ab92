use std::path::PathBuf;

/// Search PATH and the standard system binary dirs for a utility.
///
/// Several diagnostic utilities (netstat, pmset, ss) live in sbin
/// directories that restricted PATHs omit.
pub fn find(name: &str) -> Option<PathBuf> {
    // Check PATH first
    if let Some(p) = find_in_path(name) {
        return Some(p);
    }

    let system_dirs = ["/usr/sbin", "/sbin", "/usr/local/bin", "/opt/homebrew/bin"];
    for dir in &system_dirs {
        let p = PathBuf::from(dir).join(name);
        if p.is_file() {
            return Some(p);
        }
    }

    None
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    })
}
