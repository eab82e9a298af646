use std::path::PathBuf;

/// Collapse runs of `/` and strip the offline-root prefix, so that recorded
/// targets are expressed relative to the virtual root.
///
/// Operates on the string only; the path does not need to exist.
pub fn normalize(path: &str, offline_root: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut prev_sep = false;
    for ch in path.chars() {
        if ch == '/' {
            if prev_sep {
                continue;
            }
            prev_sep = true;
        } else {
            prev_sep = false;
        }
        collapsed.push(ch);
    }

    if !offline_root.is_empty()
        && let Some(stripped) = collapsed.strip_prefix(offline_root)
    {
        return stripped.to_string();
    }
    collapsed
}

/// Real location of a virtual path beneath the offline root.
///
/// The root is prepended verbatim, the same way the link path is resolved
/// when it is read back from a record.
pub fn under_root(offline_root: &str, virtual_path: &str) -> PathBuf {
    PathBuf::from(format!("{offline_root}{virtual_path}"))
}

/// A record name must stay inside the registry directory.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\0')
}
