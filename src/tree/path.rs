//! Archive entry path normalization

use unicode_normalization::UnicodeNormalization;

/// Normalize an archive entry name into the canonical tree path
///
/// This function:
/// 1. Normalizes Unicode to NFC
/// 2. Drops empty and `.` components (so `./usr//bin/` becomes `/usr/bin`)
/// 3. Prefixes a single `/`
/// 4. Removes trailing slashes (the root stays `/`)
///
/// `..` components are kept verbatim; resolving them is the tree builder's call.
pub fn normalize_entry_path(name: &str) -> String {
    let normalized: String = name.nfc().collect();

    let mut result = String::with_capacity(normalized.len() + 1);
    for component in normalized
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
    {
        result.push('/');
        result.push_str(component);
    }

    if result.is_empty() {
        result.push('/');
    }
    result
}
