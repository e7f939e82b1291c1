use std::path::Path;

/// Package name of an rpm file or bare package name.
///
/// Strips the trailing `-version-release` pieces from the base name, so
/// `/tmp/foo-bar-1.0-1.fc40.noarch.rpm` gives `foo-bar`. A name without any
/// dash is returned unchanged.
pub fn package_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    base.rsplitn(3, '-').last().unwrap_or_default().to_string()
}
