use crate::mock::Mock;
use crate::sandbox::CommandRunner;
use glob::Pattern;
use std::path::Path;

/// Number of files in `dir` named `<name>*<suffix>`.
pub fn count_matches(dir: &Path, name: &str, suffix: &str) -> usize {
    let pattern = format!(
        "{}/{}*{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(name),
        suffix
    );
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).count(),
        Err(_) => 0,
    }
}

/// True if `dir` holds at least one srpm and one more rpm for `name`.
pub fn has_cached_build(dir: &Path, name: &str) -> bool {
    if count_matches(dir, name, ".src.rpm") == 0 {
        return false;
    }
    count_matches(dir, name, ".rpm") >= 2
}

impl<R: CommandRunner> Mock<R> {
    /// Whether the result directory already holds a build of `name`.
    pub fn has_cached_build(&self, name: &str) -> bool {
        has_cached_build(&self.result_dir(), name)
    }
}
