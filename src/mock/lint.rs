use super::Mock;
use crate::rpm::package_name;
use crate::rpmlint::{extract_report, render_script, LintReport};
use crate::sandbox::{CommandLine, CommandRunner};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

impl<R: CommandRunner> Mock<R> {
    /// Install rpmlint in the chroot and lint the packages behind `rpms`.
    ///
    /// The packages themselves must already be installed. Returns a failed
    /// report with diagnostic text when the session could not run.
    pub fn lint(&self, rpms: &[PathBuf]) -> LintReport {
        let mut linter = vec![PathBuf::from("rpmlint")];
        if let Err(err) = self.install(&mut linter) {
            return LintReport::failed(err.output());
        }

        let names: BTreeSet<String> = rpms.iter().map(|rpm| package_name(rpm)).collect();
        let names: Vec<String> = names.into_iter().collect();
        let script = render_script(&self.settings.config_flag(), &names);

        let output = match self.runner.run(&CommandLine::shell(&script)) {
            Ok(result) => result.output,
            Err(e) => return LintReport::failed(format!("{}\n", e)),
        };
        debug!(output = %output, "Script output");

        if let Some(message) = self.lint_check.check(&output) {
            return LintReport::failed(message);
        }

        LintReport::passed(extract_report(&output))
    }
}
