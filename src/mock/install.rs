use super::Mock;
use crate::error::{MockError, Result};
use crate::rpm::package_name;
use crate::sandbox::{CommandLine, CommandRunner};
use std::path::PathBuf;
use tracing::{debug, warn};

impl<R: CommandRunner> Mock<R> {
    /// Whether `package` is in the chroot's rpm database.
    pub fn is_installed(&self, package: &str) -> Result<bool> {
        let cmd = CommandLine::new("rpm")
            .arg("--dbpath")
            .arg(self.rpmdb_dir()?.to_string_lossy())
            .arg("-q")
            .arg(package);
        debug!(command = %cmd, "Check install cmd");

        match self.runner.run(&cmd) {
            Ok(result) => Ok(result.success()),
            Err(e) => {
                warn!(command = %cmd, error = %e, "Cannot run rpm query");
                Ok(false)
            }
        }
    }

    /// Run `mock install` on the packages not yet in the chroot.
    ///
    /// Already installed entries are removed from `rpm_files` first; if none
    /// remain, mock is not invoked.
    pub fn install(&self, rpm_files: &mut Vec<PathBuf>) -> Result<()> {
        let mut installed = Vec::with_capacity(rpm_files.len());
        for file in rpm_files.iter() {
            let found = self.is_installed(&package_name(file))?;
            if found {
                debug!(package = %file.display(), "Removing already installed");
            }
            installed.push(found);
        }
        let mut flags = installed.into_iter();
        rpm_files.retain(|_| !flags.next().unwrap_or(false));

        if rpm_files.is_empty() {
            return Ok(());
        }

        let cmd = self
            .mock_command()
            .arg("install")
            .args(rpm_files.iter().map(|f| f.to_string_lossy().into_owned()));
        self.execute(&cmd, "Install")
    }

    /// Run `mock --init`.
    pub fn init(&self) -> Result<()> {
        let cmd = CommandLine::new("mock").arg("--init");
        self.execute(&cmd, "Init")
    }

    fn execute(&self, cmd: &CommandLine, what: &str) -> Result<()> {
        debug!(command = %cmd, "{} command", what);

        let result = match self.runner.run(cmd) {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %cmd, error = %e, "{} command could not be started", what);
                return Err(MockError::Launch {
                    command: cmd.to_string(),
                    output: e.to_string(),
                });
            }
        };
        debug!(output = %result.output, "{} output", what);

        if !result.success() {
            warn!(
                code = result.exit_code,
                "{} command returned error code {}",
                what,
                result.exit_code
            );
            return Err(MockError::CommandFailed {
                command: cmd.to_string(),
                code: result.exit_code,
                output: result.output,
            });
        }

        Ok(())
    }
}
