use super::{CommandLine, CommandRunner, ProcessResult};
use std::io::Read;
use std::process::{Command, Stdio};

/// Runs commands on the host with stdout and stderr sharing one pipe.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine) -> std::io::Result<ProcessResult> {
        let (mut reader, writer) = std::io::pipe()?;

        // The Command holds write ends of the pipe; it must be dropped before
        // reading or read_to_end never sees EOF.
        let mut child = {
            let mut command = Command::new(&cmd.program);
            command
                .args(&cmd.args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            command.spawn()?
        };

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        Ok(ProcessResult {
            exit_code: status.code().unwrap_or(-1),
            output: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}
