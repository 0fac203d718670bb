use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::info;
use netview_comm::{leader_step, Communicator};
use netview_core::{ErrorInfo, NetError};

use crate::flags::{flags_to_args, ViewerFlag};

/// Command line of the external renderer:
/// `<python> <script> <flags...> <artifact>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerCommand {
    python: String,
    script: PathBuf,
    args: Vec<String>,
    artifact: PathBuf,
}

impl ViewerCommand {
    pub fn new(
        python: impl Into<String>,
        script: impl Into<PathBuf>,
        flags: &[ViewerFlag],
        artifact: &Path,
    ) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
            args: flags_to_args(flags),
            artifact: artifact.to_path_buf(),
        }
    }

    /// Renderer arguments between the script and the artifact.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Space-joined command line, for logs and diagnostics.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.python.clone(), self.script.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.push(self.artifact.display().to_string());
        parts.join(" ")
    }

    /// Collective. The leader runs the renderer and relays its standard
    /// output to `out` verbatim, line by line; a spawn failure or non-zero
    /// exit fails every rank.
    pub fn run<C, W>(&self, comm: &C, out: &mut W) -> Result<(), NetError>
    where
        C: Communicator + ?Sized,
        W: Write + ?Sized,
    {
        leader_step(comm, "viewer", || self.run_here(out))?;
        Ok(())
    }

    fn run_here<W>(&self, out: &mut W) -> Result<(), NetError>
    where
        W: Write + ?Sized,
    {
        let command_line = self.command_line();
        info!("launching viewer: {command_line}");
        let mut child = Command::new(&self.python)
            .arg(&self.script)
            .args(&self.args)
            .arg(&self.artifact)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| {
                NetError::External(
                    ErrorInfo::new("viewer-spawn", err.to_string())
                        .with_context("command", command_line.clone()),
                )
            })?;

        let relayed = match child.stdout.take() {
            Some(stdout) => relay(BufReader::new(stdout), out),
            None => Ok(()),
        };
        if relayed.is_err() {
            // stop a child that would block on a pipe nobody reads
            let _ = child.kill();
        }
        let status = child.wait().map_err(|err| {
            NetError::External(
                ErrorInfo::new("viewer-wait", err.to_string())
                    .with_context("command", command_line.clone()),
            )
        })?;
        relayed?;
        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "signal".to_string(), |code| code.to_string());
            return Err(NetError::External(
                ErrorInfo::new("viewer-exit", "external renderer exited unsuccessfully")
                    .with_context("command", command_line)
                    .with_context("status", code),
            ));
        }
        Ok(())
    }
}

fn relay<R, W>(mut reader: R, out: &mut W) -> Result<(), NetError>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|err| NetError::io("viewer-output", err))?;
        if read == 0 {
            break;
        }
        out.write_all(&line)
            .map_err(|err| NetError::io("viewer-output", err))?;
    }
    out.flush().map_err(|err| NetError::io("viewer-output", err))
}
