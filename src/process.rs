//! External command execution.
//!
//! Every tool the pipeline drives (cmake, git, the IDE) goes through a
//! [`CommandRunner`], so stages never touch the process environment or the
//! current directory and tests can substitute a recording fake.

use colored::*;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::platform::probe::locate;

/// A fully specified command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status and captured stderr of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short human description of a failure, e.g. `exit code 1`.
    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Run to completion, streaming stdout and capturing stderr.
    fn run(&self, cmd: &CommandLine) -> io::Result<RunOutput>;

    /// Start a process and return immediately without waiting for it.
    fn spawn_detached(&self, cmd: &CommandLine) -> io::Result<()>;
}

/// Runs commands on the host, with an explicitly supplied search path.
pub struct SystemRunner {
    search_path: Option<OsString>,
    verbose: bool,
}

impl SystemRunner {
    pub fn new(search_path: Option<OsString>, verbose: bool) -> Self {
        Self {
            search_path,
            verbose,
        }
    }

    fn command(&self, cmd: &CommandLine) -> Command {
        let program = locate(&cmd.program, self.search_path.as_ref(), &cmd.cwd)
            .unwrap_or_else(|| PathBuf::from(&cmd.program));
        let mut command = Command::new(program);
        command.args(&cmd.args).current_dir(&cmd.cwd);
        if let Some(path) = &self.search_path {
            command.env("PATH", path);
        }
        command
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine) -> io::Result<RunOutput> {
        if self.verbose {
            println!("   {} {}", "$".dimmed(), cmd);
        }

        let output = self
            .command(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !stderr.is_empty() {
            eprint!("{}", stderr);
        }

        Ok(RunOutput {
            code: output.status.code(),
            stderr,
        })
    }

    fn spawn_detached(&self, cmd: &CommandLine) -> io::Result<()> {
        if self.verbose {
            println!("   {} {} &", "$".dimmed(), cmd);
        }
        self.command(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}
