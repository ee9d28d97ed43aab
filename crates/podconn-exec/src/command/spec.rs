use std::fmt;

use tracing::trace;

use crate::ExecError;

/// A fully resolved external command.
#[derive(Clone)]
pub struct CommandSpec {
    /// Program to execute (e.g. `"kubectl"`, `"/usr/local/bin/aws"`).
    pub(crate) program: String,
    /// Command-line arguments passed to the program.
    pub(crate) args: Vec<String>,
    /// Extra environment entries; the parent environment is inherited.
    pub(crate) env: Vec<(String, String)>,
    /// Arguments carry a secret and must not be logged.
    pub(crate) sensitive: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            sensitive: false,
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

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Mark the arguments as secret-bearing.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    /// Rules:
    /// - `program` is not empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.trim().is_empty() {
            return Err(ExecError::InvalidCommand("program is empty".into()));
        }
        Ok(())
    }

    /// Emit a trace-level log with the command line (arguments redacted if sensitive).
    pub fn trace_state(&self) {
        if self.sensitive {
            trace!(program = %self.program, args = self.args.len(), "running command (args redacted)");
        } else {
            trace!(program = %self.program, args = ?self.args, env_len = self.env.len(), "running command");
        }
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("CommandSpec");
        d.field("program", &self.program);
        if self.sensitive {
            d.field("args", &"<redacted>");
        } else {
            d.field("args", &self.args);
        }
        d.field("env_len", &self.env.len()).finish()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandSpec(program='{}', args={}, env={})",
            self.program,
            self.args.len(),
            self.env.len(),
        )
    }
}
