//! `kubectl`-backed discovery and probe.
mod discovery;
pub use discovery::{KubectlDiscovery, parse_pod_table};

mod probe;
pub use probe::{KubectlProbe, parse_count, probe_script};

use crate::CommandSpec;

/// How to invoke `kubectl`: program plus arguments prepended to every call
/// (e.g. `--context`, `--kubeconfig`).
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
    base_args: Vec<String>,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self {
            program: "kubectl".to_string(),
            base_args: Vec::new(),
        }
    }
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).args(self.base_args.iter().cloned())
    }
}
