//! # Program: a named group of identical worker replicas.
//!
//! A [`Program`] bundles a command line, an optional run-as user, and the
//! replica processes created for it. Processes are created eagerly at
//! registration time and the membership is immutable afterwards: the
//! supervisor iterates the list, it never grows or shrinks.
//!
//! Single replica keeps the bare program name; multiple replicas get a
//! 0-based suffix (`web-0`, `web-1`, …).

use std::sync::Arc;

use crate::config::Config;
use crate::events::Bus;
use crate::launch::{Launch, LaunchSpec};
use crate::output::OutputRef;
use crate::programs::Process;

/// A named logical service replicated into worker processes.
pub struct Program {
    name: String,
    command: String,
    username: Option<String>,
    processes: Vec<Arc<Process>>,
}

impl Program {
    pub(crate) fn new(
        name: &str,
        command: &str,
        replicas: usize,
        username: Option<&str>,
        launcher: Arc<dyn Launch>,
        output: OutputRef,
        bus: Bus,
        cfg: &Config,
    ) -> Self {
        let spec = LaunchSpec {
            command: command.to_string(),
            username: username.map(str::to_string),
        };
        let processes = (0..replicas.max(1))
            .map(|i| {
                let proc_name = if replicas > 1 {
                    format!("{name}-{i}")
                } else {
                    name.to_string()
                };
                Process::new(
                    proc_name,
                    spec.clone(),
                    launcher.clone(),
                    output.clone(),
                    bus.clone(),
                    cfg,
                )
            })
            .collect();

        Self {
            name: name.to_string(),
            command: command.to_string(),
            username: username.map(str::to_string),
            processes,
        }
    }

    /// Program name, unique within one supervisor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command line the replicas run.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Optional run-as user.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The replica processes, in replica-index order.
    pub fn processes(&self) -> &[Arc<Process>] {
        &self.processes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::testing::FakeLauncher;
    use crate::output::NullOutput;
    use std::time::Duration;

    fn program(name: &str, replicas: usize) -> Program {
        Program::new(
            name,
            "worker --serve",
            replicas,
            None,
            FakeLauncher::new(Duration::from_secs(1), 0),
            Arc::new(NullOutput),
            Bus::new(8),
            &Config::default(),
        )
    }

    #[test]
    fn replica_count_is_respected() {
        assert_eq!(program("web", 3).processes().len(), 3);
    }

    #[test]
    fn zero_replicas_clamp_to_one() {
        assert_eq!(program("web", 0).processes().len(), 1);
    }

    #[test]
    fn single_replica_keeps_the_program_name() {
        let p = program("web", 1);
        assert_eq!(p.processes()[0].name(), "web");
    }

    #[test]
    fn replicas_get_indexed_names() {
        let p = program("web", 2);
        let names: Vec<_> = p.processes().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["web-0", "web-1"]);
    }
}
