use std::process::{Child, Command, Stdio};

use anyhow::Context as _;

/// Hands a view URL to something that can display it.
pub trait Navigator {
    fn navigate(&mut self, url: &str) -> anyhow::Result<()>;

    /// Called once when the UI exits.
    fn finish(&mut self) {}
}

/// Opens URLs with the desktop default handler, or with `command` when set.
#[derive(Debug, Default)]
pub struct SystemNavigator {
    command: Option<String>,
    spawned: Vec<Child>,
}

impl SystemNavigator {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command,
            spawned: Vec::new(),
        }
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        tracing::info!(url, "opening view");
        match self.command.as_deref() {
            Some(command) => {
                let child = spawn_command(command, url)?;
                self.spawned.push(child);
                self.spawned.retain_mut(|c| matches!(c.try_wait(), Ok(None)));
                Ok(())
            }
            None => open::that_detached(url).with_context(|| format!("open {url}")),
        }
    }

    fn finish(&mut self) {
        // Viewers outlive the UI; only collect the ones that already exited.
        for mut child in self.spawned.drain(..) {
            let _ = child.try_wait();
        }
    }
}

fn spawn_command(command: &str, url: &str) -> anyhow::Result<Child> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("open command is empty"))?;

    let mut cmd = Command::new(program);
    cmd.args(parts).arg(url);

    // Avoid having child inherit raw-mode stdin.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    cmd.spawn()
        .with_context(|| format!("spawn `{program}` for {url}"))
}
