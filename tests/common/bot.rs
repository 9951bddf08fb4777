//! Test bot management.
//!
//! Spawns the eppobot binary against a fake server with a throwaway
//! config and quote file.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tokio::time::timeout;

pub const NICK: &str = "Janeppo";
pub const CHANNEL: &str = "#eppo";

const QUOTES: &str = r#"[
  {"Name": "Erik", "Text": "Dat is een kwestie van smaak."},
  {"Name": "Harm", "Text": "Eerlijk duurt het langst."}
]"#;

/// A running bot process.
pub struct TestBot {
    child: Child,
    dir: TempDir,
}

impl TestBot {
    /// Start the bot against `server`.
    pub fn spawn(server: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let quotefile = dir.path().join("quotes.json");
        std::fs::write(&quotefile, QUOTES)?;

        let config_path = dir.path().join("config.toml");
        let config = format!(
            r#"
[bot]
nickname = "{NICK}"
server = "{server}"
channel = "{CHANNEL}"
quotefile = "{}"
seed = 7
"#,
            quotefile.display()
        );
        std::fs::write(&config_path, config)?;

        let child = Command::new(env!("CARGO_BIN_EXE_eppobot"))
            .arg(&config_path)
            .env("RUST_LOG", "eppobot=debug")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        Ok(Self { child, dir })
    }

    pub fn quote_path(&self) -> PathBuf {
        self.dir.path().join("quotes.json")
    }

    /// Wait for the process to exit on its own.
    pub async fn wait(&mut self, limit: Duration) -> anyhow::Result<ExitStatus> {
        Ok(timeout(limit, self.child.wait()).await??)
    }
}
