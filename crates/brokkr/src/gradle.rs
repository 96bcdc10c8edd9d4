//! Build-tool process runner
//!
//! Commands that drive the workspace build prefer the workspace's own
//! `gradlew` wrapper and fall back to a `gradle` on PATH. The runner is a
//! narrow collaborator: it resolves the tool, runs one task list in the
//! workspace directory, and reports failure as an error.

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Runs build tasks in one workspace directory
pub struct GradleRunner {
    workspace_dir: Utf8PathBuf,
}

impl GradleRunner {
    pub fn new(workspace_dir: &Utf8Path) -> Self {
        Self {
            workspace_dir: workspace_dir.to_path_buf(),
        }
    }

    /// Resolve the gradle executable: wrapper first, then PATH
    fn executable(&self) -> Result<Utf8PathBuf> {
        let wrapper = self.workspace_dir.join(if cfg!(windows) {
            "gradlew.bat"
        } else {
            "gradlew"
        });
        if wrapper.is_file() {
            return Ok(wrapper);
        }

        which::which("gradle")
            .map_err(|_| anyhow!("No gradlew wrapper in {} and no gradle on PATH", self.workspace_dir))
            .and_then(|p| {
                Utf8PathBuf::from_path_buf(p).map_err(|p| anyhow!("Non UTF-8 gradle path: {}", p.display()))
            })
    }

    /// Run a gradle task list, inheriting the terminal
    pub fn run(&self, args: &[String]) -> Result<()> {
        let executable = self.executable()?;
        debug!("Running {} {:?} in {}", executable, args, self.workspace_dir);

        let output = duct::cmd(executable.as_std_path(), args)
            .dir(self.workspace_dir.as_std_path())
            .unchecked()
            .run()
            .with_context(|| format!("Failed to run {}", executable))?;

        if !output.status.success() {
            return Err(anyhow!(
                "gradle {} failed with status {}",
                args.join(" "),
                output.status.code().unwrap_or(-1)
            ));
        }

        Ok(())
    }
}
