//! Optional autohinting through the external `ttfautohint` tool

use anyhow::{anyhow, Result};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

pub const TTFAUTOHINT: &str = "ttfautohint";

pub struct Autohinter {
    program: String,
}

impl Default for Autohinter {
    fn default() -> Self {
        Self::new(TTFAUTOHINT)
    }
}

impl Autohinter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the hinter over a TrueType font
    pub async fn hint(&self, ttf: &[u8]) -> Result<Vec<u8>> {
        let temp_dir = tempfile::tempdir()?;
        let input = temp_dir.path().join("unhinted.ttf");
        let output = temp_dir.path().join("hinted.ttf");
        fs::write(&input, ttf).await?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-info").arg(&input).arg(&output);

        let result = cmd
            .output()
            .await
            .map_err(|e| anyhow!("failed to run {}: {}", self.program, e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!("{} failed: {}", self.program, stderr.trim()));
        }

        Ok(fs::read(&output).await?)
    }

    /// Hint the font, keeping it unhinted when the tool is missing or fails
    pub async fn hint_or_keep(&self, ttf: Vec<u8>) -> Vec<u8> {
        match self.hint(&ttf).await {
            Ok(hinted) => {
                debug!("Autohinted font: {} -> {} bytes", ttf.len(), hinted.len());
                hinted
            }
            Err(e) => {
                warn!("Autohinting skipped, keeping unhinted font: {}", e);
                ttf
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_keeps_font() {
        let hinter = Autohinter::new("iconforge-no-such-hinter");
        let ttf = vec![0, 1, 0, 0];
        assert!(hinter.hint(&ttf).await.is_err());
        assert_eq!(hinter.hint_or_keep(ttf.clone()).await, ttf);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_tool_keeps_font() {
        let hinter = Autohinter::new("false");
        let ttf = vec![0, 1, 0, 0];
        assert_eq!(hinter.hint_or_keep(ttf.clone()).await, ttf);
    }
}
