use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Format a rendered Rust buffer through `rustfmt`.
///
/// A formatter rejection always indicates a bug in a template or helper, so
/// the error carries rustfmt's stderr for diagnosis.
pub(crate) fn format_source(source: &str) -> anyhow::Result<String> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("failed to spawn rustfmt")?;

    {
        let mut stdin = child.stdin.take().context("rustfmt stdin unavailable")?;
        stdin
            .write_all(source.as_bytes())
            .context("failed to pipe source to rustfmt")?;
    }

    let output = child
        .wait_with_output()
        .context("failed to wait for rustfmt")?;
    if !output.status.success() {
        anyhow::bail!(
            "rustfmt rejected generated code: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("rustfmt produced non-UTF-8 output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_source_normalizes() {
        let formatted = format_source("fn main(){let x=1;}").unwrap();
        assert!(formatted.contains("let x = 1;"));
    }

    #[test]
    fn test_format_source_rejects_invalid() {
        let err = format_source("fn main( {").unwrap_err();
        assert!(err.to_string().contains("rustfmt"));
    }
}
