//! External command execution.
//!
//! Runs the site's own build command (`[build].command`) between the stage
//! and finalize phases, forwarding its output through `log!`.

use crate::log;
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
};

// ============================================================================
// Macros
// ============================================================================

/// Run an external command with arguments in `root`.
///
/// # Examples
/// ```ignore
/// exec!(root; &config.build.command;)?;
/// exec!(root; &config.build.command; "--incremental")?;
/// ```
#[macro_export]
macro_rules! exec {
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {{
        $crate::utils::command::exec(
            Some($root),
            &$crate::utils::command::to_cmd_vec($cmd),
            &$crate::utils::command::filter_args(&[$(::std::ffi::OsString::from($arg)),*]),
        )
    }};
}

// ============================================================================
// Argument Conversion
// ============================================================================

/// Convert a configured command line to OS strings.
#[inline]
pub fn to_cmd_vec(cmd: &[String]) -> Vec<OsString> {
    cmd.iter().map(OsString::from).collect()
}

/// Drop empty args.
#[inline]
pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
    args.iter().filter(|a| !a.is_empty()).cloned().collect()
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if the command cannot be spawned or exits non-zero.
pub fn exec(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output)?;
    Ok(output)
}

fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let (program, rest) = cmd.split_first().context("Empty command")?;
    let name = program
        .to_str()
        .context("Command name is not valid UTF-8")?
        .to_owned();

    let mut command = Command::new(program);
    command.args(rest).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for build tool noise.
///
/// Matches lines that start with a prefix AND contain all required keywords.
struct FilterRule {
    /// Line must start with one of these (case-insensitive, after trim).
    starts_with: &'static [&'static str],
    /// Line must also contain ALL of these keywords (case-insensitive).
    contains: &'static [&'static str],
}

impl FilterRule {
    const fn new(starts_with: &'static [&'static str], contains: &'static [&'static str]) -> Self {
        Self { starts_with, contains }
    }

    fn matches(&self, line: &str) -> bool {
        let lower = line.trim().to_ascii_lowercase();
        let has_prefix = self.starts_with.is_empty()
            || self.starts_with.iter().any(|p| lower.starts_with(p));
        let has_keywords = self.contains.iter().all(|kw| lower.contains(kw));
        has_prefix && has_keywords
    }
}

struct OutputFilter {
    /// Lines matching any rule are dropped.
    line_rules: &'static [FilterRule],
}

impl OutputFilter {
    // Jekyll example:
    //   Configuration file: /site/docs/_config.yml
    //               Source: /site/docs
    //          Destination: /site/docs/_site
    //    Incremental build: disabled. Enable with --incremental
    //         Generating...
    //                       done in 0.412 seconds.
    //    Auto-regeneration: disabled. Use --watch to enable.
    const STDOUT: Self = Self {
        line_rules: &[
            FilterRule::new(&["configuration file:"], &[]),
            FilterRule::new(&["source:"], &[]),
            FilterRule::new(&["destination:"], &[]),
            FilterRule::new(&["incremental build:"], &[]),
            FilterRule::new(&["generating..."], &[]),
            FilterRule::new(&["done in"], &["seconds"]),
            FilterRule::new(&["auto-regeneration:"], &[]),
        ],
    };

    // Ruby/Bundler example:
    //   /gems/foo/lib/foo.rb:12: warning: URI.escape is obsolete
    const STDERR: Self = Self {
        line_rules: &[
            FilterRule::new(&[], &[": warning:", "is obsolete"]),
            FilterRule::new(&[], &[": warning:", "deprecated"]),
        ],
    };

    fn should_filter_line(&self, line: &str) -> bool {
        self.line_rules.iter().any(|r| r.matches(line))
    }

    fn log(&self, name: &str, output: &str) {
        for line in output.lines() {
            if !line.trim().is_empty() && !self.should_filter_line(line) {
                log!(name; "{}", line.trim());
            }
        }
    }

    /// Error text starting at the first non-noise line.
    fn extract_error<'a>(&self, stderr: &'a str) -> &'a str {
        stderr
            .lines()
            .find(|line| !line.trim().is_empty() && !self.should_filter_line(line))
            .map(|first| {
                let offset = first.as_ptr() as usize - stderr.as_ptr() as usize;
                &stderr[offset..]
            })
            .unwrap_or(stderr)
            .trim()
    }
}

/// Log command output, filtering known noise.
fn log_output(name: &str, output: &Output) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let error_msg = OutputFilter::STDERR.extract_error(stderr.trim());
        if !error_msg.is_empty() {
            eprintln!("{error_msg}");
        }
        anyhow::bail!("Command `{name}` failed with {}", output.status);
    }

    OutputFilter::STDOUT.log(name, stdout.trim());
    OutputFilter::STDERR.log(name, stderr.trim());

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_cmd_vec_config_command() {
        let cmd = to_cmd_vec(&command(&["bundle", "exec"]));
        assert_eq!(cmd, vec![OsString::from("bundle"), OsString::from("exec")]);
    }

    #[test]
    fn test_filter_args() {
        let args = [OsString::from("a"), OsString::from(""), OsString::from("b")];
        assert_eq!(filter_args(&args), vec![OsString::from("a"), OsString::from("b")]);
    }

    #[test]
    fn test_prepare_empty() {
        assert!(prepare(None, &[], &[]).is_err());
    }

    #[test]
    fn test_prepare_valid() {
        let cmd = to_cmd_vec(&command(&["jekyll", "build"]));
        let (name, command) = prepare(None, &cmd, &[OsString::from("--quiet")]).unwrap();

        assert_eq!(name, "jekyll");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["build", "--quiet"]);
    }

    #[test]
    fn test_stdout_noise_rules() {
        let filter = OutputFilter::STDOUT;
        assert!(filter.should_filter_line("Configuration file: /site/_config.yml"));
        assert!(filter.should_filter_line("            Source: /site"));
        assert!(filter.should_filter_line("                    done in 0.412 seconds."));
        assert!(!filter.should_filter_line("Liquid Exception: undefined variable"));
    }

    #[test]
    fn test_extract_error_skips_warnings() {
        let stderr = "/gems/a.rb:1: warning: URI.escape is obsolete\nLiquid Exception: oops\n  in page.md";
        assert_eq!(
            OutputFilter::STDERR.extract_error(stderr),
            "Liquid Exception: oops\n  in page.md"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_success_and_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(exec!(dir.path(); &command(&["true"]);).is_ok());

        let err = exec!(dir.path(); &command(&["false"]);).unwrap_err();
        assert!(format!("{err}").contains("`false` failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_in_root() {
        let dir = tempfile::TempDir::new().unwrap();
        exec!(dir.path(); &command(&["touch"]); "marker", "").unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
