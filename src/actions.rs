//! GitHub Actions step surface
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables. Outputs, log groups
//! and the failure message are written as workflow commands, with outputs
//! going to the `$GITHUB_OUTPUT` file when the runner provides one.

use rand::Rng;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable naming the step's output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Environment variable carrying the input `name`
///
/// Spaces become underscores and the name is upper-cased; hyphens are kept,
/// so `project-arn` is read from `INPUT_PROJECT-ARN`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read a step input from the environment
///
/// Returns `None` when the input is unset or blank; values are trimmed.
pub fn get_input(name: &str) -> Option<String> {
    get_input_from(name, |key| std::env::var(key).ok())
}

/// Read a step input through `lookup`
pub fn get_input_from<F>(name: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&input_env_name(name))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read a step input that must be supplied
pub fn get_required_input(name: &str) -> Result<String> {
    get_input(name).ok_or_else(|| {
        Error::config(name, format!("Input required and not supplied: {name}"))
    })
}

/// Writer for workflow commands
///
/// Commands go to `out` (stdout for a real step). Outputs are appended to
/// `output_file` when set, otherwise emitted as `::set-output`.
pub struct Workflow<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl Workflow<std::io::Stdout> {
    /// Writer for the current step: stdout plus `$GITHUB_OUTPUT` if present
    pub fn from_env() -> Self {
        let output_file = std::env::var_os(GITHUB_OUTPUT_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self::new(std::io::stdout(), output_file)
    }
}

impl<W: Write> Workflow<W> {
    /// Create a writer over `out`
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self { out, output_file }
    }

    /// Set a step output
    pub fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                let entry = file_command_entry(name, value)?;
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| Error::io_at(path, e))?;
                file.write_all(entry.as_bytes())
                    .map_err(|e| Error::io_at(path, e))?;
                Ok(())
            }
            None => {
                // Blank line first so the command starts at column zero
                writeln!(self.out)?;
                self.issue(&format!(
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                ))
            }
        }
    }

    /// Open a collapsible log group
    pub fn start_group(&mut self, name: &str) -> Result<()> {
        self.issue(&format!("::group::{}", escape_data(name)))
    }

    /// Close the current log group
    pub fn end_group(&mut self) -> Result<()> {
        self.issue("::endgroup::")
    }

    /// Report the step's failure message
    pub fn set_failed(&mut self, message: &str) -> Result<()> {
        self.issue(&format!("::error::{}", escape_data(message)))
    }

    /// Consume the writer, returning the command sink
    pub fn into_inner(self) -> W {
        self.out
    }

    fn issue(&mut self, command: &str) -> Result<()> {
        writeln!(self.out, "{command}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// `name<<delimiter\nvalue\ndelimiter\n` with a random delimiter
fn file_command_entry(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{:016x}", rand::thread_rng().r#gen::<u64>());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(Error::config(
            name,
            format!("Unexpected input: value should not contain the delimiter \"{delimiter}\""),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
