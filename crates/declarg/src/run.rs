//! Process-level wrapper around [`Parser::parse`].

use std::io::{self, Write};
use std::process::ExitCode;

use crate::parser::{ParseOutcome, ParseResult, Parser, env_tokens};

/// Hint printed after every parse error.
pub const HELP_HINT: &str = "Use --help for usage information.";

/// Print what a parse result means for the user and pick the exit code.
///
/// Help and version text go to `stdout`; errors and the help hint go to
/// `stderr`. A successful parse prints nothing.
pub fn report<O, E>(result: &ParseResult, stdout: &mut O, stderr: &mut E) -> io::Result<ExitCode>
where
    O: Write,
    E: Write,
{
    match result {
        Ok(ParseOutcome::Matches(_)) => Ok(ExitCode::SUCCESS),
        Ok(ParseOutcome::Help(text) | ParseOutcome::Version(text)) => {
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            writeln!(stderr, "Error: {err}")?;
            writeln!(stderr, "{HELP_HINT}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

impl Parser {
    /// Parse `tokens` and turn the result into an exit code.
    pub async fn run<I, S>(&self, tokens: I) -> ExitCode
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = self.parse(tokens).await;
        report(&result, &mut io::stdout().lock(), &mut io::stderr().lock())
            .unwrap_or(ExitCode::FAILURE)
    }

    /// [`Parser::run`] over the process arguments.
    pub async fn run_env(&self) -> ExitCode {
        let result = match env_tokens() {
            Ok(tokens) => self.parse(tokens).await,
            Err(err) => Err(err),
        };
        report(&result, &mut io::stdout().lock(), &mut io::stderr().lock())
            .unwrap_or(ExitCode::FAILURE)
    }
}
