use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use tracing_subscriber::EnvFilter;

use toy_disasm::{DecodeOptions, Program, TextFormatter};

/// Print the literal pools, function bodies and instructions of a Toy bytecode file
#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    /// Compiled bytecode file to disassemble
    file: PathBuf,
}

impl Default for Cli {
    fn default() -> Self {
        Self::parse()
    }
}

impl Cli {
    pub fn exec(self) -> miette::Result<()> {
        init_tracing();

        let program = Program::load(&self.file)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", self.file.display()))?;

        let mut formatter = TextFormatter::new();
        let result = program.disassemble(&DecodeOptions::default(), &mut formatter);

        // lines decoded before a failure are still printed
        let mut stdout = io::stdout().lock();
        stdout.write_all(formatter.as_str().as_bytes()).into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        result
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to disassemble {}", self.file.display()))?;

        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_path() {
        let cli = Cli::parse_from(["toy-disasm", "program.tb"]);
        assert_eq!(cli.file, PathBuf::from("program.tb"));
    }

    #[test]
    fn reject_missing_path() {
        assert!(Cli::try_parse_from(["toy-disasm"]).is_err());
    }

    #[test]
    fn reject_unknown_flags() {
        assert!(Cli::try_parse_from(["toy-disasm", "--strict", "program.tb"]).is_err());
    }
}
