//! gdvn: read GDVN and write it back out, pretty-printed.
//!
//! Reads FILE, or standard input when no file is given.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use gdvalue::{GdvError, Parser, Value, WriteOptions};
use tracing::debug;

#[derive(ClapParser)]
#[command(name = "gdvn")]
#[command(about = "Read GDVN and write it back out, pretty-printed", long_about = None)]
struct Cli {
    /// Input file; standard input if omitted
    file: Option<PathBuf>,

    /// Target line width
    #[arg(short, long, default_value_t = 72)]
    width: usize,

    /// Write each value on a single line
    #[arg(short, long)]
    compact: bool,

    /// Write integers outside the 64-bit range in decimal instead of hex
    #[arg(long)]
    decimal: bool,

    /// Escape control characters as `\u{N}` rather than `\uNNNN`
    #[arg(long)]
    delimited_escapes: bool,

    /// Read and write every value in the input, not just one
    #[arg(short, long)]
    all: bool,

    /// Print the SHA-256 of each value's compact form instead of the value
    #[cfg(feature = "sha2")]
    #[arg(long)]
    sha256: bool,

    /// Write JSON instead of GDVN
    #[cfg(feature = "json")]
    #[arg(long, conflicts_with = "from_json")]
    to_json: bool,

    /// Read JSON instead of GDVN
    #[cfg(feature = "json")]
    #[arg(long)]
    from_json: bool,
}

impl Cli {
    fn write_options(&self) -> WriteOptions {
        WriteOptions::default()
            .with_indentation(!self.compact)
            .with_target_line_width(self.width)
            .with_large_integers_as_decimal(self.decimal)
            .with_undelimited_hex_escapes(!self.delimited_escapes)
    }

    fn file_name(&self) -> Option<String> {
        self.file.as_ref().map(|p| p.display().to_string())
    }

    fn open(&self) -> Result<Box<dyn Read>, GdvError> {
        match &self.file {
            Some(path) => {
                debug!(path = %path.display(), "reading input file");
                let file = File::open(path).map_err(|e| {
                    let err = GdvError::from(e);
                    let msg = format!("{}: {}", path.display(), err.message());
                    err.with_message(msg)
                })?;
                Ok(Box::new(io::BufReader::new(file)))
            }
            None => Ok(Box::new(io::stdin().lock())),
        }
    }

    /// Hand each input value to `f` as soon as it is read.
    fn for_each_value(
        &self,
        mut f: impl FnMut(&Value) -> Result<(), GdvError>,
    ) -> Result<usize, GdvError> {
        let input = self.open()?;

        #[cfg(feature = "json")]
        if self.from_json {
            let mut text = String::new();
            let mut input = input;
            input.read_to_string(&mut text)?;
            f(&gdvalue::json_to_gdv(&text)?)?;
            return Ok(1);
        }

        let file = self.file_name();
        let mut parser = Parser::new(input, file.as_deref());
        if !self.all {
            f(&parser.read_exactly_one_value()?)?;
            return Ok(1);
        }
        let mut count = 0;
        for value in parser.read_all() {
            f(&value?)?;
            count += 1;
        }
        Ok(count)
    }

    fn write_value(&self, out: &mut impl Write, value: &Value) -> Result<(), GdvError> {
        #[cfg(feature = "sha2")]
        if self.sha256 {
            writeln!(out, "{}", value.sha256_hex())?;
            return Ok(());
        }

        #[cfg(feature = "json")]
        if self.to_json {
            let text = if self.compact {
                gdvalue::gdv_to_json(value)?
            } else {
                gdvalue::gdv_to_json_pretty(value)?
            };
            writeln!(out, "{text}")?;
            return Ok(());
        }

        let opts = self.write_options();
        if self.compact {
            value.write(out, &opts)?;
            out.write_all(b"\n")?;
            Ok(())
        } else {
            value.write_lines(out, &opts)
        }
    }
}

fn run(cli: &Cli) -> Result<(), GdvError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = cli.for_each_value(|value| cli.write_value(&mut out, value));
    // Values written before a failure still reach stdout.
    out.flush()?;
    let count = result?;
    debug!(count, "wrote values");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GDVN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("gdvn: {e}");
        process::exit(2);
    }
}
