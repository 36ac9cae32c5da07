use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tariffconv::run;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Convert the tariff spreadsheet into the JSON document the app ships with.
///
/// With no arguments the default repository layout is assumed, run from
/// `tools/tariffs/`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Spreadsheet to read (first worksheet)
    #[arg(requires = "output")]
    input: Option<PathBuf>,
    /// JSON file to write
    output: Option<PathBuf>,
}

impl Args {
    fn paths(self) -> (PathBuf, PathBuf) {
        match (self.input, self.output) {
            (Some(input), Some(output)) => (input, output),
            _ => (default_input(), default_output()),
        }
    }
}

fn default_input() -> PathBuf {
    ["..", "..", "..", "electricity_calc_extra", "Tarif_prices.xlsx"]
        .iter()
        .collect()
}

fn default_output() -> PathBuf {
    ["..", "..", "docs", "tariffs.json"].iter().collect()
}

fn main() -> Result<()> {
    // ─── 1) parse args; usage errors exit 1 ──────────────────────────
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            e.print().ok();
            eprintln!("Or run with no args to use default locations.");
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // ─── 2) init logging (stderr, stdout carries the summary) ────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 3) convert ──────────────────────────────────────────────────
    let (input, output) = args.paths();
    info!(input = %input.display(), output = %output.display(), "startup");
    let payload = run(&input, &output)?;

    println!(
        "OK: wrote {} with {} region-periods",
        output.display(),
        payload.regions.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_uses_defaults() {
        let args = Args::try_parse_from(["tariffconv"]).unwrap();
        let (input, output) = args.paths();
        assert!(input.ends_with("electricity_calc_extra/Tarif_prices.xlsx"));
        assert!(output.ends_with("docs/tariffs.json"));
    }

    #[test]
    fn two_args_are_input_and_output() {
        let args = Args::try_parse_from(["tariffconv", "in.xlsx", "out.json"]).unwrap();
        assert_eq!(
            args.paths(),
            (PathBuf::from("in.xlsx"), PathBuf::from("out.json"))
        );
    }

    #[test]
    fn other_arities_are_usage_errors() {
        for argv in [
            vec!["tariffconv", "in.xlsx"],
            vec!["tariffconv", "a", "b", "c"],
        ] {
            let err = Args::try_parse_from(argv).unwrap_err();
            assert!(err.use_stderr());
        }
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
