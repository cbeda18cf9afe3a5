//! Command-line parsing for `linregress`.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! modeling/math code. Defaults for the most common flags can also come from the
//! environment (or a `.env` file), e.g. `LINREGRESS_LAMBDA=0.5`.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "linregress",
    version,
    about = "Ordinary and ridge least squares regression on delimited numeric data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a linear model to INPUT (last column = target), print the equation and
    /// RMSE, and write fitted values and weights next to the input.
    Fit(FitArgs),
    /// Apply a saved model JSON to INPUT and write predictions.
    Predict(PredictArgs),
    /// Write synthetic single/multiple-input datasets for experimentation.
    Generate(GenerateArgs),
}

/// How to read delimited input.
#[derive(Debug, Args, Clone)]
pub struct CsvArgs {
    /// Field delimiter (a single ASCII character; `\t` or `tab` for tabs).
    #[arg(
        short = 'd',
        long,
        env = "LINREGRESS_DELIMITER",
        default_value = ",",
        value_parser = parse_delimiter
    )]
    pub delimiter: u8,

    /// Skip the first row of the input.
    #[arg(long)]
    pub header: bool,
}

/// Options for `linregress fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input file: one example per row, last column is the target.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Ridge penalty (0 = ordinary least squares).
    #[arg(
        short = 'l',
        long,
        env = "LINREGRESS_LAMBDA",
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_lambda
    )]
    pub lambda: f64,

    /// Number of decimals in printed and written values.
    #[arg(short = 'p', long = "prec", env = "LINREGRESS_PREC", default_value_t = 4)]
    pub prec: usize,

    #[command(flatten)]
    pub csv: CsvArgs,

    /// Fit without an intercept term.
    #[arg(long)]
    pub no_intercept: bool,

    /// Show the N largest positive and negative residuals.
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Render an ASCII plot of the data and fitted line (single feature only).
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the fitted model to JSON (for `linregress predict`).
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Do not write `.fittedvalues` / `.weights` files.
    #[arg(long)]
    pub no_write: bool,

    /// Unrecognized trailing arguments (ignored with a warning).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

/// Options for `linregress predict`.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Input file with the model's features (optionally followed by a target column).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Model JSON produced by `linregress fit --export-model`.
    #[arg(short = 'm', long, value_name = "JSON")]
    pub model: PathBuf,

    /// Number of decimals in printed and written values.
    #[arg(short = 'p', long = "prec", env = "LINREGRESS_PREC", default_value_t = 4)]
    pub prec: usize,

    #[command(flatten)]
    pub csv: CsvArgs,

    /// Output file (defaults to `<INPUT stem>.predictions`).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Unrecognized trailing arguments (ignored with a warning).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

/// Options for `linregress generate`.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Directory to write `single_input.csv` and `multiple_inputs.csv` into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of examples per dataset.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub n: usize,

    /// Random seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Noise std-dev for the single-input dataset.
    #[arg(long, default_value_t = 1.0)]
    pub sigma_single: f64,

    /// Noise std-dev for the multiple-input dataset.
    #[arg(long, default_value_t = 0.1)]
    pub sigma_multi: f64,
}

/// First token in `extra` that names one of `subcommand`'s own options.
///
/// Everything after a stray positional ends up in `extra`, including real
/// flags such as `--lambda 2`; those must not be dropped silently.
pub fn find_misplaced_option<'a>(subcommand: &str, extra: &'a [String]) -> Option<&'a str> {
    let cli = Cli::command();
    let cmd = cli.find_subcommand(subcommand)?;

    extra.iter().map(String::as_str).find(|token| {
        if let Some(long) = token.strip_prefix("--") {
            let name = long.split('=').next().unwrap_or(long);
            cmd.get_arguments().any(|a| a.get_long() == Some(name))
        } else if let Some(short) = token.strip_prefix('-') {
            short
                .chars()
                .next()
                .is_some_and(|c| cmd.get_arguments().any(|a| a.get_short() == Some(c)))
        } else {
            false
        }
    })
}

fn parse_lambda(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(format!("lambda must be finite and >= 0 (got {s})"))
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("delimiter must be a single ASCII character (got '{s}')")),
    }
}
