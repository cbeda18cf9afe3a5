//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults and initializes logging
//! - parses CLI arguments
//! - runs the fit / predict / generate workflows
//! - prints reports/plots
//! - writes output files

use clap::Parser;

use crate::cli::{Command, FitArgs, GenerateArgs, PredictArgs};
use crate::domain::{CsvOptions, FitConfig, GenerateConfig, ModelFile, PredictConfig};
use crate::error::AppError;
use crate::io::export::{FITTED_VALUES_EXT, PREDICTIONS_EXT, WEIGHTS_EXT, derived_path, write_table_csv, write_values};

pub mod pipeline;

/// Entry point for the `linregress` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();

    // `linregress data.csv --lambda 1` behaves like `linregress fit data.csv --lambda 1`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    check_extra_args("fit", &args.extra)?;
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;
    let prec = config.precision;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.model, &run.quality, &config)?
    );

    if config.top_n > 0 {
        println!("{}", crate::report::format_rankings(&run.rankings, prec));
    }

    if config.plot {
        if run.ingest.n_features() == 1 {
            let plot = crate::plot::render_fit_plot(
                run.ingest.x.as_slice(),
                run.ingest.y.as_slice(),
                &run.model,
                config.plot_width,
                config.plot_height,
            )?;
            println!("{plot}");
        } else {
            log::warn!(
                "--plot needs exactly one feature column (input has {}); skipping plot",
                run.ingest.n_features()
            );
        }
    }

    if config.write_outputs {
        let fitted_path = derived_path(&config.input, FITTED_VALUES_EXT);
        let weights_path = derived_path(&config.input, WEIGHTS_EXT);
        write_values(&fitted_path, run.fitted.as_slice(), prec)?;
        write_values(&weights_path, run.model.weights()?.as_slice(), prec)?;
        println!("Fitted values: {}", fitted_path.display());
        println!("Weights      : {}", weights_path.display());
    }

    if let Some(path) = &config.export_model {
        let file = ModelFile::from_model(&run.model, Some(run.quality.clone()))?;
        crate::io::model::write_model_json(path, &file)?;
        println!("Model        : {}", path.display());
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    check_extra_args("predict", &args.extra)?;
    let config = predict_config_from_args(&args);
    let run = pipeline::run_predict(&config)?;
    let prec = config.precision;

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| derived_path(&config.input, PREDICTIONS_EXT));
    write_values(&output, run.predictions.as_slice(), prec)?;

    println!(
        "Predicted {} row(s) with model from {} (lambda={}, features={})",
        run.rows_used,
        config.model.display(),
        run.model.lambda,
        run.model.n_features,
    );
    if let Some(quality) = &run.quality {
        println!("RMSE: {:.prec$}", quality.rmse);
    }
    println!("Predictions: {}", output.display());

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = generate_config_from_args(&args);
    let data = crate::data::generate_synthetic(&config)?;

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output dir '{}': {e}", config.out_dir.display()))
    })?;

    let single = config.out_dir.join(crate::data::SINGLE_INPUT_FILE);
    let multiple = config.out_dir.join(crate::data::MULTIPLE_INPUTS_FILE);
    write_table_csv(&single, &data.single, b',')?;
    write_table_csv(&multiple, &data.multiple, b',')?;

    println!("Wrote {} rows to {}", config.n_examples, single.display());
    println!("Wrote {} rows to {}", config.n_examples, multiple.display());
    Ok(())
}

/// Unknown trailing arguments only warn, but an option swallowed after one is a usage error.
fn check_extra_args(subcommand: &str, extra: &[String]) -> Result<(), AppError> {
    if let Some(option) = crate::cli::find_misplaced_option(subcommand, extra) {
        return Err(AppError::new(
            2,
            format!(
                "Option '{option}' follows the unrecognized argument(s) '{}' and would be ignored; remove the stray argument(s).",
                extra.join(" ")
            ),
        ));
    }
    if !extra.is_empty() {
        log::warn!("ignoring unrecognized argument(s): {}", extra.join(" "));
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        lambda: args.lambda,
        precision: args.prec,
        csv: CsvOptions {
            delimiter: args.csv.delimiter,
            has_header: args.csv.header,
        },
        intercept: !args.no_intercept,
        top_n: args.top,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        write_outputs: !args.no_write,
        export_model: args.export_model.clone(),
    }
}

pub fn predict_config_from_args(args: &PredictArgs) -> PredictConfig {
    PredictConfig {
        input: args.input.clone(),
        model: args.model.clone(),
        precision: args.prec,
        csv: CsvOptions {
            delimiter: args.csv.delimiter,
            has_header: args.csv.header,
        },
        output: args.output.clone(),
    }
}

pub fn generate_config_from_args(args: &GenerateArgs) -> GenerateConfig {
    GenerateConfig {
        out_dir: args.out_dir.clone(),
        n_examples: args.n,
        seed: args.seed,
        sigma_single: args.sigma_single,
        sigma_multi: args.sigma_multi,
    }
}

/// Rewrite argv so `linregress` defaults to `linregress fit`.
///
/// Rules:
/// - `linregress data.csv ...`          -> `linregress fit data.csv ...`
/// - `linregress --lambda 1 data.csv`   -> `linregress fit --lambda 1 data.csv`
/// - `linregress`                       -> `linregress fit` (usage error: missing INPUT)
/// - `linregress --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "predict" | "generate");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "fit".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_fit() {
        assert_eq!(
            rewrite_args(argv(&["linregress", "data.csv", "--lambda", "1"])),
            argv(&["linregress", "fit", "data.csv", "--lambda", "1"])
        );
        assert_eq!(
            rewrite_args(argv(&["linregress", "--prec", "2", "data.csv"])),
            argv(&["linregress", "fit", "--prec", "2", "data.csv"])
        );
        assert_eq!(rewrite_args(argv(&["linregress"])), argv(&["linregress", "fit"]));
    }

    #[test]
    fn rewrite_keeps_subcommands_and_help() {
        for args in [
            &["linregress", "predict", "x.csv", "--model", "m.json"][..],
            &["linregress", "generate"][..],
            &["linregress", "--help"][..],
            &["linregress", "-V"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn option_after_stray_argument_is_a_usage_error() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&[
            "linregress", "data.csv", "typo", "--lambda", "2",
        ])))
        .unwrap();
        let Command::Fit(args) = cli.command else { panic!("expected fit") };

        let err = check_extra_args("fit", &args.extra).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("--lambda"), "{err}");

        assert!(check_extra_args("fit", &argv(&["typo", "--bogus"])).is_ok());
        assert!(check_extra_args("predict", &[]).is_ok());
    }

    #[test]
    fn subcommands_win_over_files_with_the_same_name() {
        let dir = std::env::temp_dir().join(format!("linregress-rewrite-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["fit", "predict", "generate"] {
            std::fs::write(dir.join(name), "1,2\n").unwrap();
        }
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(&dir).unwrap();

        let predict = rewrite_args(argv(&["linregress", "predict", "x.csv", "--model", "m.json"]));
        let fit = rewrite_args(argv(&["linregress", "fit", "data.csv"]));

        std::env::set_current_dir(previous).unwrap();

        assert_eq!(predict, argv(&["linregress", "predict", "x.csv", "--model", "m.json"]));
        assert_eq!(fit, argv(&["linregress", "fit", "data.csv"]));
        let cli = crate::cli::Cli::try_parse_from(predict).unwrap();
        let Command::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.input, std::path::PathBuf::from("x.csv"));
        assert!(args.extra.is_empty());
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&["linregress", "data.csv", "--lambda", "2"])))
            .unwrap();
        let Command::Fit(args) = cli.command else { panic!("expected fit") };
        let config = fit_config_from_args(&args);
        assert_eq!(config.lambda, 2.0);
        assert!(config.intercept);
        assert!(config.write_outputs);
        assert_eq!(
            derived_path(&config.input, WEIGHTS_EXT),
            std::path::PathBuf::from("data.weights")
        );
    }
}
