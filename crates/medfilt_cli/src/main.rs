//! Command-line wrapper for the median filter engine.
//!
//! Reads a matrix text file (or synthesizes a random matrix when no input
//! is given), runs the configured number of filter iterations across the
//! configured worker pool, and optionally writes the result. Flag errors
//! are reported with usage before the engine is ever invoked.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use log::info;
use medfilt_core::{median_filter, read_matrix, write_matrix, FilterConfig};
use ndarray::Array2;
use rand::prelude::*;

/// Fallback matrix shape when no input file is given.
const DEFAULT_ROWS: usize = 20;
const DEFAULT_COLS: usize = 20;

/// Fixed seed for the synthetic matrix, so repeat runs filter the same
/// input the way the original's unseeded rand() did.
const GENERATE_SEED: u64 = 1;

struct CliArgs {
    config: FilterConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [-t threads] [-k iterations] [-w window_size] [-i input] [-o output]");
    eprintln!("Options:");
    eprintln!("  -t <threads>     Number of worker threads (default: 1)");
    eprintln!("  -k <iterations>  Number of filter iterations (default: 1)");
    eprintln!("  -w <window_size> Odd filter window size (default: 3)");
    eprintln!("  -i <input>       Input file with matrix (default: random {DEFAULT_ROWS}x{DEFAULT_COLS} matrix)");
    eprintln!("  -o <output>      Output file for result (omit to skip writing)");
}

fn parse_flag_value(value: &str, name: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(format!("{name} must be a positive integer, got `{value}`")),
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut config = FilterConfig::default();
    let mut input = None;
    let mut output = None;

    let mut i = 0;
    while i < args.len() {
        let flag = &args[i];
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "-t" => config.workers = parse_flag_value(value, "thread count")?,
            "-k" => config.iterations = parse_flag_value(value, "iteration count")?,
            "-w" => config.window_size = parse_flag_value(value, "window size")?,
            "-i" => input = Some(PathBuf::from(value)),
            "-o" => output = Some(PathBuf::from(value)),
            other => return Err(format!("unknown option {other}")),
        }
        i += 2;
    }

    // Window shape is validated here too, so bad flags fail before any file
    // is touched.
    config.validate().map_err(|e| e.to_string())?;

    Ok(CliArgs {
        config,
        input,
        output,
    })
}

/// Synthetic fallback matrix: values in `[0, 100)` like the original
/// generator.
fn generate_matrix(rows: usize, cols: usize, seed: u64) -> Array2<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(0..100))
}

/// The two stdout metric lines reported after every run.
fn format_metrics(elapsed: Duration, rows: usize, cols: usize, config: &FilterConfig) -> String {
    format!(
        "Processing time: {:.2} ms\nParameters: rows={} cols={} window={} k={} threads={}\n",
        elapsed.as_secs_f64() * 1e3,
        rows,
        cols,
        config.window_size,
        config.iterations,
        config.workers
    )
}

fn run(cli: &CliArgs) -> medfilt_core::Result<()> {
    let input = match &cli.input {
        Some(path) => read_matrix(path)?,
        None => generate_matrix(DEFAULT_ROWS, DEFAULT_COLS, GENERATE_SEED),
    };
    let (height, width) = input.dim();
    info!(
        "matrix {}x{}, {} worker(s), {} iteration(s), window {}x{}",
        height,
        width,
        cli.config.workers,
        cli.config.iterations,
        cli.config.window_size,
        cli.config.window_size
    );

    let result = median_filter(input.view(), &cli.config)?;
    print!("{}", format_metrics(result.elapsed, height, width, &cli.config));

    if let Some(path) = &cli.output {
        write_matrix(path, result.output.view())?;
        info!("result written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("medfilt");

    let cli = match parse_args(&args[1..]) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
