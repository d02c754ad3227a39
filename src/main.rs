#![deny(missing_docs)]

//! Command line MFCC extraction for WAV files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use cepstra::audio::load_wav_mono;
use cepstra::config::FeatureSettings;
use cepstra::logging::{self, LoggingOptions};
use cepstra::mfcc_feats;
use cepstra::output::MfccMatrix;

const USAGE: &str = "Usage: cepstra <input.wav> [options]

Options:
  --config <path>          TOML settings file
  --output <path>          Write features to a file instead of stdout
  --format <json|csv>      Output format (default: json)
  --no-energy              Keep cepstral coefficient 0 instead of log-energy
  --pre-emphasis <f|off>   Pre-emphasis factor, or off
  --filters <n>            Number of mel filters
  --coefs <n>              Coefficients per frame
  --fft <n>                FFT size
  --window <n>             Window length in samples
  --stride <n>             Window stride in samples
  --log-dir <path>         Also write logs to this directory
  -h, --help               Show this help";

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        println!("{USAGE}");
        return Ok(());
    };

    let logging_options = LoggingOptions {
        log_dir: options.log_dir.clone(),
        ..LoggingOptions::default()
    };
    if let Err(err) = logging::init(&logging_options) {
        eprintln!("Logging disabled: {err}");
    }

    let mut settings = match options.config.as_ref() {
        Some(path) => FeatureSettings::load(path).map_err(|err| err.to_string())?,
        None => FeatureSettings::default(),
    };
    options.overrides.apply(&mut settings);

    let audio = load_wav_mono(&options.input).map_err(|err| err.to_string())?;
    settings.sample_rate = audio.sample_rate as f64;
    tracing::info!(
        "Extracting MFCCs from {} ({:.2}s at {} Hz)",
        options.input.display(),
        audio.duration_seconds(),
        audio.sample_rate
    );

    let frames = mfcc_feats(&audio.samples, &settings).map_err(|err| err.to_string())?;
    let matrix = MfccMatrix::new(settings, frames);
    let (rows, cols) = matrix.shape();
    tracing::info!("Extracted {rows} frames x {cols} coefficients");

    match options.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("Failed to create {}: {err}", path.display()))?;
            write_matrix(&matrix, options.format, BufWriter::new(file))?;
            tracing::info!("Wrote features to {}", path.display());
        }
        None => write_matrix(&matrix, options.format, std::io::stdout().lock())?,
    }
    Ok(())
}

fn write_matrix<W: Write>(
    matrix: &MfccMatrix,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), String> {
    let written = match format {
        OutputFormat::Json => matrix.write_json(&mut writer),
        OutputFormat::Csv => matrix.write_csv(&mut writer),
    };
    written.map_err(|err| err.to_string())?;
    writer.flush().map_err(|err| format!("Flush failed: {err}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unknown format '{other}' (expected json or csv)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Overrides {
    no_energy: bool,
    pre_emphasis: Option<Option<f64>>,
    num_filters: Option<usize>,
    num_coefs: Option<usize>,
    fft_size: Option<usize>,
    window_length: Option<usize>,
    window_stride: Option<usize>,
}

impl Overrides {
    fn apply(&self, settings: &mut FeatureSettings) {
        if self.no_energy {
            settings.mfcc.energy = false;
        }
        if let Some(pre_emphasis) = self.pre_emphasis {
            settings.mfcc.pre_emphasis = pre_emphasis;
        }
        if let Some(value) = self.num_filters {
            settings.num_filters = value;
        }
        if let Some(value) = self.num_coefs {
            settings.num_coefs = value;
        }
        if let Some(value) = self.fft_size {
            settings.fft_size = value;
        }
        if let Some(value) = self.window_length {
            settings.window_length = value;
        }
        if let Some(value) = self.window_stride {
            settings.window_stride = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    log_dir: Option<PathBuf>,
    overrides: Overrides,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut input = None;
    let mut config = None;
    let mut output = None;
    let mut format = OutputFormat::Json;
    let mut log_dir = None;
    let mut overrides = Overrides::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => config = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--output" => output = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--format" => format = OutputFormat::parse(&next_value(&mut iter, &arg)?)?,
            "--log-dir" => log_dir = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--no-energy" => overrides.no_energy = true,
            "--pre-emphasis" => {
                let value = next_value(&mut iter, &arg)?;
                overrides.pre_emphasis = Some(parse_pre_emphasis(&value)?);
            }
            "--filters" => overrides.num_filters = Some(parse_count(&mut iter, &arg)?),
            "--coefs" => overrides.num_coefs = Some(parse_count(&mut iter, &arg)?),
            "--fft" => overrides.fft_size = Some(parse_count(&mut iter, &arg)?),
            "--window" => overrides.window_length = Some(parse_count(&mut iter, &arg)?),
            "--stride" => overrides.window_stride = Some(parse_count(&mut iter, &arg)?),
            other if other.starts_with('-') => {
                return Err(format!("Unknown option '{other}'\n\n{USAGE}"));
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg.as_str())),
            other => return Err(format!("Unexpected argument '{other}'")),
        }
    }
    let input = input.ok_or_else(|| format!("Missing input file\n\n{USAGE}"))?;
    Ok(Some(Options {
        input,
        config,
        output,
        format,
        log_dir,
        overrides,
    }))
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_count(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<usize, String> {
    let value = next_value(iter, flag)?;
    value
        .parse::<usize>()
        .map_err(|err| format!("Invalid value '{value}' for {flag}: {err}"))
}

fn parse_pre_emphasis(value: &str) -> Result<Option<f64>, String> {
    if value.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|err| format!("Invalid pre-emphasis '{value}': {err}"))
}
