use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use phrase_scatter::prelude::{
    Config, GenerateOptions, ImageMagick, ImageSize, MemeGenerator, Pointsizes,
};
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{apply_overrides, load_config, parse_key_val};

#[derive(Parser, Debug)]
#[command(
    name = "phrase-scatter",
    version,
    about = "Scatter meme-style phrases over an image"
)]
pub struct Args {
    /// Source image
    pub input: PathBuf,

    /// Phrases to write, in drawing order
    #[arg(required = true, num_args = 1..)]
    pub phrases: Vec<String>,

    /// Output image
    #[arg(short = 'o', long = "output", required_unless_present = "dry_run")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Override a config option, e.g. `--set colors=#FF0000,#00FF00`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub overrides: Vec<(String, String)>,

    /// Output quality in percent
    #[arg(short = 'q', long = "quality")]
    pub quality: Option<u8>,

    /// Font name passed to ImageMagick
    #[arg(short = 'f', long = "font")]
    pub font: Option<String>,

    /// Pointsizes for this run: `17..24`, `weighted:17..24`, or `18,20,22`
    #[arg(short = 'p', long = "pointsizes", value_parser = parse_pointsizes_arg)]
    pub pointsizes: Option<Pointsizes>,

    /// Seed for a reproducible layout
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Image size as WIDTHxHEIGHT; skips measuring the input
    #[arg(long = "size", value_parser = parse_size)]
    pub size: Option<ImageSize>,

    /// Use the ImageMagick 7 `magick` binary
    #[arg(long = "magick")]
    pub magick: bool,

    /// Print the convert command instead of running it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase log verbosity
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides)?;
    apply_flags(&mut config, &args);
    config.validate()?;

    let mut options = GenerateOptions::new();
    if let Some(pointsizes) = args.pointsizes.clone() {
        options = options.with_pointsizes(pointsizes);
    }

    let engine = if args.magick {
        ImageMagick::magick()
    } else {
        ImageMagick::legacy()
    };
    let mut generator = match args.size {
        Some(size) => MemeGenerator::with_size(engine, &args.input, size, &config, &options)?,
        None => MemeGenerator::new(engine, &args.input, &config, &options)?,
    };

    let seed = resolve_seed(args.seed);
    info!("Using seed {}.", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    if args.dry_run {
        let destination = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("out.jpg"));
        let plan = generator.plan(destination, args.phrases.as_slice(), &mut rng)?;
        println!("{}", shell_line(ImageMagick::convert_args(&plan.request)));
        return Ok(());
    }

    let output = args
        .output
        .as_ref()
        .ok_or_else(|| anyhow!("--output is required"))?;
    let placements = generator.generate_image(output, args.phrases.as_slice(), &mut rng)?;
    info!(
        "Wrote {} phrases to {}.",
        placements.len(),
        output.display()
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_flags(config: &mut Config, args: &Args) {
    if let Some(quality) = args.quality {
        config.image_quality = quality;
    }
    if let Some(font) = &args.font {
        config.font = font.clone();
    }
}

/// The requested seed, or a fresh one from the thread RNG so the run can be replayed.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().next_u64())
}

fn parse_pointsizes_arg(s: &str) -> Result<Pointsizes, String> {
    phrase_scatter::config::parse_pointsizes(s).map_err(|e| e.to_string())
}

fn parse_size(s: &str) -> Result<ImageSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok(ImageSize::new(width, height))
}

/// Render `convert` arguments as a copy-pasteable shell line.
fn shell_line(args: Vec<OsString>) -> String {
    std::iter::once("convert".to_owned())
        .chain(args.iter().map(|a| shell_quote(&a.to_string_lossy())))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,/+%:=@".contains(c));
    if plain {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_full_invocation() {
        let args = Args::try_parse_from([
            "phrase-scatter",
            "doge.jpg",
            "wow",
            "such cli",
            "-o",
            "out.jpg",
            "--set",
            "colors=#FF0000,#00FF00",
            "--set",
            "max_attempts=500",
            "--seed",
            "42",
            "-p",
            "weighted:17..24",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.phrases, vec!["wow", "such cli"]);
        assert_eq!(args.output, Some(PathBuf::from("out.jpg")));
        assert_eq!(args.overrides.len(), 2);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.pointsizes, Some(Pointsizes::weighted(17..=24)));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn output_required_without_dry_run() {
        assert!(Args::try_parse_from(["phrase-scatter", "doge.jpg", "wow"]).is_err());
        assert!(
            Args::try_parse_from(["phrase-scatter", "doge.jpg", "wow", "--dry-run"]).is_ok()
        );
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "phrase-scatter",
            "doge.jpg",
            "wow",
            "--dry-run",
            "-q",
            "80",
            "-f",
            "Impact",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_flags(&mut config, &args);
        assert_eq!(config.image_quality, 80);
        assert_eq!(config.font, "Impact");
    }

    #[test]
    fn seed_is_explicit_or_random() {
        assert_eq!(resolve_seed(Some(42)), 42);
        let a = resolve_seed(None);
        let b = resolve_seed(None);
        assert_ne!(a, b);
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("900x600").unwrap(), ImageSize::new(900, 600));
        assert_eq!(parse_size("640X480").unwrap(), ImageSize::new(640, 480));
        assert!(parse_size("900").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn shell_line_quotes_phrases() {
        let line = shell_line(vec![
            OsString::from("doge.jpg"),
            OsString::from("-fill"),
            OsString::from("rgb(255,0,0)"),
            OsString::from("such wow"),
            OsString::from("it's"),
        ]);
        assert_eq!(
            line,
            r"convert doge.jpg -fill 'rgb(255,0,0)' 'such wow' 'it'\''s'"
        );
    }
}
