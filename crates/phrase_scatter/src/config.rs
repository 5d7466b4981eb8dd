//! Configuration shared by placement engines and generators.
//!
//! [`Config`] is an explicit value threaded through constructors. A process-wide
//! default is kept behind [`Config::global`] for callers that configure once at
//! startup. String overrides (`key=value` pairs from a command line or a form)
//! go through [`Config::merge`], which rejects unknown keys.
use std::ops::RangeInclusive;
use std::sync::{OnceLock, RwLock};

use rand::Rng as RngCore;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::sampling::{choose, rand_inclusive, weighted_index};

/// Font handed to the image engine unless configured otherwise.
pub const DEFAULT_FONT: &str = "Comic-Sans-MS";

/// Attempts per phrase before placement gives up under the default policy.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// The collection of point sizes a phrase may be rendered with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Pointsizes {
    /// An explicit set of sizes, each equally likely.
    Set(Vec<u32>),
    /// Every size in `min..=max`, each equally likely.
    Range { min: u32, max: u32 },
    /// Every size in `min..=max`, with sizes near the middle favored.
    Weighted { min: u32, max: u32 },
}

impl Pointsizes {
    pub fn range(range: RangeInclusive<u32>) -> Self {
        let (min, max) = range.into_inner();
        Self::Range { min, max }
    }

    pub fn weighted(range: RangeInclusive<u32>) -> Self {
        let (min, max) = range.into_inner();
        Self::Weighted { min, max }
    }

    /// Smallest size that can be drawn.
    pub fn min(&self) -> u32 {
        match self {
            Self::Set(sizes) => sizes.iter().copied().min().unwrap_or(0),
            Self::Range { min, .. } | Self::Weighted { min, .. } => *min,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Set(sizes) if sizes.is_empty() => Err(Error::InvalidConfig(
                "pointsizes must contain at least one size".into(),
            )),
            Self::Set(sizes) if sizes.contains(&0) => {
                Err(Error::InvalidConfig("pointsizes must be > 0".into()))
            }
            Self::Range { min, max } | Self::Weighted { min, max } if min > max => Err(
                Error::InvalidConfig(format!("pointsize range {min}..={max} is empty")),
            ),
            Self::Range { min, .. } | Self::Weighted { min, .. } if *min == 0 => {
                Err(Error::InvalidConfig("pointsizes must be > 0".into()))
            }
            _ => Ok(()),
        }
    }

    /// Draw one size.
    pub fn sample(&self, rng: &mut dyn RngCore) -> u32 {
        match self {
            Self::Set(sizes) => choose(sizes, rng).copied().unwrap_or(0),
            Self::Range { min, max } => {
                rand_inclusive(rng, i64::from(*min)..=i64::from(*max)) as u32
            }
            Self::Weighted { min, max } => {
                let weights = triangular_weights(*min, *max);
                weighted_index(&weights, rng)
                    .map(|i| min + i as u32)
                    .unwrap_or(*min)
            }
        }
    }
}

impl Default for Pointsizes {
    fn default() -> Self {
        Self::range(17..=24)
    }
}

/// Weights rising by one per step up to the middle of `min..=max` and falling
/// symmetrically after it, e.g. `1 2 3 4 4 3 2 1` for `17..=24`.
pub fn triangular_weights(min: u32, max: u32) -> Vec<u64> {
    if min > max {
        return Vec::new();
    }
    let size = (max - min) as u64 + 1;
    let midpoint = ((max - min) / 2) as u64;
    (0..size)
        .map(|i| if i > midpoint { size - i } else { i + 1 })
        .collect()
}

/// How many attempts a phrase gets before placement reports failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RetryPolicy {
    Bounded(usize),
    /// Retry until a free spot turns up. Crowded images never terminate.
    Unbounded,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unbounded => None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Bounded(DEFAULT_MAX_ATTEMPTS)
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Config {
    /// Palette phrases are colored from.
    pub colors: Vec<Color>,
    /// Sizes phrases are rendered with.
    pub pointsizes: Pointsizes,
    /// Columns of the generated zone grid.
    pub horizontal_divisions: u32,
    /// Rows of the generated zone grid.
    pub vertical_divisions: u32,
    /// Output quality in percent.
    pub image_quality: u8,
    /// Font name handed to the image engine.
    pub font: String,
    /// Attempt cap per phrase.
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: vec![Color::WHITE],
            pointsizes: Pointsizes::default(),
            horizontal_divisions: 3,
            vertical_divisions: 3,
            image_quality: 95,
            font: DEFAULT_FONT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

static GLOBAL: OnceLock<RwLock<Config>> = OnceLock::new();

fn global_lock() -> &'static RwLock<Config> {
    GLOBAL.get_or_init(|| RwLock::new(Config::default()))
}

impl Config {
    /// Keys understood by [`Config::set_option`].
    pub const OPTION_NAMES: [&'static str; 7] = [
        "colors",
        "pointsizes",
        "horizontal_divisions",
        "vertical_divisions",
        "image_quality",
        "font",
        "max_attempts",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    pub fn with_pointsizes(mut self, pointsizes: Pointsizes) -> Self {
        self.pointsizes = pointsizes;
        self
    }

    pub fn with_divisions(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_divisions = horizontal;
        self.vertical_divisions = vertical;
        self
    }

    pub fn with_image_quality(mut self, quality: u8) -> Self {
        self.image_quality = quality;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(Error::InvalidConfig(
                "colors must contain at least one color".into(),
            ));
        }
        self.pointsizes.validate()?;
        if self.horizontal_divisions == 0 || self.vertical_divisions == 0 {
            return Err(Error::InvalidConfig("zone divisions must be > 0".into()));
        }
        if !(1..=100).contains(&self.image_quality) {
            return Err(Error::InvalidConfig(format!(
                "image_quality must be within 1..=100, got {}",
                self.image_quality
            )));
        }
        if self.font.trim().is_empty() {
            return Err(Error::InvalidConfig("font must not be empty".into()));
        }
        if self.retry == RetryPolicy::Bounded(0) {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }
        Ok(())
    }

    /// Set a single option from its textual form.
    pub fn set_option(&mut self, option: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match option.trim() {
            "colors" => {
                self.colors = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Color::from_hex)
                    .collect::<Result<_>>()?;
            }
            "pointsizes" => self.pointsizes = parse_pointsizes(value)?,
            "horizontal_divisions" => self.horizontal_divisions = parse_number(option, value)?,
            "vertical_divisions" => self.vertical_divisions = parse_number(option, value)?,
            "image_quality" => self.image_quality = parse_number(option, value)?,
            "font" => self.font = value.to_owned(),
            "max_attempts" => {
                self.retry = if value.eq_ignore_ascii_case("unbounded") {
                    RetryPolicy::Unbounded
                } else {
                    RetryPolicy::Bounded(parse_number(option, value)?)
                };
            }
            other => {
                return Err(Error::UnknownOption {
                    option: other.to_owned(),
                })
            }
        }
        Ok(())
    }

    /// Apply `key=value` style overrides. Nothing changes unless every pair is
    /// recognized and the result validates.
    pub fn merge<I, K, V>(&mut self, options: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut merged = self.clone();
        for (option, value) in options {
            merged.set_option(option.as_ref(), value.as_ref())?;
        }
        merged.validate()?;
        *self = merged;
        Ok(self)
    }

    /// Snapshot of the process-wide default configuration.
    pub fn global() -> Config {
        global_lock()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the process-wide default configuration after validating it.
    pub fn set_global(config: Config) -> Result<()> {
        config.validate()?;
        *global_lock()
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
        Ok(())
    }

    /// Edit the process-wide default in place.
    pub fn configure(f: impl FnOnce(&mut Config)) -> Result<()> {
        let mut config = Self::global();
        f(&mut config);
        Self::set_global(config)
    }
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{option}: '{value}' is not a valid number")))
}

/// Parse `17..24`, `17..=24`, `weighted:17..24`, or `18,20,22`.
pub fn parse_pointsizes(value: &str) -> Result<Pointsizes> {
    let (weighted, body) = match value.strip_prefix("weighted:") {
        Some(rest) => (true, rest.trim()),
        None => (false, value),
    };
    if let Some((lo, hi)) = body.split_once("..") {
        let hi = hi.strip_prefix('=').unwrap_or(hi);
        let min: u32 = parse_number("pointsizes", lo.trim())?;
        let max: u32 = parse_number("pointsizes", hi.trim())?;
        let sizes = if weighted {
            Pointsizes::weighted(min..=max)
        } else {
            Pointsizes::range(min..=max)
        };
        sizes.validate()?;
        return Ok(sizes);
    }
    if weighted {
        return Err(Error::InvalidConfig(format!(
            "pointsizes: weighted sizes need a range, got '{body}'"
        )));
    }
    let sizes = body
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_number("pointsizes", s))
        .collect::<Result<Vec<u32>>>()?;
    let sizes = Pointsizes::Set(sizes);
    sizes.validate()?;
    Ok(sizes)
}
