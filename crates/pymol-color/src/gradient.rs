//! Color gradients over a numeric attribute range
//!
//! A [`GradientSpec`] describes a sweep through HSV space between two
//! endpoint colors, split into a fixed number of bins. [`compute_bins`]
//! turns it into one RGB color per bin and [`assign_bins`] pairs each bin
//! with the attribute predicate that selects its atoms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::error::{ColorError, ColorResult};
use crate::hsv::Hsv;

/// Bin count used when a caller asks for a single bin
pub const FALLBACK_BIN_COUNT: usize = 11;

/// Largest bin count a spec accepts, derived or requested
pub const MAX_BIN_COUNT: usize = 10_000;

/// How attribute values are split into bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GradientMode {
    /// Bins of equal attribute width
    #[default]
    Hist,
    /// Bins holding equal numbers of distinct attribute values
    Ramp,
}

impl GradientMode {
    pub fn name(&self) -> &'static str {
        match self {
            GradientMode::Hist => "hist",
            GradientMode::Ramp => "ramp",
        }
    }
}

impl FromStr for GradientMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hist" => Ok(GradientMode::Hist),
            "ramp" => Ok(GradientMode::Ramp),
            _ => Err(ColorError::UnknownMode(s.to_string())),
        }
    }
}

/// A turning point of a three-stop path
///
/// `incoming` ends the first half and `outgoing` starts the second. They
/// usually render to the same RGB color (white, say) but may carry
/// different hues so that each half keeps a constant hue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Midpoint {
    pub incoming: Hsv,
    pub outgoing: Hsv,
}

impl Midpoint {
    pub const fn uniform(color: Hsv) -> Self {
        Midpoint {
            incoming: color,
            outgoing: color,
        }
    }
}

/// The HSV path a gradient follows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientPath {
    pub start: Hsv,
    pub midpoint: Option<Midpoint>,
    pub end: Hsv,
}

impl GradientPath {
    /// Two-stop path
    pub const fn linear(start: Hsv, end: Hsv) -> Self {
        GradientPath {
            start,
            midpoint: None,
            end,
        }
    }

    /// Three-stop path
    pub const fn through(start: Hsv, midpoint: Midpoint, end: Hsv) -> Self {
        GradientPath {
            start,
            midpoint: Some(midpoint),
            end,
        }
    }

    /// Point on the path at fraction `t` in [0, 1]
    pub fn at(&self, t: f64) -> Hsv {
        match self.midpoint {
            None => self.start.lerp(&self.end, t),
            Some(mid) if t <= 0.5 => self.start.lerp(&mid.incoming, t * 2.0),
            Some(mid) => mid.outgoing.lerp(&self.end, t * 2.0 - 1.0),
        }
    }
}

const BLUE: Hsv = Hsv::new(2.0 / 3.0, 1.0, 1.0);
const RED: Hsv = Hsv::new(0.0, 1.0, 1.0);
const GREEN: Hsv = Hsv::new(1.0 / 3.0, 1.0, 1.0);
const YELLOW: Hsv = Hsv::new(1.0 / 6.0, 1.0, 1.0);
const MAGENTA: Hsv = Hsv::new(5.0 / 6.0, 1.0, 1.0);
/// Red reached by sweeping hue upwards from blue through magenta
const RED_FROM_ABOVE: Hsv = Hsv::new(1.0, 1.0, 1.0);
const BLACK: Hsv = Hsv::new(0.0, 0.0, 0.0);

const fn white(hue: f64) -> Hsv {
    Hsv::new(hue, 0.0, 1.0)
}

/// Named gradient presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradientPreset {
    /// blue -> green -> red
    Bgr,
    /// Same sweep as `Bgr`
    Rainbow,
    /// red -> green -> blue
    Rgb,
    /// Same sweep as `Rgb`
    ReverseRainbow,
    /// blue -> white -> red
    Bwr,
    /// red -> white -> blue
    Rwb,
    /// blue -> magenta -> red
    Bmr,
    /// red -> magenta -> blue
    Rmb,
    Rw,
    Wr,
    Gw,
    Wg,
    Bw,
    Wb,
    Gy,
    Yg,
    /// black -> white
    Gray,
    /// white -> black
    ReverseGray,
}

impl GradientPreset {
    pub const ALL: [GradientPreset; 18] = [
        GradientPreset::Bgr,
        GradientPreset::Rainbow,
        GradientPreset::Rgb,
        GradientPreset::ReverseRainbow,
        GradientPreset::Bwr,
        GradientPreset::Rwb,
        GradientPreset::Bmr,
        GradientPreset::Rmb,
        GradientPreset::Rw,
        GradientPreset::Wr,
        GradientPreset::Gw,
        GradientPreset::Wg,
        GradientPreset::Bw,
        GradientPreset::Wb,
        GradientPreset::Gy,
        GradientPreset::Yg,
        GradientPreset::Gray,
        GradientPreset::ReverseGray,
    ];

    /// Look up a preset by name, case-insensitively (`grey` spellings included)
    pub fn from_name(name: &str) -> ColorResult<Self> {
        let preset = match name.trim().to_lowercase().as_str() {
            "bgr" => GradientPreset::Bgr,
            "rainbow" => GradientPreset::Rainbow,
            "rgb" => GradientPreset::Rgb,
            "reverserainbow" => GradientPreset::ReverseRainbow,
            "bwr" => GradientPreset::Bwr,
            "rwb" => GradientPreset::Rwb,
            "bmr" => GradientPreset::Bmr,
            "rmb" => GradientPreset::Rmb,
            "rw" => GradientPreset::Rw,
            "wr" => GradientPreset::Wr,
            "gw" => GradientPreset::Gw,
            "wg" => GradientPreset::Wg,
            "bw" => GradientPreset::Bw,
            "wb" => GradientPreset::Wb,
            "gy" => GradientPreset::Gy,
            "yg" => GradientPreset::Yg,
            "gray" | "grey" => GradientPreset::Gray,
            "reversegray" | "reversegrey" => GradientPreset::ReverseGray,
            _ => return Err(ColorError::UnknownPreset(name.to_string())),
        };
        Ok(preset)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GradientPreset::Bgr => "bgr",
            GradientPreset::Rainbow => "rainbow",
            GradientPreset::Rgb => "rgb",
            GradientPreset::ReverseRainbow => "reverserainbow",
            GradientPreset::Bwr => "bwr",
            GradientPreset::Rwb => "rwb",
            GradientPreset::Bmr => "bmr",
            GradientPreset::Rmb => "rmb",
            GradientPreset::Rw => "rw",
            GradientPreset::Wr => "wr",
            GradientPreset::Gw => "gw",
            GradientPreset::Wg => "wg",
            GradientPreset::Bw => "bw",
            GradientPreset::Wb => "wb",
            GradientPreset::Gy => "gy",
            GradientPreset::Yg => "yg",
            GradientPreset::Gray => "gray",
            GradientPreset::ReverseGray => "reversegray",
        }
    }

    /// The HSV path this preset sweeps
    pub fn path(&self) -> GradientPath {
        match self {
            GradientPreset::Bgr | GradientPreset::Rainbow => GradientPath::linear(BLUE, RED),
            GradientPreset::Rgb | GradientPreset::ReverseRainbow => GradientPath::linear(RED, BLUE),
            GradientPreset::Bwr => GradientPath::through(
                BLUE,
                Midpoint {
                    incoming: white(BLUE.h),
                    outgoing: white(RED.h),
                },
                RED,
            ),
            GradientPreset::Rwb => GradientPath::through(
                RED,
                Midpoint {
                    incoming: white(RED.h),
                    outgoing: white(BLUE.h),
                },
                BLUE,
            ),
            GradientPreset::Bmr => {
                GradientPath::through(BLUE, Midpoint::uniform(MAGENTA), RED_FROM_ABOVE)
            }
            GradientPreset::Rmb => {
                GradientPath::through(RED_FROM_ABOVE, Midpoint::uniform(MAGENTA), BLUE)
            }
            GradientPreset::Rw => GradientPath::linear(RED, white(RED.h)),
            GradientPreset::Wr => GradientPath::linear(white(RED.h), RED),
            GradientPreset::Gw => GradientPath::linear(GREEN, white(GREEN.h)),
            GradientPreset::Wg => GradientPath::linear(white(GREEN.h), GREEN),
            GradientPreset::Bw => GradientPath::linear(BLUE, white(BLUE.h)),
            GradientPreset::Wb => GradientPath::linear(white(BLUE.h), BLUE),
            GradientPreset::Gy => GradientPath::linear(GREEN, YELLOW),
            GradientPreset::Yg => GradientPath::linear(YELLOW, GREEN),
            GradientPreset::Gray => GradientPath::linear(BLACK, white(0.0)),
            GradientPreset::ReverseGray => GradientPath::linear(white(0.0), BLACK),
        }
    }
}

impl FromStr for GradientPreset {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradientPreset::from_name(s)
    }
}

impl fmt::Display for GradientPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated gradient request
///
/// Built fresh for every application and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGradientSpec")]
pub struct GradientSpec {
    minimum: i64,
    maximum: i64,
    bin_count: usize,
    path: GradientPath,
    saturation_cap: f64,
    value_cap: f64,
    mode: GradientMode,
}

impl GradientSpec {
    /// Create a spec over `[minimum, maximum]` with the derived bin count
    /// `maximum - minimum + 2`
    pub fn new(minimum: i64, maximum: i64, path: GradientPath) -> ColorResult<Self> {
        if minimum > maximum {
            return Err(ColorError::InvalidBinning(format!(
                "minimum {} is greater than maximum {}",
                minimum, maximum
            )));
        }
        let too_wide =
            || ColorError::InvalidBinning(format!("range {}..{} is too wide", minimum, maximum));
        minimum.checked_sub(1).ok_or_else(too_wide)?;
        maximum.checked_add(1).ok_or_else(too_wide)?;
        let bin_count = maximum
            .checked_sub(minimum)
            .and_then(|span| span.checked_add(2))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n <= MAX_BIN_COUNT)
            .ok_or_else(too_wide)?;

        Ok(GradientSpec {
            minimum,
            maximum,
            bin_count,
            path,
            saturation_cap: 1.0,
            value_cap: 1.0,
            mode: GradientMode::Hist,
        })
    }

    /// Create a spec sweeping between two HSV endpoints
    pub fn between(minimum: i64, maximum: i64, start: Hsv, end: Hsv) -> ColorResult<Self> {
        Self::new(minimum, maximum, GradientPath::linear(start, end))
    }

    /// Override the derived bin count
    ///
    /// A single bin makes no sense and is replaced by [`FALLBACK_BIN_COUNT`]
    /// with a warning; zero, negative and counts above [`MAX_BIN_COUNT`] are
    /// rejected.
    pub fn with_bin_count(mut self, bin_count: i64) -> ColorResult<Self> {
        self.bin_count = match bin_count {
            1 => {
                log::warn!(
                    "nbins=1 does not make sense, resetting nbins={}",
                    FALLBACK_BIN_COUNT
                );
                FALLBACK_BIN_COUNT
            }
            n if n < 1 => {
                return Err(ColorError::InvalidBinning(format!(
                    "bin count must be at least 2, got {}",
                    n
                )))
            }
            n => usize::try_from(n)
                .ok()
                .filter(|n| *n <= MAX_BIN_COUNT)
                .ok_or_else(|| {
                    ColorError::InvalidBinning(format!(
                        "bin count {} is above the limit of {}",
                        n, MAX_BIN_COUNT
                    ))
                })?,
        };
        Ok(self)
    }

    /// Cap saturation and value; both are clamped into [0, 1]
    pub fn with_caps(mut self, saturation: f64, value: f64) -> Self {
        self.saturation_cap = clamp_unit(saturation);
        self.value_cap = clamp_unit(value);
        self
    }

    pub fn with_mode(mut self, mode: GradientMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn path(&self) -> &GradientPath {
        &self.path
    }

    pub fn saturation_cap(&self) -> f64 {
        self.saturation_cap
    }

    pub fn value_cap(&self) -> f64 {
        self.value_cap
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Lower histogram bound, padded one unit below `minimum`
    pub fn min_bound(&self) -> f64 {
        self.minimum as f64 - 1.0
    }

    /// Upper histogram bound, padded one unit above `maximum`
    pub fn max_bound(&self) -> f64 {
        self.maximum as f64 + 1.0
    }

    pub fn bin_width(&self) -> f64 {
        (self.max_bound() - self.min_bound()) / self.bin_count as f64
    }

    /// Attribute value selected by each histogram bin, in bin order
    pub fn hist_thresholds(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.bin_count)
            .map(|j| self.min_bound() + (j + 1) as f64 * width)
            .collect()
    }

    fn capped(&self, hsv: Hsv) -> Hsv {
        Hsv::new(
            hsv.h,
            hsv.s.min(self.saturation_cap),
            hsv.v.min(self.value_cap),
        )
    }
}

/// Wire form of [`GradientSpec`]; deserialization revalidates it
#[derive(Deserialize)]
struct RawGradientSpec {
    minimum: i64,
    maximum: i64,
    bin_count: usize,
    path: GradientPath,
    saturation_cap: f64,
    value_cap: f64,
    mode: GradientMode,
}

impl TryFrom<RawGradientSpec> for GradientSpec {
    type Error = ColorError;

    fn try_from(raw: RawGradientSpec) -> ColorResult<Self> {
        if !(2..=MAX_BIN_COUNT).contains(&raw.bin_count) {
            return Err(ColorError::InvalidBinning(format!(
                "bin count {} is outside 2..={}",
                raw.bin_count, MAX_BIN_COUNT
            )));
        }
        let mut spec = GradientSpec::new(raw.minimum, raw.maximum, raw.path)?
            .with_caps(raw.saturation_cap, raw.value_cap)
            .with_mode(raw.mode);
        spec.bin_count = raw.bin_count;
        Ok(spec)
    }
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        1.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Color of one gradient bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinColor {
    pub index: usize,
    pub hsv: Hsv,
    pub rgb: Rgb8,
}

/// Compute the color of every bin, in bin order
///
/// Bin `j` sits at fraction `j / (n - 1)` along the path, so the first bin
/// is exactly the start color and the last exactly the end color.
pub fn compute_bins(spec: &GradientSpec) -> Vec<BinColor> {
    let n = spec.bin_count;
    let last = n.saturating_sub(1).max(1) as f64;
    (0..n)
        .map(|j| {
            let hsv = spec.capped(spec.path.at(j as f64 / last));
            BinColor {
                index: j,
                hsv,
                rgb: hsv.to_rgb8(),
            }
        })
        .collect()
}

/// Which attribute values a bin selects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinPredicate {
    /// `attribute == value`
    Equals(f64),
    /// `lower <= attribute <= upper`
    Between(f64, f64),
}

impl BinPredicate {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            BinPredicate::Equals(threshold) => value == threshold,
            BinPredicate::Between(lower, upper) => value >= lower && value <= upper,
        }
    }
}

/// One bin paired with its predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinAssignment {
    pub index: usize,
    pub predicate: BinPredicate,
    pub rgb: Rgb8,
}

/// Pair each bin color with the predicate that selects its atoms
///
/// `values` are the attribute values present in the selection; only the
/// `ramp` mode looks at them. In `ramp` mode bins that would receive no
/// values are left out, so the result may be shorter than the bin count.
pub fn assign_bins(spec: &GradientSpec, values: &[f64]) -> Vec<BinAssignment> {
    let colors = compute_bins(spec);
    match spec.mode {
        GradientMode::Hist => spec
            .hist_thresholds()
            .into_iter()
            .zip(colors)
            .map(|(threshold, bin)| BinAssignment {
                index: bin.index,
                predicate: BinPredicate::Equals(threshold),
                rgb: bin.rgb,
            })
            .collect(),
        GradientMode::Ramp => {
            let groups = ramp_groups(values, spec.bin_count);
            colors
                .into_iter()
                .zip(groups)
                .filter_map(|(bin, group)| {
                    group.map(|(lower, upper)| BinAssignment {
                        index: bin.index,
                        predicate: BinPredicate::Between(lower, upper),
                        rgb: bin.rgb,
                    })
                })
                .collect()
        }
    }
}

/// Split the sorted distinct values into `bins` consecutive groups
fn ramp_groups(values: &[f64], bins: usize) -> Vec<Option<(f64, f64)>> {
    let mut distinct: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();

    let k = distinct.len();
    (0..bins)
        .map(|j| {
            let lo = j * k / bins;
            let hi = (j + 1) * k / bins;
            (lo < hi).then(|| (distinct[lo], distinct[hi - 1]))
        })
        .collect()
}
