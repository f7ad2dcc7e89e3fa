//! Gradient application against a host
//!
//! Everything that can fail on user input (mode, preset, item, bounds,
//! bin count, empty selection) is checked before the first color is
//! defined, so a rejected request never leaves a half-colored molecule.

use pymol_color::{
    assign_bins, BinPredicate, GradientMode, GradientPath, GradientPreset, GradientSpec, Hsv, Rgb8,
};

use serde::{Deserialize, Serialize};

use crate::error::{CmdError, CmdResult};
use crate::host::{Attribute, ColorHost, HostError};

/// Options of one gradient request, mirroring the `color_grad` keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    /// Attribute keyword (`resi`, `q`, `b_factor`, ...)
    pub item: String,
    /// `hist` or `ramp`
    pub mode: String,
    /// Preset name
    pub gradient: String,
    /// Bin count override; derived from the bounds when `None`
    pub nbins: Option<i64>,
    /// Saturation cap
    pub sat: f64,
    /// Value cap
    pub value: f64,
    /// Lower bound; the smallest attribute value when `None`
    pub minimum: Option<i64>,
    /// Upper bound; the largest attribute value when `None`
    pub maximum: Option<i64>,
    /// Explicit start color, overriding the preset together with `end`
    pub start: Option<Hsv>,
    /// Explicit end color
    pub end: Option<Hsv>,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            item: "resi".to_string(),
            mode: "hist".to_string(),
            gradient: "bgr".to_string(),
            nbins: None,
            sat: 1.0,
            value: 1.0,
            minimum: None,
            maximum: None,
            start: None,
            end: None,
        }
    }
}

impl GradientOptions {
    /// Sweep between two explicit colors over `[minimum, maximum]`
    pub fn between(minimum: i64, maximum: i64, start: Hsv, end: Hsv) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }
}

/// One bin as handed to the host
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedBin {
    pub color_name: String,
    pub selection: String,
    pub rgb: Rgb8,
}

/// What a gradient application did
#[derive(Debug, Clone, PartialEq)]
pub struct GradientReport {
    pub spec: GradientSpec,
    pub bins: Vec<AppliedBin>,
}

/// Prefix of the per-bin color names for `selection`
///
/// Characters that are not valid in a color name become `_`.
pub fn color_prefix(selection: &str) -> String {
    let cleaned: String = selection
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("color_{}", cleaned)
}

/// Build the host selection expression for one bin
pub fn bin_selection(selection: &str, attribute: Attribute, predicate: &BinPredicate) -> String {
    match predicate {
        BinPredicate::Equals(value) => format!("{} and {} = {}", selection, attribute, value),
        BinPredicate::Between(lower, upper) => format!(
            "{} and {} >= {} and {} <= {}",
            selection, attribute, lower, attribute, upper
        ),
    }
}

/// Validate `options`, compute the bins and color `selection` with them
pub fn apply_gradient(
    host: &mut dyn ColorHost,
    selection: &str,
    options: &GradientOptions,
) -> CmdResult<GradientReport> {
    let selection = selection.trim();
    if selection.is_empty() {
        return Err(CmdError::MissingArgument("selection".to_string()));
    }

    let mode: GradientMode = options.mode.parse()?;
    let preset = GradientPreset::from_name(&options.gradient)?;
    let attribute = Attribute::from_keyword(&options.item).ok_or_else(|| {
        CmdError::invalid_arg("item", format!("not configured to work on item {}", options.item))
    })?;

    let values = host.list_attribute_values(selection, attribute)?;
    if values.is_empty() {
        return Err(CmdError::EmptySelection(selection.to_string()));
    }

    let minimum = match options.minimum {
        Some(minimum) => minimum,
        None => values.iter().copied().fold(f64::INFINITY, f64::min).floor() as i64,
    };
    let maximum = match options.maximum {
        Some(maximum) => maximum,
        None => values.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil() as i64,
    };

    let path = match (options.start, options.end) {
        (Some(start), Some(end)) => GradientPath::linear(start, end),
        (None, None) => preset.path(),
        _ => {
            return Err(CmdError::invalid_arg(
                "hs/he",
                "start and end colors must be given together",
            ))
        }
    };

    let mut spec = GradientSpec::new(minimum, maximum, path)?
        .with_mode(mode)
        .with_caps(options.sat, options.value);
    if let Some(nbins) = options.nbins {
        spec = spec.with_bin_count(nbins)?;
    }

    log::info!(
        "color_grad: mode={} gradient={} nbins={} range={}..{}",
        mode.name(),
        preset,
        spec.bin_count(),
        minimum,
        maximum
    );

    let prefix = color_prefix(selection);
    let bins: Vec<AppliedBin> = assign_bins(&spec, &values)
        .into_iter()
        .map(|assignment| AppliedBin {
            color_name: format!("{}{}", prefix, assignment.index),
            selection: bin_selection(selection, attribute, &assignment.predicate),
            rgb: assignment.rgb,
        })
        .collect();

    for bin in &bins {
        replace_named_color(host, &bin.color_name, bin.rgb)?;
    }
    for bin in &bins {
        log::debug!("color select: {} -> {}", bin.selection, bin.rgb);
        host.apply_named_color(&bin.color_name, &bin.selection)?;
    }

    Ok(GradientReport { spec, bins })
}

/// Drop any previous definition of `name`, then define it as `rgb`
///
/// Keeps repeated edits from piling stale custom colors into the host table.
pub(crate) fn replace_named_color(host: &mut dyn ColorHost, name: &str, rgb: Rgb8) -> CmdResult<()> {
    match host.remove_named_color(name) {
        Ok(()) | Err(HostError::NoSuchColor(_)) => {}
        Err(err) => return Err(err.into()),
    }
    host.define_named_color(name, rgb.to_color())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, MemoryHost};

    fn host() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.add_chain("prot", 1..=10, "green").unwrap();
        host
    }

    #[test]
    fn test_color_prefix_sanitized() {
        assert_eq!(color_prefix("prot"), "color_prot");
        assert_eq!(color_prefix("prot & chain A"), "color_prot___chain_A");
    }

    #[test]
    fn test_bin_selection_format() {
        assert_eq!(
            bin_selection("prot", Attribute::ResidueIndex, &BinPredicate::Equals(3.0)),
            "prot and resi = 3"
        );
        assert_eq!(
            bin_selection("prot", Attribute::Occupancy, &BinPredicate::Between(0.25, 0.5)),
            "prot and q >= 0.25 and q <= 0.5"
        );
    }

    #[test]
    fn test_rainbow_over_residues() {
        let mut host = host();
        let report = apply_gradient(&mut host, "prot", &GradientOptions::default()).unwrap();
        assert_eq!(report.spec.bin_count(), 11);
        assert_eq!(report.bins.len(), 11);
        assert_eq!(report.bins[0].selection, "prot and resi = 1");
        assert_eq!(report.bins[10].selection, "prot and resi = 11");
        assert_eq!(report.bins[0].rgb, Rgb8::new(0, 0, 255));
        assert_eq!(report.bins[10].rgb, Rgb8::new(255, 0, 0));

        // Residue 1 got the first bin, residue 10 the one before last
        assert_eq!(host.color_of("prot and resi = 1").unwrap().to_rgb8(), Rgb8::new(0, 0, 255));
        assert_eq!(
            host.color_of("prot and resi = 10").unwrap().to_rgb8(),
            report.bins[9].rgb
        );
    }

    #[test]
    fn test_validation_happens_before_coloring() {
        let mut host = host();
        let options = GradientOptions {
            gradient: "xyz".to_string(),
            ..GradientOptions::default()
        };
        let err = apply_gradient(&mut host, "prot", &options).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(host.apply_count(), 0);
        assert!(host.calls().is_empty());

        let options = GradientOptions {
            mode: "spline".to_string(),
            ..GradientOptions::default()
        };
        assert!(matches!(
            apply_gradient(&mut host, "prot", &options),
            Err(CmdError::Validation(_))
        ));

        let options = GradientOptions {
            item: "vdw".to_string(),
            ..GradientOptions::default()
        };
        assert!(matches!(
            apply_gradient(&mut host, "prot", &options),
            Err(CmdError::InvalidArgument { .. })
        ));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_empty_selection_aborts() {
        let mut host = host();
        let err = apply_gradient(&mut host, "prot and resi = 99", &GradientOptions::default())
            .unwrap_err();
        assert!(matches!(err, CmdError::EmptySelection(_)));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_single_bin_is_corrected() {
        let mut host = host();
        let options = GradientOptions {
            nbins: Some(1),
            ..GradientOptions::default()
        };
        let report = apply_gradient(&mut host, "prot", &options).unwrap();
        assert_eq!(report.spec.bin_count(), 11);
    }

    #[test]
    fn test_reapply_removes_previous_colors() {
        let mut host = host();
        let options = GradientOptions::between(1, 10, Hsv::new(0.0, 1.0, 1.0), Hsv::new(0.5, 1.0, 1.0));
        apply_gradient(&mut host, "prot", &options).unwrap();
        let defined = host.colors().len();
        host.clear_calls();

        apply_gradient(&mut host, "prot", &options).unwrap();
        assert_eq!(host.colors().len(), defined);
        let bound = host.colors().id_bound();
        for _ in 0..50 {
            apply_gradient(&mut host, "prot", &options).unwrap();
        }
        assert_eq!(host.colors().id_bound(), bound);
        let first_remove = host
            .calls()
            .iter()
            .position(|c| *c == HostCall::Remove("color_prot0".to_string()))
            .unwrap();
        let first_define = host
            .calls()
            .iter()
            .position(|c| matches!(c, HostCall::Define(name, _) if name == "color_prot0"))
            .unwrap();
        assert!(first_remove < first_define);
    }

    #[test]
    fn test_ramp_mode_over_occupancy() {
        let mut host = MemoryHost::new();
        for (resi, q) in [(1, 0.1), (2, 0.2), (3, 0.3), (4, 0.4)] {
            host.add_atom(crate::host::MemAtom {
                object: "lig".to_string(),
                name: "C1".to_string(),
                resi,
                q,
                b: 0.0,
                color: 0,
            });
        }
        let options = GradientOptions {
            item: "q".to_string(),
            mode: "ramp".to_string(),
            nbins: Some(2),
            ..GradientOptions::default()
        };
        let report = apply_gradient(&mut host, "lig", &options).unwrap();
        assert_eq!(report.bins.len(), 2);
        assert_eq!(report.bins[0].selection, "lig and q >= 0.1 and q <= 0.2");
        assert_eq!(
            host.color_of("lig and resi = 4").unwrap().to_rgb8(),
            Rgb8::new(255, 0, 0)
        );
    }
}
