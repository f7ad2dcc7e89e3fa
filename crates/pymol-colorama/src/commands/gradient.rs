//! The `color_grad` command: bin a per-atom attribute and color each bin

use pymol_color::Hsv;

use crate::args::{ArgValue, ParsedCommand};
use crate::command::{Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::gradient::{apply_gradient, GradientOptions};

/// Register gradient commands
pub fn register(registry: &mut CommandRegistry) {
    registry.register(ColorGradCommand);
}

/// Arguments that may also be given by position, in order
const POSITIONAL: [&str; 9] = [
    "selection", "item", "mode", "gradient", "nbins", "sat", "value", "minimum", "maximum",
];

/// Explicit HSV endpoints, keyword only
const ENDPOINTS: [&str; 6] = ["hs", "he", "ss", "se", "vs", "ve"];

fn text_arg(args: &ParsedCommand, name: &str) -> Option<String> {
    let index = POSITIONAL.iter().position(|n| *n == name)?;
    args.lookup(name, index).and_then(ArgValue::as_text)
}

fn int_arg(args: &ParsedCommand, name: &str) -> CmdResult<Option<i64>> {
    let Some(index) = POSITIONAL.iter().position(|n| *n == name) else {
        return Ok(None);
    };
    match args.lookup(name, index) {
        None => Ok(None),
        Some(value) => value
            .as_int()
            .map(Some)
            .ok_or_else(|| CmdError::invalid_arg(name, format!("expected an integer, got {}", value))),
    }
}

fn float_arg(args: &ParsedCommand, name: &str) -> CmdResult<Option<f64>> {
    let lookup = match POSITIONAL.iter().position(|n| *n == name) {
        Some(index) => args.lookup(name, index),
        None => args.get_named(name).filter(|v| !v.is_none()),
    };
    match lookup {
        None => Ok(None),
        Some(value) => value
            .as_float()
            .map(Some)
            .ok_or_else(|| CmdError::invalid_arg(name, format!("expected a number, got {}", value))),
    }
}

/// Read `hs/he/ss/se/vs/ve`; all six or none
fn endpoint_args(args: &ParsedCommand) -> CmdResult<Option<(Hsv, Hsv)>> {
    let mut channels = [0.0; 6];
    let mut given = 0;
    for (slot, name) in channels.iter_mut().zip(ENDPOINTS) {
        if let Some(value) = float_arg(args, name)? {
            *slot = value;
            given += 1;
        }
    }

    match given {
        0 => Ok(None),
        6 => {
            let [hs, he, ss, se, vs, ve] = channels;
            let start = Hsv::try_new(hs, ss, vs)?;
            let end = Hsv::try_new(he, se, ve)?;
            Ok(Some((start, end)))
        }
        _ => Err(CmdError::invalid_arg(
            "hs/he/ss/se/vs/ve",
            "give all six endpoint channels or none",
        )),
    }
}

struct ColorGradCommand;

impl Command for ColorGradCommand {
    fn name(&self) -> &str {
        "color_grad"
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "color_grad" colors a selection by binning an atom attribute and
    painting each bin with one color of a gradient. Every bin gets a
    custom color named color_<selection><bin>.

    In hist mode the bounds are padded by one on each side. With the
    default bin count, bin j selects the value minimum + j and the last
    bin lies past maximum, so maximum gets the color just before the
    end color of the gradient.

    Bounds and nbins are limited to 10000 bins.

USAGE

    color_grad selection [, item [, mode [, gradient [, nbins [, sat
               [, value [, minimum [, maximum ]]]]]]]]
               [, hs=, he=, ss=, se=, vs=, ve= ]

ARGUMENTS

    selection = string: atoms to color
    item = resi, q or b_factor: attribute to bin (default: resi)
    mode = hist or ramp: equal-width or equal-count bins (default: hist)
    gradient = string: preset name, e.g. bgr, rainbow, bwr (default: bgr)
    nbins = int: number of bins (default: maximum - minimum + 2)
    sat = float: saturation cap between 0 and 1 (default: 1)
    value = float: value cap between 0 and 1 (default: 1)
    minimum = int: lower bound (default: smallest attribute value)
    maximum = int: upper bound (default: largest attribute value)
    hs, ss, vs = float: explicit start color in HSV
    he, se, ve = float: explicit end color in HSV

EXAMPLES

    color_grad prot
    color_grad prot, gradient=rainbow, nbins=20
    color_grad lig, item=q, mode=ramp, nbins=5
    color_grad prot, hs=0, he=0.66, ss=1, se=1, vs=1, ve=1
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &ParsedCommand) -> CmdResult {
        let known: Vec<&str> = POSITIONAL.iter().chain(ENDPOINTS.iter()).copied().collect();
        if let Some(name) = args.unknown_names(&known).first() {
            return Err(CmdError::invalid_arg(*name, "unknown keyword"));
        }
        if args.positional_count() > POSITIONAL.len() {
            return Err(CmdError::invalid_arg(
                "arguments",
                format!("at most {} positional arguments", POSITIONAL.len()),
            ));
        }

        let selection =
            text_arg(args, "selection").ok_or_else(|| CmdError::MissingArgument("selection".to_string()))?;

        let defaults = GradientOptions::default();
        let endpoints = endpoint_args(args)?;
        let options = GradientOptions {
            item: text_arg(args, "item").unwrap_or(defaults.item),
            mode: text_arg(args, "mode").unwrap_or(defaults.mode),
            gradient: text_arg(args, "gradient").unwrap_or(defaults.gradient),
            nbins: int_arg(args, "nbins")?,
            sat: float_arg(args, "sat")?.unwrap_or(defaults.sat),
            value: float_arg(args, "value")?.unwrap_or(defaults.value),
            minimum: int_arg(args, "minimum")?,
            maximum: int_arg(args, "maximum")?,
            start: endpoints.map(|(start, _)| start),
            end: endpoints.map(|(_, end)| end),
        };

        let report = apply_gradient(ctx.host, &selection, &options)?;
        ctx.print(&format!(
            " color_grad: colored {} with {} bins",
            selection,
            report.bins.len()
        ));
        Ok(())
    }
}
