//! The `colorama` command: open the tool and optionally activate a selection

use pymol_color::ColorMode;

use crate::args::ParsedCommand;
use crate::command::{Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::session::ColoramaSession;

/// Register the tool command
pub fn register(registry: &mut CommandRegistry) {
    registry.register(ColoramaCommand);
}

fn parse_color_mode(name: &str) -> Option<ColorMode> {
    match name.to_lowercase().as_str() {
        "rgb" => Some(ColorMode::Rgb),
        "hsv" => Some(ColorMode::Hsv),
        _ => None,
    }
}

struct ColoramaCommand;

impl Command for ColoramaCommand {
    fn name(&self) -> &str {
        "colorama"
    }

    fn help(&self) -> &str {
        r#"
DESCRIPTION

    "colorama" opens the color editor. An open editor is reused.
    With a selection, the editor is bound to it and seeded from the
    colors of its first and last CA atom.

USAGE

    colorama [ selection [, mode ]]

ARGUMENTS

    selection = string: object or selection to edit
    mode = rgb or hsv: slider color mode (default: keep current)

EXAMPLES

    colorama
    colorama prot
    colorama prot, mode=hsv
"#
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &ParsedCommand) -> CmdResult {
        let unknown = args.unknown_names(&["selection", "mode"]);
        if let Some(name) = unknown.first() {
            return Err(CmdError::invalid_arg(*name, "unknown keyword"));
        }

        let mode = match args.lookup("mode", 1).and_then(|v| v.as_text()) {
            Some(name) => Some(parse_color_mode(&name).ok_or_else(|| {
                CmdError::invalid_arg("mode", format!("expected rgb or hsv, got {}", name))
            })?),
            None => None,
        };
        let selection = args.lookup("selection", 0).and_then(|v| v.as_text());

        if ctx.tool.is_none() {
            ctx.print(" Colorama: opened");
        }
        let tool = ctx.tool.get_or_insert_with(ColoramaSession::new);

        if let Some(mode) = mode {
            tool.switch_color_mode(mode);
        }
        if let Some(selection) = selection {
            let paint = tool.on_selection_activated(&*ctx.host, &selection)?;
            log::debug!("colorama: {} starts in {:?} mode", selection, paint);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::session::PaintMode;

    #[test]
    fn test_open_and_activate() {
        let mut host = MemoryHost::new();
        host.add_chain("prot", 1..=3, "red").unwrap();
        let mut tool = None;

        let cmd = ParsedCommand::new("colorama")
            .with_arg("prot")
            .with_named_arg("mode", "hsv");
        let mut ctx = CommandContext::new(&mut host, &mut tool).with_quiet(true);
        ColoramaCommand.execute(&mut ctx, &cmd).unwrap();

        let tool = tool.unwrap();
        assert_eq!(tool.selection(), Some("prot"));
        assert_eq!(tool.paint_mode(), Some(PaintMode::Mono));
        assert_eq!(tool.color_mode(), ColorMode::Hsv);
    }

    #[test]
    fn test_bad_mode() {
        let mut host = MemoryHost::new();
        let mut tool = None;
        let cmd = ParsedCommand::new("colorama").with_named_arg("mode", "cmyk");
        let mut ctx = CommandContext::new(&mut host, &mut tool);
        assert!(matches!(
            ColoramaCommand.execute(&mut ctx, &cmd),
            Err(CmdError::InvalidArgument { .. })
        ));
        assert!(tool.is_none());
    }
}
