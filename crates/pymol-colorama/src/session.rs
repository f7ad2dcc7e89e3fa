//! Colorama tool session
//!
//! One [`ColoramaSession`] exists per open tool. It owns the three color
//! slots (mono, color 1, color 2), the slider color mode and the active
//! selection, and turns UI events into host calls.

use pymol_color::{Color, ColorMode, ColorModel};
use serde::{Deserialize, Serialize};

use crate::error::{CmdError, CmdResult};
use crate::gradient::{apply_gradient, replace_named_color, GradientOptions, GradientReport};
use crate::host::{Attribute, ColorHost};

/// Whether slider edits paint the selection directly or edit gradient endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintMode {
    #[default]
    Mono,
    Gradient,
}

/// Gradient endpoint currently bound to the sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slot {
    /// "Color 1", the start of the gradient
    #[default]
    Start,
    /// "Color 2", the end of the gradient
    End,
}

/// Tool state with respect to the host selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NoSelection,
    Active { selection: String, paint: PaintMode },
}

/// Start and end colors read from a selection's current coloring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionColorSnapshot {
    pub start: Color,
    pub end: Color,
}

impl SelectionColorSnapshot {
    /// Read the colors of the first and last CA atom of `selection`
    ///
    /// Falls back to the object-level color for atom-less objects and to
    /// neutral gray when lookups fail. Never fails itself.
    pub fn read(host: &dyn ColorHost, selection: &str) -> Self {
        let ca = format!("{} & name CA", selection);
        let mut ids: Vec<u32> = match host.list_attribute_values(&ca, Attribute::Color) {
            Ok(values) => values.into_iter().map(|v| v as u32).collect(),
            Err(err) => {
                log::debug!("could not list colors of {}: {}", ca, err);
                Vec::new()
            }
        };

        if ids.is_empty() {
            let id = host.resolve_object_level_color(selection).unwrap_or_else(|err| {
                log::debug!("no object color for {}: {}", selection, err);
                0
            });
            ids = vec![id, id];
        }

        let first = ids[0];
        let last = ids[ids.len() - 1];
        match (host.get_color_triple(first), host.get_color_triple(last)) {
            (Ok(start), Ok(end)) => SelectionColorSnapshot { start, end },
            (start, end) => {
                if let Some(err) = start.err().or(end.err()) {
                    log::debug!("color lookup failed for {}: {}", selection, err);
                }
                SelectionColorSnapshot {
                    start: Color::GRAY,
                    end: Color::GRAY,
                }
            }
        }
    }

    /// Paint mode implied by the snapshot: equal ends mean a single color
    pub fn paint_mode(&self) -> PaintMode {
        if self.start == self.end {
            PaintMode::Mono
        } else {
            PaintMode::Gradient
        }
    }
}

/// State of one open Colorama tool
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColoramaSession {
    state: SessionState,
    color_mode: ColorMode,
    active_slot: Slot,
    mono: ColorModel,
    start: ColorModel,
    end: ColorModel,
}

impl ColoramaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Name of the active selection, if any
    pub fn selection(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active { selection, .. } => Some(selection),
            SessionState::NoSelection => None,
        }
    }

    pub fn paint_mode(&self) -> Option<PaintMode> {
        match self.state {
            SessionState::Active { paint, .. } => Some(paint),
            SessionState::NoSelection => None,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn active_slot(&self) -> Slot {
        self.active_slot
    }

    pub fn slot(&self, slot: Slot) -> &ColorModel {
        match slot {
            Slot::Start => &self.start,
            Slot::End => &self.end,
        }
    }

    pub fn mono(&self) -> &ColorModel {
        &self.mono
    }

    /// `#rrggbb` shown in the color field of `slot`
    pub fn slot_hex(&self, slot: Slot) -> String {
        self.slot(slot).to_hex_string()
    }

    /// Activate `selection`, seeding the slots from its current coloring
    pub fn on_selection_activated(&mut self, host: &dyn ColorHost, selection: &str) -> CmdResult<PaintMode> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(CmdError::MissingArgument("selection".to_string()));
        }

        let snapshot = SelectionColorSnapshot::read(host, selection);
        let paint = snapshot.paint_mode();

        self.start = ColorModel::from_color(snapshot.start);
        self.end = ColorModel::from_color(snapshot.end);
        self.mono = self.start;
        for model in [&mut self.start, &mut self.end, &mut self.mono] {
            model.switch_mode(self.color_mode);
        }
        self.active_slot = Slot::Start;
        self.state = SessionState::Active {
            selection: selection.to_string(),
            paint,
        };

        log::info!(
            "colorama: active selection {} ({:?}, {} -> {})",
            selection,
            paint,
            self.start.to_hex_string(),
            self.end.to_hex_string()
        );
        Ok(paint)
    }

    /// Toggle between mono and gradient painting
    pub fn set_paint_mode(&mut self, mode: PaintMode) -> CmdResult<()> {
        match &mut self.state {
            SessionState::Active { paint, .. } => {
                *paint = mode;
                Ok(())
            }
            SessionState::NoSelection => Err(CmdError::NoActiveSelection),
        }
    }

    /// Switch the sliders between RGB and HSV
    pub fn switch_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        for model in [&mut self.start, &mut self.end, &mut self.mono] {
            model.switch_mode(mode);
        }
    }

    /// Bind the sliders to a gradient endpoint
    pub fn select_slot(&mut self, slot: Slot) {
        self.active_slot = slot;
    }

    fn edited_model(&self) -> &ColorModel {
        match self.paint_mode() {
            Some(PaintMode::Gradient) => self.slot(self.active_slot),
            _ => &self.mono,
        }
    }

    /// Slider positions for the model currently being edited
    pub fn slider_values(&self) -> [f64; 3] {
        self.edited_model().channels()
    }

    /// Handle a slider edit, interpreted in the current color mode
    ///
    /// In mono mode the color goes straight to the selection as the custom
    /// color `<selection>_color`; in gradient mode only the active endpoint
    /// changes. Without an active selection the mono slot is updated and
    /// nothing is sent to the host.
    pub fn on_color_changed(&mut self, host: &mut dyn ColorHost, channels: [f64; 3]) -> CmdResult<()> {
        let mut edited = *self.edited_model();
        edited.set_channels(self.color_mode, channels)?;

        match self.state.clone() {
            SessionState::NoSelection => {
                self.mono = edited;
                Ok(())
            }
            SessionState::Active {
                paint: PaintMode::Gradient,
                ..
            } => {
                match self.active_slot {
                    Slot::Start => self.start = edited,
                    Slot::End => self.end = edited,
                }
                Ok(())
            }
            SessionState::Active {
                selection,
                paint: PaintMode::Mono,
            } => {
                self.mono = edited;
                self.start = edited;
                self.end = edited;

                let name = format!("{}_color", selection);
                replace_named_color(host, &name, edited.to_rgb())?;
                host.apply_named_color(&name, &selection)?;
                Ok(())
            }
        }
    }

    /// Apply a gradient from color 1 to color 2 over the selection's residues
    pub fn on_apply_gradient_requested(&mut self, host: &mut dyn ColorHost) -> CmdResult<GradientReport> {
        let selection = self.selection().ok_or(CmdError::NoActiveSelection)?.to_string();

        let residues = host.list_attribute_values(&selection, Attribute::ResidueIndex)?;
        if residues.is_empty() {
            return Err(CmdError::EmptySelection(selection));
        }
        let first = residues.iter().copied().fold(f64::INFINITY, f64::min) as i64;
        let last = residues.iter().copied().fold(f64::NEG_INFINITY, f64::max) as i64;

        let options = GradientOptions::between(first, last, self.start.to_hsv(), self.end.to_hsv());
        apply_gradient(host, &selection, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, MemoryHost};
    use pymol_color::Rgb8;

    fn host() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.add_chain("mono", 1..=4, "red").unwrap();
        host.add_chain("grad", 1..=4, "red").unwrap();
        host.paint("grad and resi = 4", "blue").unwrap();
        host
    }

    #[test]
    fn test_activation_detects_mono() {
        let host = host();
        let mut session = ColoramaSession::new();
        assert_eq!(session.on_selection_activated(&host, "mono").unwrap(), PaintMode::Mono);
        assert_eq!(session.slot(Slot::Start).to_rgb(), Rgb8::new(255, 0, 0));
        assert_eq!(session.slot_hex(Slot::End), "#ff0000");
        assert_eq!(session.active_slot(), Slot::Start);
    }

    #[test]
    fn test_activation_detects_gradient() {
        let host = host();
        let mut session = ColoramaSession::new();
        assert_eq!(session.on_selection_activated(&host, "grad").unwrap(), PaintMode::Gradient);
        assert_eq!(session.slot(Slot::End).to_rgb(), Rgb8::new(0, 0, 255));
    }

    #[test]
    fn test_activation_falls_back_to_gray() {
        let mut host = host();
        host.fail_color_lookups(true);
        let mut session = ColoramaSession::new();
        assert_eq!(session.on_selection_activated(&host, "grad").unwrap(), PaintMode::Mono);
        assert_eq!(session.slot(Slot::Start).to_rgb(), Rgb8::GRAY);
    }

    #[test]
    fn test_activation_falls_back_to_first_color_id() {
        let host = host();
        let mut session = ColoramaSession::new();
        assert_eq!(session.on_selection_activated(&host, "ghost").unwrap(), PaintMode::Mono);

        let first = host.get_color_triple(0).unwrap().to_rgb8();
        assert_eq!(session.slot(Slot::Start).to_rgb(), first);
        assert_eq!(session.slot(Slot::End).to_rgb(), first);
    }

    #[test]
    fn test_activation_uses_object_color() {
        let mut host = host();
        host.set_object_color("density", "slate").unwrap();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "density").unwrap();
        assert_eq!(session.slot(Slot::Start).to_rgb(), Rgb8::new(128, 128, 255));
        assert_eq!(session.paint_mode(), Some(PaintMode::Mono));
    }

    #[test]
    fn test_mono_edit_replaces_custom_color() {
        let mut host = host();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "mono").unwrap();

        session.on_color_changed(&mut host, [0.0, 255.0, 0.0]).unwrap();
        session.on_color_changed(&mut host, [0.0, 0.0, 255.0]).unwrap();

        assert_eq!(
            host.calls()[3..],
            [
                HostCall::Remove("mono_color".to_string()),
                HostCall::Define("mono_color".to_string(), Color::BLUE),
                HostCall::Apply("mono_color".to_string(), "mono".to_string()),
            ]
        );
        assert_eq!(host.color_of("mono and resi = 2"), Some(Color::BLUE));
        assert!(host.colors().contains("mono_color"));
    }

    #[test]
    fn test_gradient_edit_only_touches_slot() {
        let mut host = host();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "grad").unwrap();
        session.select_slot(Slot::End);
        session.on_color_changed(&mut host, [0.0, 255.0, 0.0]).unwrap();

        assert!(host.calls().is_empty());
        assert_eq!(session.slot(Slot::End).to_rgb(), Rgb8::new(0, 255, 0));
        assert_eq!(session.slider_values(), [0.0, 255.0, 0.0]);
    }

    #[test]
    fn test_hsv_sliders() {
        let mut host = host();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "mono").unwrap();
        session.switch_color_mode(ColorMode::Hsv);
        assert_eq!(session.slider_values(), [0.0, 1.0, 1.0]);

        session.on_color_changed(&mut host, [2.0 / 3.0, 1.0, 1.0]).unwrap();
        assert_eq!(host.color_of("mono and resi = 1"), Some(Color::BLUE));

        assert!(session.on_color_changed(&mut host, [0.5, 2.0, 1.0]).is_err());
    }

    #[test]
    fn test_apply_gradient_between_slots() {
        let mut host = host();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "grad").unwrap();
        let report = session.on_apply_gradient_requested(&mut host).unwrap();

        assert_eq!(report.spec.minimum(), 1);
        assert_eq!(report.spec.maximum(), 4);
        assert_eq!(report.bins[0].rgb, Rgb8::new(255, 0, 0));
        assert_eq!(report.bins.last().unwrap().rgb, Rgb8::new(0, 0, 255));

        // The last bin is padding: residue 4 takes the one before it
        let n = report.bins.len();
        assert_eq!(host.color_of("grad and resi = 1").unwrap().to_rgb8(), Rgb8::new(255, 0, 0));
        assert_eq!(
            host.color_of("grad and resi = 4").unwrap().to_rgb8(),
            report.bins[n - 2].rgb
        );
        assert_ne!(report.bins[n - 2].rgb, Rgb8::new(0, 0, 255));
    }

    #[test]
    fn test_events_need_selection() {
        let mut host = host();
        let mut session = ColoramaSession::new();
        assert!(matches!(
            session.on_apply_gradient_requested(&mut host),
            Err(CmdError::NoActiveSelection)
        ));
        assert!(session.set_paint_mode(PaintMode::Gradient).is_err());
        session.on_color_changed(&mut host, [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(session.mono().to_rgb(), Rgb8::new(1, 2, 3));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_session_survives_serde() {
        let host = host();
        let mut session = ColoramaSession::new();
        session.on_selection_activated(&host, "grad").unwrap();
        session.switch_color_mode(ColorMode::Hsv);

        let json = serde_json::to_string(&session).unwrap();
        let restored: ColoramaSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
        assert_eq!(restored.selection(), Some("grad"));
    }
}
