//! Tweak panel for the materials scene.
//!
//! The panel sits in the top right corner of the window and holds two
//! sliders (metalness, roughness) and a spin button. It is hidden at start
//! and toggled with `H`. Input is fed in physical pixels, the panel turns it
//! into [`PanelEvent`]s and draws itself as flat coloured quads.

use crate::pipelines::gui::Vertex;

/// A bounded value edited by dragging.
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    value: f32,
}

impl Slider {
    pub fn new(label: &'static str, value: f32, min: f32, max: f32, step: f32) -> Self {
        let mut slider = Self {
            label,
            min,
            max,
            step,
            value: min,
        };
        slider.set(value);
        slider
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamp to `[min, max]` and snap to `step`. Returns whether the value changed.
    pub fn set(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let mut value = value.clamp(self.min, self.max);
        // the bounds themselves are always reachable
        if self.step > 0.0 && value > self.min && value < self.max {
            value = self.min + ((value - self.min) / self.step).round() * self.step;
            value = value.clamp(self.min, self.max);
        }
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Position of the value along the track, in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }

    pub fn set_fraction(&mut self, fraction: f32) -> bool {
        self.set(self.min + fraction.clamp(0.0, 1.0) * (self.max - self.min))
    }

    /// Move by `dx` pixels on a track `track_width` pixels wide.
    pub fn drag(&mut self, dx: f32, track_width: f32) -> bool {
        if track_width <= 0.0 {
            return false;
        }
        self.set(self.value + dx / track_width * (self.max - self.min))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Metalness,
    Roughness,
    Spin,
}

impl Control {
    const ROWS: [Control; 3] = [Control::Metalness, Control::Roughness, Control::Spin];

    fn row(self) -> usize {
        match self {
            Control::Metalness => 0,
            Control::Roughness => 1,
            Control::Spin => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelEvent {
    Metalness(f32),
    Roughness(f32),
    Spin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

// logical pixels
const PANEL_WIDTH: f32 = 245.0;
const ROW_HEIGHT: f32 = 27.0;
const MARGIN: f32 = 8.0;
const PADDING: f32 = 5.0;
// share of a row taken by the label area
const LABEL_FRACTION: f32 = 0.4;

const BACKGROUND: [f32; 4] = [0.1, 0.1, 0.1, 0.9];
const TRACK: [f32; 4] = [0.19, 0.19, 0.19, 1.0];
const FILL: [f32; 4] = [0.18, 0.63, 0.84, 1.0];
const BUTTON: [f32; 4] = [0.9, 0.11, 0.37, 1.0];
const METALNESS_CHIP: [f32; 4] = [0.75, 0.75, 0.78, 1.0];
const ROUGHNESS_CHIP: [f32; 4] = [0.55, 0.42, 0.3, 1.0];
const TEXT: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const BUTTON_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub const SPIN_LABEL: &str = "spin";

/// 3x5 bitmap of a label character, top row first, bit 2 is the left column.
/// Characters without a bitmap are blank.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        'a' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'e' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'g' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'p' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b011, 0b100, 0b010, 0b001, 0b110],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        _ => [0; 5],
    }
}

/// Width of `text` in glyph cells, one blank column between characters.
pub fn label_columns(text: &str) -> u32 {
    (text.chars().count() as u32 * 4).saturating_sub(1)
}

/// Lit cells of `text` merged into horizontal runs of `(column, row, length)`.
pub fn label_runs(text: &str) -> Vec<(u32, u32, u32)> {
    let mut runs = Vec::new();
    for (i, c) in text.chars().enumerate() {
        for (row, bits) in glyph(c).into_iter().enumerate() {
            let mut col = 0;
            while col < 3 {
                if bits & (0b100 >> col) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < 3 && bits & (0b100 >> col) != 0 {
                    col += 1;
                }
                runs.push((i as u32 * 4 + start, row as u32, col - start));
            }
        }
    }
    runs
}

#[derive(Debug)]
pub struct DebugPanel {
    pub metalness: Slider,
    pub roughness: Slider,
    visible: bool,
    viewport: (f32, f32),
    scale: f32,
    active: Option<Control>,
    last_x: f32,
}

impl DebugPanel {
    /// Background, chips, tracks, fills and the button.
    const BOX_QUADS: usize = 8;

    pub fn new(metalness: f32, roughness: f32) -> Self {
        Self {
            metalness: Slider::new("metalness", metalness, 0.0, 1.0, 0.0001),
            roughness: Slider::new("roughness", roughness, 0.0, 1.0, 0.0001),
            visible: false,
            viewport: (1.0, 1.0),
            scale: 1.0,
            active: None,
            last_x: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.active = None;
        }
    }

    /// Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    /// Surface size in physical pixels and the pixel ratio used to scale the layout.
    pub fn set_viewport(&mut self, width: u32, height: u32, scale: f32) {
        self.viewport = (width.max(1) as f32, height.max(1) as f32);
        self.scale = if scale > 0.0 { scale } else { 1.0 };
    }

    pub fn bounds(&self) -> Rect {
        let width = PANEL_WIDTH * self.scale;
        Rect {
            x: self.viewport.0 - width - MARGIN * self.scale,
            y: MARGIN * self.scale,
            width,
            height: ROW_HEIGHT * self.scale * Control::ROWS.len() as f32,
        }
    }

    fn row_rect(&self, control: Control) -> Rect {
        let bounds = self.bounds();
        let height = ROW_HEIGHT * self.scale;
        Rect {
            x: bounds.x,
            y: bounds.y + height * control.row() as f32,
            width: bounds.width,
            height,
        }
    }

    /// Area of the row that reacts to dragging: the slider track or the button.
    pub fn control_rect(&self, control: Control) -> Rect {
        let row = self.row_rect(control);
        let pad = PADDING * self.scale;
        let left = match control {
            Control::Spin => row.x + pad,
            _ => row.x + row.width * LABEL_FRACTION,
        };
        Rect {
            x: left,
            y: row.y + pad,
            width: row.x + row.width - pad - left,
            height: row.height - 2.0 * pad,
        }
    }

    /// `(x, y)` relative to the panel, both in [0, 1], or `None` outside of it.
    pub fn to_panel_coords(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let bounds = self.bounds();
        if !self.visible || !bounds.contains(x, y) {
            return None;
        }
        Some(((x - bounds.x) / bounds.width, (y - bounds.y) / bounds.height))
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.to_panel_coords(x, y).is_some()
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<Control> {
        let (_, v) = self.to_panel_coords(x, y)?;
        let row = ((v * Control::ROWS.len() as f32) as usize).min(Control::ROWS.len() - 1);
        Some(Control::ROWS[row])
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Left button pressed at `(x, y)`. Starts a drag on a slider row, jumping
    /// to the pressed position when it lies on the track.
    pub fn press(&mut self, x: f32, y: f32) -> Option<PanelEvent> {
        let control = self.hit(x, y)?;
        if control == Control::Spin {
            return Some(PanelEvent::Spin);
        }
        self.active = Some(control);
        self.last_x = x;
        let track = self.control_rect(control);
        if !track.contains(x, y) {
            return None;
        }
        let fraction = (x - track.x) / track.width;
        let slider = self.slider_mut(control)?;
        slider
            .set_fraction(fraction)
            .then(|| Self::event(control, slider.value()))
    }

    /// Cursor moved to `x` while the button is held.
    pub fn drag_to(&mut self, x: f32) -> Option<PanelEvent> {
        let control = self.active?;
        let dx = x - self.last_x;
        self.last_x = x;
        let width = self.control_rect(control).width;
        let slider = self.slider_mut(control)?;
        slider
            .drag(dx, width)
            .then(|| Self::event(control, slider.value()))
    }

    pub fn release(&mut self) {
        self.active = None;
    }

    fn slider_mut(&mut self, control: Control) -> Option<&mut Slider> {
        match control {
            Control::Metalness => Some(&mut self.metalness),
            Control::Roughness => Some(&mut self.roughness),
            Control::Spin => None,
        }
    }

    fn event(control: Control, value: f32) -> PanelEvent {
        match control {
            Control::Metalness => PanelEvent::Metalness(value),
            Control::Roughness => PanelEvent::Roughness(value),
            Control::Spin => PanelEvent::Spin,
        }
    }

    /// Number of quads [`Self::vertices`] emits. Fixed for the panel's
    /// lifetime, so the vertex buffer can be rewritten in place.
    pub fn quad_count(&self) -> usize {
        let labels = [self.metalness.label(), self.roughness.label(), SPIN_LABEL];
        Self::BOX_QUADS + labels.iter().map(|l| label_runs(l).len()).sum::<usize>()
    }

    /// Quads in normalised device coordinates, [`Self::quad_count`] of them.
    pub fn vertices(&self) -> (Vec<Vertex>, Vec<u16>) {
        let quads = self.quad_count();
        let mut vertices = Vec::with_capacity(quads * 4);
        let mut indices = Vec::with_capacity(quads * 6);
        let mut quad = |rect: Rect, color: [f32; 4]| {
            let (vw, vh) = self.viewport;
            let left = rect.x / vw * 2.0 - 1.0;
            let right = (rect.x + rect.width) / vw * 2.0 - 1.0;
            let top = 1.0 - rect.y / vh * 2.0;
            let bottom = 1.0 - (rect.y + rect.height) / vh * 2.0;
            let base = vertices.len() as u16;
            vertices.extend_from_slice(&[
                Vertex { position: [left, top], color },
                Vertex { position: [left, bottom], color },
                Vertex { position: [right, bottom], color },
                Vertex { position: [right, top], color },
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        };

        quad(self.bounds(), BACKGROUND);
        for (control, slider, chip) in [
            (Control::Metalness, &self.metalness, METALNESS_CHIP),
            (Control::Roughness, &self.roughness, ROUGHNESS_CHIP),
        ] {
            let row = self.row_rect(control);
            let pad = PADDING * self.scale;
            quad(
                Rect {
                    x: row.x + pad,
                    y: row.y + pad,
                    width: row.height - 2.0 * pad,
                    height: row.height - 2.0 * pad,
                },
                chip,
            );
            let track = self.control_rect(control);
            let text_left = row.x + row.height;
            let area = Rect {
                x: text_left,
                y: row.y + pad,
                width: track.x - pad - text_left,
                height: row.height - 2.0 * pad,
            };
            for (rect, color) in label_quads(slider.label(), area, TEXT, false) {
                quad(rect, color);
            }
            quad(track, TRACK);
            quad(
                Rect {
                    width: track.width * slider.fraction(),
                    ..track
                },
                FILL,
            );
        }
        let button = self.control_rect(Control::Spin);
        quad(button, BUTTON);
        for (rect, color) in label_quads(SPIN_LABEL, button, BUTTON_TEXT, true) {
            quad(rect, color);
        }
        (vertices, indices)
    }
}

/// Quads spelling `text` as large as fits in `area`, vertically centred.
fn label_quads(
    text: &str,
    area: Rect,
    color: [f32; 4],
    centred: bool,
) -> impl Iterator<Item = (Rect, [f32; 4])> {
    let columns = label_columns(text).max(1) as f32;
    let cell = (area.width / columns).min(area.height / 5.0).max(0.0);
    let x = if centred {
        area.x + (area.width - columns * cell) / 2.0
    } else {
        area.x
    };
    let y = area.y + (area.height - 5.0 * cell) / 2.0;
    label_runs(text).into_iter().map(move |(col, row, len)| {
        let rect = Rect {
            x: x + col as f32 * cell,
            y: y + row as f32 * cell,
            width: len as f32 * cell,
            height: cell,
        };
        (rect, color)
    })
}
