//! Cached render geometry.
//!
//! Nothing here draws. The drawing layer reads a validated
//! [`LabelGeometry`] for every atom and a [`BondGeometry`] for every bond
//! and turns them into canvas primitives.

use serde::{Deserialize, Serialize};

use crate::atom::{Atom, DisplayState};
use crate::point::Point;
use crate::settings::Settings;

/// Ratio of the font size from the vertical center to the text baseline.
const BASELINE_SHIFT: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn around(center: Point, half_width: f64, half_height: f64) -> Self {
        Self {
            x: center.x - half_width,
            y: center.y - half_height,
            width: 2.0 * half_width,
            height: 2.0 * half_height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn padded(self, pad: f64) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
        }
    }
}

/// Label layout of one atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGeometry {
    pub visible: bool,
    /// Isotope prefix, element symbol and charge suffix, e.g. `13C2+`.
    pub text: String,
    /// Offset from the atom center to the start of the text baseline. The
    /// element symbol is centered on the atom; the isotope prefix hangs to
    /// the left.
    pub text_offset: Point,
    /// Clickable area. `None` for hidden atoms.
    pub hit_area: Option<Rect>,
    /// Distance from the center at which incident bonds stop.
    pub clearance: f64,
}

/// Drawn extent of one bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondGeometry {
    /// Center of the `from` atom.
    pub from: Point,
    /// Center of the `to` atom.
    pub to: Point,
    /// Where the drawn line starts, after clearing the `from` label.
    pub start: Point,
    /// Where the drawn line ends, before the `to` label.
    pub end: Point,
}

pub fn charge_suffix(charge: i32) -> String {
    match charge {
        0 => String::new(),
        1 => "+".to_string(),
        -1 => "-".to_string(),
        c if c > 0 => format!("{c}+"),
        c => format!("{}-", c.unsigned_abs()),
    }
}

pub fn label_text(element: &str, isotope: u32, charge: i32) -> String {
    let mut text = String::new();
    if isotope > 0 {
        text.push_str(&isotope.to_string());
    }
    text.push_str(element);
    text.push_str(&charge_suffix(charge));
    text
}

pub(crate) fn layout_label(atom: &Atom, visible: bool, settings: &Settings) -> LabelGeometry {
    let center = atom.center();
    let text = label_text(atom.element(), atom.isotope(), atom.charge());

    if atom.display() == DisplayState::Hidden {
        return LabelGeometry {
            visible: false,
            text,
            text_offset: Point::default(),
            hit_area: None,
            clearance: 0.0,
        };
    }

    if !visible {
        let r = settings.hover_radius;
        return LabelGeometry {
            visible: false,
            text,
            text_offset: Point::default(),
            hit_area: Some(Rect::around(center, r, r)),
            clearance: 0.0,
        };
    }

    let glyph = settings.glyph_width();
    let prefix_width = if atom.isotope() > 0 {
        atom.isotope().to_string().len() as f64 * glyph
    } else {
        0.0
    };
    let symbol_width = atom.element().chars().count() as f64 * glyph;
    let text_width = text.chars().count() as f64 * glyph;
    let height = settings.font_size;

    let text_offset = Point::new(
        -(prefix_width + symbol_width / 2.0),
        height * BASELINE_SHIFT,
    );
    let text_box = Rect {
        x: center.x + text_offset.x,
        y: center.y - height / 2.0,
        width: text_width,
        height,
    };

    LabelGeometry {
        visible: true,
        text,
        text_offset,
        hit_area: Some(text_box.padded(settings.label_padding)),
        clearance: symbol_width.max(height) / 2.0 + settings.label_padding,
    }
}

pub(crate) fn layout_bond(
    from: Point,
    to: Point,
    from_clearance: f64,
    to_clearance: f64,
) -> BondGeometry {
    if from.distance_to(to) <= from_clearance + to_clearance {
        let mid = from.midpoint(to);
        return BondGeometry {
            from,
            to,
            start: mid,
            end: mid,
        };
    }
    BondGeometry {
        from,
        to,
        start: from.towards(to, from_clearance),
        end: to.towards(from, to_clearance),
    }
}
