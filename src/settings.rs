use serde::{Deserialize, Serialize};

/// Editor-wide layout options.
///
/// Missing fields fall back to [`Settings::default`] when deserializing, so
/// a partial settings record is always usable.
///
/// ```
/// use molsketch::Settings;
///
/// let settings = Settings {
///     skeleton_display: false,
///     ..Settings::default()
/// };
/// assert_eq!(settings.bond_length, 40.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of a newly drawn bond, in canvas units.
    pub bond_length: f64,
    /// How far (in radians) two bonds may deviate from a straight line and
    /// still count as linear when saturating a carbon.
    pub straight_tolerance: f64,
    /// Hide unlabelled carbon backbone atoms.
    pub skeleton_display: bool,
    pub font_size: f64,
    /// Gap between a label and the bonds drawn towards it.
    pub label_padding: f64,
    /// Half the side of the clickable square around an unlabelled atom.
    pub hover_radius: f64,
    /// Canvas length that maps to one bond length in Ketcher coordinates.
    pub bond_length_unit: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bond_length: 40.0,
            straight_tolerance: 10f64.to_radians(),
            skeleton_display: true,
            font_size: 16.0,
            label_padding: 2.0,
            hover_radius: 8.0,
            bond_length_unit: 40.0,
        }
    }
}

impl Settings {
    /// Approximate advance width of one label glyph.
    pub fn glyph_width(&self) -> f64 {
        self.font_size * 0.6
    }
}
