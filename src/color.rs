use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

// ---------------------------------------------------------------------------
// Station palette
// ---------------------------------------------------------------------------

/// Golden angle in degrees: consecutive hues land far apart for any `n`.
const HUE_STEP: f32 = 137.507_77;

/// `n` distinct colours, one per station column.
///
/// Hues advance by the golden angle instead of splitting the wheel into
/// `n` slices, so a station keeps its colour when later columns are added.
pub fn station_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * HUE_STEP) % 360.0;
            let rgb: Srgb<u8> = Srgb::from_color(Hsl::new(hue, 0.7, 0.45)).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: station → Color32
// ---------------------------------------------------------------------------

/// Assigns each station of the current table a stable colour, shared by
/// the selector swatches and the plot traces.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given stations, in column order.
    pub fn new(stations: &[String]) -> Self {
        let palette = station_palette(stations.len());
        let mapping = stations
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a station.
    pub fn color_for(&self, station: &str) -> Color32 {
        self.mapping
            .get(station)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_station_gets_a_distinct_colour() {
        let stations: Vec<String> = ["A", "B", "C"].map(String::from).to_vec();
        let map = ColorMap::new(&stations);
        let a = map.color_for("A");
        assert_ne!(a, map.color_for("B"));
        assert_ne!(map.color_for("B"), map.color_for("C"));
        assert_eq!(map.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn adding_stations_keeps_existing_colours() {
        let short = station_palette(3);
        let long = station_palette(8);
        assert_eq!(short[..], long[..3]);
        assert!(station_palette(0).is_empty());
    }
}
