use std::path::Path;

use anyhow::{Context, Result};

use station_pivot::session::{Event, Session};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Upload, pivot and selection state machine.
    pub session: Session,

    /// Station colours for the current table.
    pub color_map: ColorMap,

    /// File-system problems around the dialogs (read/write failures).
    pub io_error: Option<String>,
}

impl AppState {
    /// Feed an event to the session and refresh derived UI state.
    pub fn dispatch(&mut self, event: Event) {
        let view = self.session.handle(event);
        self.color_map = ColorMap::new(view.stations());
        self.io_error = None;
    }

    /// Read a file from disk and upload it.
    pub fn upload_path(&mut self, path: &Path) -> Result<()> {
        let payload =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dispatch(Event::Upload { filename, payload });
        Ok(())
    }

    /// Write the transformed table to `path`. No-op when nothing is loaded.
    pub fn save_export(&self, path: &Path) -> Result<()> {
        let Some(download) = self.session.export() else {
            return Ok(());
        };
        let download = download.context("building spreadsheet")?;
        std::fs::write(path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved {} ({} bytes)", path.display(), download.bytes.len());
        Ok(())
    }

    /// Toggle a single station in the plot selection.
    pub fn toggle_station(&mut self, station: &str) {
        let mut selection = self.session.selection().to_vec();
        if let Some(pos) = selection.iter().position(|s| s == station) {
            selection.remove(pos);
        } else {
            selection.push(station.to_string());
        }
        self.dispatch(Event::SelectStations(selection));
    }

    /// Select every station.
    pub fn select_all(&mut self) {
        let all = self.session.view().stations().to_vec();
        self.dispatch(Event::SelectStations(all));
    }

    /// Deselect every station.
    pub fn select_none(&mut self) {
        self.dispatch(Event::SelectStations(Vec::new()));
    }
}
