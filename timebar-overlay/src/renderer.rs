//! Renderer seam between planned overlays and the host

use crate::{DrawMode, OverlayPlanner, PlacedOverlay, PlanScope, Result};

/// Draws planned overlays onto the host's image.
///
/// The host owns fonts and pixels; this trait only receives finished
/// geometry, labels and colors.
pub trait OverlayRenderer {
    /// Removes every element previously drawn under `tag`
    fn clear(&mut self, tag: &str) -> Result<()>;

    /// Draws one overlay at its stack position
    fn draw(&mut self, placed: &PlacedOverlay, mode: DrawMode) -> Result<()>;
}

/// Plans `scope` and draws it, replacing any previous time bar.
///
/// Planning happens before the old bar is cleared, so a missing anchor
/// leaves the image untouched. Returns the number of overlays drawn.
pub fn apply(
    planner: &OverlayPlanner,
    scope: PlanScope,
    renderer: &mut dyn OverlayRenderer,
) -> Result<usize> {
    let placed = planner.plan(scope)?;
    let mode = planner.draw_mode();

    if let Some(first) = placed.first() {
        renderer.clear(first.tag)?;
    }
    for overlay in &placed {
        renderer.draw(overlay, mode)?;
    }

    tracing::debug!("Drew {} time bar overlays ({:?})", placed.len(), mode);
    Ok(placed.len())
}

/// Renderer that keeps every draw call in memory
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub drawn: Vec<(PlacedOverlay, DrawMode)>,
    pub clears: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn clear(&mut self, tag: &str) -> Result<()> {
        self.drawn.retain(|(placed, _)| placed.tag != tag);
        self.clears += 1;
        Ok(())
    }

    fn draw(&mut self, placed: &PlacedOverlay, mode: DrawMode) -> Result<()> {
        self.drawn.push((placed.clone(), mode));
        Ok(())
    }
}
