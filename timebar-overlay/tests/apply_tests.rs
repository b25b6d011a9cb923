use timebar_core::{
    AdvanceTableMeasure, Configuration, DurationTemplate, Location, MemoryStore, NamedColor,
    RegionOfInterest, Session, StackMetadata, StackPosition,
};
use timebar_overlay::{
    apply, DrawMode, Error, OverlayElement, OverlayPlanner, OverlayRenderer, PlacedOverlay,
    PlanScope, RecordingRenderer,
};

struct FailingRenderer;

impl OverlayRenderer for FailingRenderer {
    fn clear(&mut self, _tag: &str) -> timebar_overlay::Result<()> {
        Ok(())
    }

    fn draw(&mut self, _placed: &PlacedOverlay, _mode: DrawMode) -> timebar_overlay::Result<()> {
        Err(Error::Renderer("canvas is read-only".to_string()))
    }
}

fn metadata() -> StackMetadata {
    StackMetadata::new(640, 480, 12, 5.0, "min").with_hyperstack(1, 2)
}

fn config() -> Configuration {
    Configuration {
        duration_template: DurationTemplate::HoursToMinutes,
        background_color: Some(NamedColor::Gray),
        ..Configuration::default()
    }
}

#[test]
fn test_preview_then_full_stack_replaces_bar() {
    let planner = OverlayPlanner::new(config(), metadata(), None, &AdvanceTableMeasure);
    let mut renderer = RecordingRenderer::new();

    let drawn = apply(
        &planner,
        PlanScope::Preview(StackPosition::new(1, 2, 7)),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(drawn, 1);
    assert_eq!(renderer.drawn[0].0.overlay.label(), Some("00h30m"));
    assert_eq!(renderer.drawn[0].1, DrawMode::Overlay);

    let drawn = apply(&planner, PlanScope::AllFrames, &mut renderer).unwrap();
    assert_eq!(drawn, 24);
    assert_eq!(renderer.drawn.len(), 24);
    assert_eq!(renderer.clears, 2);
}

#[test]
fn test_every_frame_fits_on_the_plate() {
    let planner = OverlayPlanner::new(config(), metadata(), None, &AdvanceTableMeasure);
    let layout = planner.layout().unwrap();
    let plate = layout.background.unwrap();

    for placed in planner.plan(PlanScope::AllFrames).unwrap() {
        for element in &placed.overlay.elements {
            match element {
                OverlayElement::Background { rect, .. } => assert_eq!(*rect, plate),
                OverlayElement::Bar { rect, .. } => {
                    assert!(plate.contains(rect));
                    assert!(rect.width <= layout.bar.width);
                }
                OverlayElement::Text { rect, .. } => assert!(plate.contains(rect)),
            }
        }
    }
}

#[test]
fn test_missing_selection_leaves_previous_bar() {
    let mut renderer = RecordingRenderer::new();
    let planner = OverlayPlanner::new(config(), metadata(), None, &AdvanceTableMeasure);
    apply(&planner, PlanScope::AllFrames, &mut renderer).unwrap();

    let at_selection = Configuration {
        location: Location::AtSelection,
        ..config()
    };
    let planner = OverlayPlanner::new(at_selection, metadata(), None, &AdvanceTableMeasure);
    let err = apply(&planner, PlanScope::AllFrames, &mut renderer).unwrap_err();

    assert!(matches!(err, Error::Core(timebar_core::Error::MissingAnchor)));
    assert_eq!(renderer.drawn.len(), 24);
    assert_eq!(renderer.clears, 1);
}

#[test]
fn test_renderer_errors_propagate() {
    let planner = OverlayPlanner::new(config(), metadata(), None, &AdvanceTableMeasure);
    let err = apply(&planner, PlanScope::AllFrames, &mut FailingRenderer).unwrap_err();
    assert!(matches!(err, Error::Renderer(_)));
}

#[test]
fn test_session_with_selection_anchors_at_roi() {
    let roi = RegionOfInterest::new(25, 40, 100, 60);
    let mut session = Session::open(MemoryStore::new(), Some(roi), false);
    session.config_mut().use_overlay = false;

    let planner = OverlayPlanner::new(
        session.config().clone(),
        metadata(),
        session.roi().copied(),
        &AdvanceTableMeasure,
    );
    let mut renderer = RecordingRenderer::new();
    apply(&planner, PlanScope::AllFrames, &mut renderer).unwrap();

    let layout = planner.layout().unwrap();
    assert_eq!((layout.origin.x, layout.origin.y), (25, 40));
    assert!(renderer
        .drawn
        .iter()
        .all(|(_, mode)| *mode == DrawMode::BurnIn));

    let (confirmed, store) = session.confirm().unwrap();
    assert_eq!(confirmed.location, Location::AtSelection);
    assert_eq!(
        timebar_core::ConfigStore::load(&store).unwrap(),
        Some(confirmed)
    );
}
