//! Overlay planner for time bar frames

use crate::{Error, Result};
use timebar_core::layout::{self, LayoutResult, Rect};
use timebar_core::{
    Configuration, FontSpec, NamedColor, RegionOfInterest, StackMetadata, StackPosition,
    TextMeasure, TimeFormatter,
};

/// Name given to every element drawn by the planner, so a host can find
/// and remove a previously drawn time bar.
pub const TIME_BAR_TAG: &str = "|TB|";

/// How the host should apply the elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DrawMode {
    /// Non-destructive overlay that can be removed later
    Overlay,
    /// Drawn into the pixel data
    BurnIn,
}

/// A single drawable element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum OverlayElement {
    Background {
        rect: Rect,
        color: NamedColor,
    },
    /// Filled part of the bar for this frame
    Bar {
        rect: Rect,
        color: NamedColor,
    },
    Text {
        rect: Rect,
        label: String,
        font: FontSpec,
        color: NamedColor,
    },
}

/// Elements for one frame, back to front
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameOverlay {
    pub frame: u32,
    pub elements: Vec<OverlayElement>,
}

impl FrameOverlay {
    /// Label text of this frame, if any
    pub fn label(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            OverlayElement::Text { label, .. } => Some(label.as_str()),
            _ => None,
        })
    }
}

/// A frame overlay bound to its place in the hyperstack
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlacedOverlay {
    pub position: StackPosition,
    /// 1-based index in the flat stack
    pub stack_index: u32,
    pub tag: &'static str,
    pub overlay: FrameOverlay,
}

/// Which frames to plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanScope {
    /// Only the currently displayed position
    Preview(StackPosition),
    /// Every channel, slice and frame
    AllFrames,
}

/// Plans time bar overlays for the frames of one stack
pub struct OverlayPlanner {
    config: Configuration,
    metadata: StackMetadata,
    roi: Option<RegionOfInterest>,
    formatter: TimeFormatter,
    label_width: i32,
}

impl OverlayPlanner {
    /// Creates a planner, measuring the widest label of the stack once
    pub fn new(
        config: Configuration,
        metadata: StackMetadata,
        roi: Option<RegionOfInterest>,
        measure: &dyn TextMeasure,
    ) -> Self {
        let config = config.normalized();
        let formatter = TimeFormatter::new(&metadata, config.duration_template, config.show_units);
        let label_width =
            layout::widest_label(&formatter, metadata.frame_count, &config.font(), measure);

        Self {
            config,
            metadata,
            roi,
            formatter,
            label_width,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn metadata(&self) -> &StackMetadata {
        &self.metadata
    }

    /// Widest label width measured on construction
    pub fn label_width(&self) -> i32 {
        self.label_width
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.config.use_overlay {
            DrawMode::Overlay
        } else {
            DrawMode::BurnIn
        }
    }

    /// Element geometry shared by every frame
    pub fn layout(&self) -> Result<LayoutResult> {
        let result = layout::layout(
            &self.config,
            &self.metadata,
            self.label_width,
            self.roi.as_ref(),
        )?;
        Ok(result)
    }

    /// Label text of a 1-based frame
    pub fn label(&self, frame: u32) -> String {
        self.formatter.label(frame)
    }

    /// Plans the elements of a single 1-based frame
    pub fn plan_frame(&self, frame: u32) -> Result<FrameOverlay> {
        if !(1..=self.metadata.frame_count).contains(&frame) {
            return Err(timebar_core::Error::InvalidFrame {
                frame,
                frame_count: self.metadata.frame_count,
            }
            .into());
        }
        let layout = self.layout()?;
        Ok(self.build_frame(&layout, frame))
    }

    /// Plans every overlay in scope.
    ///
    /// The layout is resolved before anything is planned, so an unresolvable
    /// anchor yields an error and no overlays at all.
    pub fn plan(&self, scope: PlanScope) -> Result<Vec<PlacedOverlay>> {
        let layout = self.layout()?;

        let positions: Vec<StackPosition> = match scope {
            PlanScope::Preview(position) => {
                if !self.metadata.contains(position) {
                    return Err(Error::PositionOutOfRange {
                        channel: position.channel,
                        slice: position.slice,
                        frame: position.frame,
                    });
                }
                vec![position]
            }
            PlanScope::AllFrames => {
                let channels = self.metadata.channel_count.max(1);
                let slices = self.metadata.slice_count.max(1);
                (1..=channels)
                    .flat_map(|c| (1..=slices).map(move |s| (c, s)))
                    .flat_map(|(c, s)| {
                        (1..=self.metadata.frame_count).map(move |f| StackPosition::new(c, s, f))
                    })
                    .collect()
            }
        };

        let placed = positions
            .into_iter()
            .map(|position| PlacedOverlay {
                position,
                stack_index: self.metadata.stack_index(position),
                tag: TIME_BAR_TAG,
                overlay: self.build_frame(&layout, position.frame),
            })
            .collect::<Vec<_>>();

        tracing::debug!("Planned {} time bar overlays", placed.len());
        Ok(placed)
    }

    fn build_frame(&self, layout: &LayoutResult, frame: u32) -> FrameOverlay {
        let mut elements = Vec::with_capacity(3);

        if let (Some(rect), Some(color)) = (layout.background, self.config.background_color) {
            elements.push(OverlayElement::Background { rect, color });
        }

        if let Some(color) = self.config.bar_color.filter(|_| !self.config.hide_bar) {
            elements.push(OverlayElement::Bar {
                rect: layout.bar_fill(frame, self.metadata.frame_count),
                color,
            });
        }

        elements.push(OverlayElement::Text {
            rect: layout.text,
            label: self.label(frame),
            font: self.config.font(),
            color: self.config.text_color(),
        });

        FrameOverlay { frame, elements }
    }
}
