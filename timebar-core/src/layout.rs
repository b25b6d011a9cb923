//! Geometry of the time bar elements
//!
//! The assembly is a box holding the bar stacked above the label, optionally
//! surrounded by a background plate. Everything here is a pure function of
//! its inputs; the host measures text and draws the resulting rectangles.

use crate::{
    Configuration, DurationTemplate, Error, FontSpec, Location, RegionOfInterest, Result,
    StackMetadata, TextMeasure, TimeFormatter,
};

/// Axis-aligned rectangle in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Checks that `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Top-left corner of the assembly (background plate when present)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

/// Size of the bar + label box, without margins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxSize {
    pub width: i32,
    pub height: i32,
}

/// Gap to the image edge and padding inside the background plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub outer: i32,
    pub inner: i32,
}

/// Resolved geometry of every element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResult {
    pub origin: Origin,
    pub box_size: BoxSize,
    pub margins: Margins,
    /// Present only when a background color is configured
    pub background: Option<Rect>,
    /// Full bar extent; zero-sized when the bar is hidden
    pub bar: Rect,
    pub text: Rect,
}

impl LayoutResult {
    /// Filled bar width at a 1-based frame.
    ///
    /// Empty at frame 1 and full at the last frame. A single-frame stack
    /// always shows a full bar.
    pub fn bar_fill_width(&self, frame: u32, frame_count: u32) -> i32 {
        if frame_count <= 1 {
            return self.bar.width;
        }
        let frame = frame.clamp(1, frame_count);
        let filled = i64::from(self.bar.width) * i64::from(frame - 1) / i64::from(frame_count - 1);
        filled as i32
    }

    /// Filled part of the bar at a 1-based frame
    pub fn bar_fill(&self, frame: u32, frame_count: u32) -> Rect {
        Rect {
            width: self.bar_fill_width(frame, frame_count),
            ..self.bar
        }
    }
}

/// Widest label over every frame of the stack.
///
/// Every frame is measured: with proportional fonts the widest label is not
/// necessarily the last one.
pub fn measure_label_width(
    metadata: &StackMetadata,
    template: DurationTemplate,
    show_units: bool,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> i32 {
    let formatter = TimeFormatter::new(metadata, template, show_units);
    widest_label(&formatter, metadata.frame_count, font, measure)
}

/// Widest label of frames `1..=frame_count` for an existing formatter
pub fn widest_label(
    formatter: &TimeFormatter,
    frame_count: u32,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> i32 {
    let width = (1..=frame_count)
        .map(|frame| measure.measure_width(&formatter.label(frame), font))
        .max()
        .unwrap_or(0);

    tracing::debug!("Measured label width {}px over {} frames", width, frame_count);
    to_px(width)
}

/// Pixel count as a coordinate, saturating at `i32::MAX`
fn to_px(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Box size: the bar stacked above a line of text
pub fn compute_box_size(config: &Configuration, label_width: i32) -> BoxSize {
    // float-to-int casts saturate
    let text_height = (f64::from(config.font_size_px()) * 1.25).round() as i32;
    BoxSize {
        width: label_width,
        height: to_px(config.effective_bar_thickness()).saturating_add(text_height),
    }
}

/// Outer margin scales with the image; inner margin exists only around a
/// visible background plate.
pub fn compute_margins(
    image_width: u32,
    image_height: u32,
    box_width: i32,
    has_background: bool,
) -> Margins {
    let outer = i32::try_from((u64::from(image_width) + u64::from(image_height)) / 100)
        .unwrap_or(i32::MAX);
    let inner = if has_background {
        (box_width / 20).max(2)
    } else {
        0
    };
    Margins { outer, inner }
}

/// Top-left corner of the assembly for a location.
///
/// Fails with [`Error::MissingAnchor`] for [`Location::AtSelection`] when
/// there is no selection.
pub fn resolve_anchor(
    location: Location,
    image_width: u32,
    image_height: u32,
    box_size: BoxSize,
    margins: Margins,
    roi: Option<&RegionOfInterest>,
) -> Result<Origin> {
    let Margins { outer, inner } = margins;
    let inset = |extent: u32, size: i32| {
        to_px(extent)
            .saturating_sub(outer)
            .saturating_sub(inner)
            .saturating_sub(size)
            .saturating_sub(inner)
    };
    let right_x = inset(image_width, box_size.width);
    let bottom_y = inset(image_height, box_size.height);

    let origin = match location {
        Location::UpperRight => Origin { x: right_x, y: outer },
        Location::LowerRight => Origin {
            x: right_x,
            y: bottom_y,
        },
        Location::UpperLeft => Origin { x: outer, y: outer },
        Location::LowerLeft => Origin {
            x: outer,
            y: bottom_y,
        },
        Location::AtSelection => {
            let roi = roi.ok_or(Error::MissingAnchor)?;
            Origin { x: roi.x, y: roi.y }
        }
    };

    Ok(origin)
}

/// Computes the rectangles of the background, bar and text
pub fn layout(
    config: &Configuration,
    metadata: &StackMetadata,
    label_width: i32,
    roi: Option<&RegionOfInterest>,
) -> Result<LayoutResult> {
    let box_size = compute_box_size(config, label_width);
    let margins = compute_margins(
        metadata.width,
        metadata.height,
        box_size.width,
        config.has_background(),
    );
    let origin = resolve_anchor(
        config.location,
        metadata.width,
        metadata.height,
        box_size,
        margins,
        roi,
    )?;

    let background = config.has_background().then(|| Rect {
        x: origin.x,
        y: origin.y,
        width: margins.inner.saturating_mul(2).saturating_add(box_size.width),
        height: margins.inner.saturating_mul(2).saturating_add(box_size.height),
    });

    let bar = Rect {
        x: origin.x.saturating_add(margins.inner),
        y: origin.y.saturating_add(margins.inner),
        width: if config.hide_bar { 0 } else { box_size.width },
        height: to_px(config.effective_bar_thickness()),
    };

    let text = Rect {
        x: origin.x.saturating_add(margins.inner),
        y: bar.bottom(),
        width: box_size.width,
        height: to_px(config.font_size_px()),
    };

    tracing::debug!(
        "Anchored time bar at ({}, {}) for location {}",
        origin.x,
        origin.y,
        config.location
    );

    Ok(LayoutResult {
        origin,
        box_size,
        margins,
        background,
        bar,
        text,
    })
}
