//! Elapsed-time labels for stack frames

use crate::{Error, Result, StackMetadata};
use std::fmt;
use std::str::FromStr;

/// Calibration time unit of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Every unit, smallest first
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
    ];

    /// Calibration tokens naming this unit
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            TimeUnit::Milliseconds => &["ms"],
            TimeUnit::Seconds => &["s", "sec", "second", "seconds"],
            TimeUnit::Minutes => &["m", "min", "minute", "minutes"],
            TimeUnit::Hours => &["h", "hr", "hrs", "hour", "hours"],
        }
    }

    /// Parses a calibration unit token. Matching is case-sensitive.
    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.tokens().contains(&token))
            .ok_or_else(|| Error::UnrecognizedTimeUnit(token.to_string()))
    }

    /// Number of milliseconds in one unit
    pub fn millis_factor(self) -> u64 {
        match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
        }
    }
}

/// Resolves a unit token to its millisecond factor.
///
/// Unknown tokens are treated as milliseconds and reported with a warning.
pub fn resolve_unit_factor(token: &str) -> u64 {
    match TimeUnit::from_token(token) {
        Ok(unit) => unit.millis_factor(),
        Err(e) => {
            tracing::warn!("{e}, treating frame interval as milliseconds");
            1
        }
    }
}

/// A single field of a duration label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Component {
    Days,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl Component {
    const ALL: [Component; 5] = [
        Component::Days,
        Component::Hours,
        Component::Minutes,
        Component::Seconds,
        Component::Millis,
    ];

    fn millis(self) -> u64 {
        match self {
            Component::Days => 86_400_000,
            Component::Hours => 3_600_000,
            Component::Minutes => 60_000,
            Component::Seconds => 1_000,
            Component::Millis => 1,
        }
    }
}

/// Which time components appear in a label, from the most detailed
/// `D-HH:mm:ss.SSS` down to `ss.SSS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DurationTemplate {
    #[default]
    DaysToMillis,
    DaysToSeconds,
    DaysToMinutes,
    HoursToMillis,
    HoursToSeconds,
    HoursToMinutes,
    MinutesToMillis,
    MinutesToSeconds,
    SecondsToMillis,
}

impl DurationTemplate {
    /// Every template, most detailed first
    pub const ALL: [DurationTemplate; 9] = [
        DurationTemplate::DaysToMillis,
        DurationTemplate::DaysToSeconds,
        DurationTemplate::DaysToMinutes,
        DurationTemplate::HoursToMillis,
        DurationTemplate::HoursToSeconds,
        DurationTemplate::HoursToMinutes,
        DurationTemplate::MinutesToMillis,
        DurationTemplate::MinutesToSeconds,
        DurationTemplate::SecondsToMillis,
    ];

    /// Human-readable pattern shown in menus
    pub fn description(self) -> &'static str {
        match self {
            DurationTemplate::DaysToMillis => "D-HH:mm:ss.SSS",
            DurationTemplate::DaysToSeconds => "D-HH:mm:ss",
            DurationTemplate::DaysToMinutes => "D-HH:mm",
            DurationTemplate::HoursToMillis => "HH:mm:ss.SSS",
            DurationTemplate::HoursToSeconds => "HH:mm:ss",
            DurationTemplate::HoursToMinutes => "HH:mm",
            DurationTemplate::MinutesToMillis => "mm:ss.SSS",
            DurationTemplate::MinutesToSeconds => "mm:ss",
            DurationTemplate::SecondsToMillis => "ss.SSS",
        }
    }

    /// Kebab-case identifier, also used for persistence
    pub fn token(self) -> &'static str {
        match self {
            DurationTemplate::DaysToMillis => "days-to-millis",
            DurationTemplate::DaysToSeconds => "days-to-seconds",
            DurationTemplate::DaysToMinutes => "days-to-minutes",
            DurationTemplate::HoursToMillis => "hours-to-millis",
            DurationTemplate::HoursToSeconds => "hours-to-seconds",
            DurationTemplate::HoursToMinutes => "hours-to-minutes",
            DurationTemplate::MinutesToMillis => "minutes-to-millis",
            DurationTemplate::MinutesToSeconds => "minutes-to-seconds",
            DurationTemplate::SecondsToMillis => "seconds-to-millis",
        }
    }

    /// First and last component shown
    fn span(self) -> (Component, Component) {
        use Component::*;
        match self {
            DurationTemplate::DaysToMillis => (Days, Millis),
            DurationTemplate::DaysToSeconds => (Days, Seconds),
            DurationTemplate::DaysToMinutes => (Days, Minutes),
            DurationTemplate::HoursToMillis => (Hours, Millis),
            DurationTemplate::HoursToSeconds => (Hours, Seconds),
            DurationTemplate::HoursToMinutes => (Hours, Minutes),
            DurationTemplate::MinutesToMillis => (Minutes, Millis),
            DurationTemplate::MinutesToSeconds => (Minutes, Seconds),
            DurationTemplate::SecondsToMillis => (Seconds, Millis),
        }
    }

    /// Formats a duration in milliseconds.
    ///
    /// The leading component absorbs every larger unit the template omits
    /// (50 hours under `HH:mm` is `50:00`), and the trailing component
    /// truncates whatever is smaller.
    pub fn format_millis(self, millis: u64, show_units: bool) -> String {
        let (first, last) = self.span();
        let mut rest = millis;
        let mut out = String::with_capacity(16);

        for component in Component::ALL
            .into_iter()
            .filter(|c| *c >= first && *c <= last)
        {
            let value = rest / component.millis();
            rest -= value * component.millis();

            if component != first && !show_units {
                out.push(match component {
                    Component::Hours => '-',
                    Component::Millis => '.',
                    _ => ':',
                });
            }
            if component == Component::Millis && show_units {
                out.push('.');
            }

            match component {
                Component::Days => out.push_str(&value.to_string()),
                Component::Millis => out.push_str(&format!("{value:03}")),
                _ => out.push_str(&format!("{value:02}")),
            }

            if show_units {
                match component {
                    Component::Days => out.push('d'),
                    Component::Hours => out.push('h'),
                    Component::Minutes => out.push('m'),
                    Component::Seconds if last == Component::Seconds => out.push('s'),
                    Component::Millis => out.push('s'),
                    Component::Seconds => {}
                }
            }
        }

        out
    }
}

impl fmt::Display for DurationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for DurationTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DurationTemplate::ALL
            .into_iter()
            .find(|t| t.description() == s || t.token() == s)
            .ok_or_else(|| Error::UnknownOption {
                kind: "duration template",
                value: s.to_string(),
            })
    }
}

/// Formats elapsed-time labels for the frames of one stack.
///
/// The calibration unit is resolved once on construction, so formatting
/// every frame of a long stack reports an unknown unit only once.
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    frame_interval_ms: f64,
    template: DurationTemplate,
    show_units: bool,
}

impl TimeFormatter {
    /// Creates a formatter from the stack calibration
    pub fn new(metadata: &StackMetadata, template: DurationTemplate, show_units: bool) -> Self {
        let factor = resolve_unit_factor(&metadata.time_unit);
        Self {
            frame_interval_ms: metadata.frame_interval * factor as f64,
            template,
            show_units,
        }
    }

    /// Elapsed milliseconds at a 1-based frame; frame 1 is always zero
    pub fn elapsed_millis(&self, frame: u32) -> u64 {
        // Float-to-int casts saturate, so a negative interval clamps to zero.
        (frame.saturating_sub(1) as f64 * self.frame_interval_ms) as u64
    }

    /// Label for a 1-based frame
    pub fn label(&self, frame: u32) -> String {
        self.template
            .format_millis(self.elapsed_millis(frame), self.show_units)
    }
}

/// Formats the label of a single 1-based frame
pub fn format_frame_label(
    frame: u32,
    metadata: &StackMetadata,
    template: DurationTemplate,
    show_units: bool,
) -> String {
    TimeFormatter::new(metadata, template, show_units).label(frame)
}
