//! Timebar CLI Tool
//!
//! Command-line interface for previewing time-stamp bar labels, layouts and
//! per-frame overlays, and for managing the last-used configuration.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use timebar_core::{
    layout, AdvanceTableMeasure, Configuration, DurationTemplate, JsonFileStore, Location,
    NamedColor, RegionOfInterest, Session, StackMetadata, StackPosition, TimeFormatter,
    TimeUnit,
};
use timebar_overlay::{OverlayElement, OverlayPlanner, PlacedOverlay, PlanScope};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timebar")]
#[command(about = "Time-stamp bar layout for image stacks")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the time label of one or every frame
    Label {
        #[command(flatten)]
        stack: StackArgs,

        #[command(flatten)]
        options: ConfigArgs,

        /// 1-based frame number
        #[arg(long, default_value = "1")]
        frame: u32,

        /// Print every frame's label
        #[arg(long)]
        all: bool,
    },

    /// Compute the background, bar and text rectangles
    Layout {
        #[command(flatten)]
        stack: StackArgs,

        #[command(flatten)]
        options: ConfigArgs,

        /// Selection origin as X,Y
        #[arg(long, value_parser = parse_roi)]
        roi: Option<RegionOfInterest>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Save the resulting configuration as the last-used one
        #[arg(long)]
        save: bool,
    },

    /// Plan the overlay elements of the current position or the whole stack
    Plan {
        #[command(flatten)]
        stack: StackArgs,

        #[command(flatten)]
        options: ConfigArgs,

        /// Selection origin as X,Y
        #[arg(long, value_parser = parse_roi)]
        roi: Option<RegionOfInterest>,

        /// Preview a single frame instead of the whole stack
        #[arg(long)]
        frame: Option<u32>,

        /// Channel of the previewed frame
        #[arg(long, default_value = "1")]
        channel: u32,

        /// Slice of the previewed frame
        #[arg(long, default_value = "1")]
        slice: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Save the resulting configuration as the last-used one
        #[arg(long)]
        save: bool,
    },

    /// Show or reset the last-used configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List duration templates, time units, locations and colors
    Formats,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration as JSON
    Show,
    /// Forget the saved configuration
    Reset,
}

#[derive(Args)]
struct StackArgs {
    /// Image width in pixels
    #[arg(long, default_value = "512")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "512")]
    height: u32,

    /// Number of frames (time points)
    #[arg(long, default_value = "10")]
    frames: u32,

    /// Number of channels
    #[arg(long, default_value = "1")]
    channels: u32,

    /// Number of z-slices
    #[arg(long, default_value = "1")]
    slices: u32,

    /// Time between frames, in --unit
    #[arg(long, default_value = "1")]
    interval: f64,

    /// Calibration unit (ms, s, min, h, ...)
    #[arg(long, default_value = "s")]
    unit: String,
}

impl StackArgs {
    fn metadata(&self) -> Result<StackMetadata> {
        if self.frames == 0 {
            bail!("Stack must have at least one frame");
        }
        Ok(
            StackMetadata::new(self.width, self.height, self.frames, self.interval, &self.unit)
                .with_hyperstack(self.channels, self.slices),
        )
    }
}

/// Overrides applied on top of the last-used configuration
#[derive(Args)]
struct ConfigArgs {
    /// Bar thickness in pixels
    #[arg(long)]
    thickness: Option<u32>,

    /// Font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Bar and text color, or "none" to suppress the bar
    #[arg(long)]
    color: Option<String>,

    /// Background plate color, or "none"
    #[arg(long)]
    background: Option<String>,

    /// upper-right, lower-right, lower-left, upper-left or at-selection
    #[arg(long)]
    location: Option<Location>,

    /// Duration template, e.g. "mm:ss" or "D-HH:mm:ss.SSS"
    #[arg(long)]
    template: Option<DurationTemplate>,

    /// Append unit letters to the label
    #[arg(long)]
    units: Option<bool>,

    /// Bold label
    #[arg(long)]
    bold: Option<bool>,

    /// Serif label font
    #[arg(long)]
    serif: Option<bool>,

    /// Hide the bar, keep the label
    #[arg(long)]
    hide_bar: Option<bool>,

    /// Draw as overlay (true) or into the pixels (false)
    #[arg(long)]
    overlay: Option<bool>,
}

impl ConfigArgs {
    fn apply(&self, config: &mut Configuration) -> Result<()> {
        if let Some(thickness) = self.thickness {
            config.bar_thickness = thickness;
        }
        if let Some(size) = self.font_size {
            config.set_font_size(size);
        }
        if let Some(color) = &self.color {
            config.bar_color = NamedColor::parse_optional(color)?;
        }
        if let Some(color) = &self.background {
            config.background_color = NamedColor::parse_optional(color)?;
        }
        if let Some(location) = self.location {
            config.location = location;
        }
        if let Some(template) = self.template {
            config.duration_template = template;
        }
        if let Some(units) = self.units {
            config.show_units = units;
        }
        if let Some(bold) = self.bold {
            config.bold_text = bold;
        }
        if let Some(serif) = self.serif {
            config.serif_font = serif;
        }
        if let Some(hide_bar) = self.hide_bar {
            config.hide_bar = hide_bar;
        }
        if let Some(overlay) = self.overlay {
            config.use_overlay = overlay;
        }
        Ok(())
    }
}

fn parse_roi(value: &str) -> std::result::Result<RegionOfInterest, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid X: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid Y: {e}"))?;
    Ok(RegionOfInterest::at(x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timebar=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let store = open_store(cli.config)?;

    match cli.command {
        Commands::Label {
            stack,
            options,
            frame,
            all,
        } => print_labels(store, &stack, &options, frame, all)?,

        Commands::Layout {
            stack,
            options,
            roi,
            json,
            save,
        } => print_layout(store, &stack, &options, roi, json, save)?,

        Commands::Plan {
            stack,
            options,
            roi,
            frame,
            channel,
            slice,
            json,
            save,
        } => {
            let scope = match frame {
                Some(frame) => PlanScope::Preview(StackPosition::new(channel, slice, frame)),
                None => PlanScope::AllFrames,
            };
            print_plan(store, &stack, &options, roi, scope, json, save)?
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = timebar_core::store::load_or_default(&store);
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Reset => {
                let mut store = store;
                store.clear().context("Failed to remove saved configuration")?;
                println!("Configuration reset to defaults ({})", store.path().display());
            }
        },

        Commands::Formats => print_formats(),
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<JsonFileStore> {
    let path = match path {
        Some(path) => path,
        None => directories::ProjectDirs::from("org", "timebar", "timebar")
            .context("Could not determine a configuration directory")?
            .config_dir()
            .join("config.json"),
    };
    tracing::debug!("Using configuration file {}", path.display());
    Ok(JsonFileStore::new(path))
}

/// Opens a session over the saved configuration and applies the overrides
fn open_session(
    store: JsonFileStore,
    options: &ConfigArgs,
    roi: Option<RegionOfInterest>,
) -> Result<Session<JsonFileStore>> {
    let mut session = Session::open(store, roi, false);
    options
        .apply(session.config_mut())
        .context("Invalid configuration option")?;
    Ok(session)
}

fn finish_session(session: Session<JsonFileStore>, save: bool) -> Result<()> {
    if save {
        let (_, store) = session
            .confirm()
            .context("Failed to save configuration")?;
        println!("Saved configuration to {}", store.path().display());
    }
    Ok(())
}

fn print_labels(
    store: JsonFileStore,
    stack: &StackArgs,
    options: &ConfigArgs,
    frame: u32,
    all: bool,
) -> Result<()> {
    let metadata = stack.metadata()?;
    let session = open_session(store, options, None)?;
    let config = session.config();
    let formatter = TimeFormatter::new(&metadata, config.duration_template, config.show_units);

    if all {
        for f in 1..=metadata.frame_count {
            println!("{:>6}  {}", f, formatter.label(f));
        }
    } else {
        if !(1..=metadata.frame_count).contains(&frame) {
            bail!(timebar_core::Error::InvalidFrame {
                frame,
                frame_count: metadata.frame_count,
            });
        }
        println!("{}", formatter.label(frame));
    }

    Ok(())
}

fn print_layout(
    store: JsonFileStore,
    stack: &StackArgs,
    options: &ConfigArgs,
    roi: Option<RegionOfInterest>,
    json: bool,
    save: bool,
) -> Result<()> {
    let metadata = stack.metadata()?;
    let session = open_session(store, options, roi)?;
    let config = session.config();

    let label_width = layout::measure_label_width(
        &metadata,
        config.duration_template,
        config.show_units,
        &config.font(),
        &AdvanceTableMeasure,
    );
    let result = layout::layout(config, &metadata, label_width, session.roi())
        .context("Failed to lay out the time bar")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("=== Time Bar Layout ===");
        println!("Image: {}x{}", metadata.width, metadata.height);
        println!("Location: {}", config.location);
        println!("Label width: {} px", label_width);
        println!("Origin: ({}, {})", result.origin.x, result.origin.y);
        println!(
            "Margins: outer {} px, inner {} px",
            result.margins.outer, result.margins.inner
        );
        match result.background {
            Some(bg) => println!(
                "Background: {}x{} at ({}, {})",
                bg.width, bg.height, bg.x, bg.y
            ),
            None => println!("Background: none"),
        }
        println!(
            "Bar: {}x{} at ({}, {})",
            result.bar.width, result.bar.height, result.bar.x, result.bar.y
        );
        println!(
            "Text: {}x{} at ({}, {})",
            result.text.width, result.text.height, result.text.x, result.text.y
        );
    }

    finish_session(session, save)
}

fn print_plan(
    store: JsonFileStore,
    stack: &StackArgs,
    options: &ConfigArgs,
    roi: Option<RegionOfInterest>,
    scope: PlanScope,
    json: bool,
    save: bool,
) -> Result<()> {
    let metadata = stack.metadata()?;
    let session = open_session(store, options, roi)?;
    let planner = OverlayPlanner::new(
        session.config().clone(),
        metadata,
        session.roi().copied(),
        &AdvanceTableMeasure,
    );

    let placed = planner.plan(scope).context("Failed to plan overlays")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&placed)?);
    } else {
        let metadata = planner.metadata();
        println!(
            "Planned {} overlays on {}x{} ({} at {}, {:?}, label width {} px)",
            placed.len(),
            metadata.width,
            metadata.height,
            planner.config().duration_template,
            planner.config().location,
            planner.draw_mode(),
            planner.label_width()
        );
        for overlay in placed.iter().take(20) {
            print_placed(overlay);
        }
        if placed.len() > 20 {
            println!("  ... and {} more overlays", placed.len() - 20);
        }
    }

    finish_session(session, save)
}

fn print_placed(placed: &PlacedOverlay) {
    let position = placed.position;
    let mut parts = Vec::new();
    for element in &placed.overlay.elements {
        match element {
            OverlayElement::Background { rect, color } => {
                parts.push(format!("plate {}x{} {}", rect.width, rect.height, color))
            }
            OverlayElement::Bar { rect, color } => {
                parts.push(format!("bar {}px {}", rect.width, color))
            }
            OverlayElement::Text {
                label, rect, font, ..
            } => parts.push(format!(
                "'{}' at ({}, {}) {} {}px",
                label,
                rect.x,
                rect.y,
                font.family.name(),
                font.size_px
            )),
        }
    }
    println!(
        "  [{}] c{} s{} f{}: {}",
        placed.stack_index,
        position.channel,
        position.slice,
        position.frame,
        parts.join(", ")
    );
}

fn print_formats() {
    println!("=== Duration templates ===");
    let sample = 93_784_005;
    for template in DurationTemplate::ALL {
        println!(
            "  {:<16} {:<20} {:<16} {}",
            template.description(),
            template.token(),
            template.format_millis(sample, false),
            template.format_millis(sample, true)
        );
    }

    println!("\n=== Time units ===");
    for unit in TimeUnit::ALL {
        println!("  {:<10} {}", unit.millis_factor(), unit.tokens().join(", "));
    }

    println!("\n=== Locations ===");
    for location in Location::ALL {
        println!("  {:<14} {}", location.label(), location.token());
    }

    println!("\n=== Colors ===");
    for color in NamedColor::ALL {
        println!("  {:<12} {:<12} {}", color.label(), color.token(), color.rgb());
    }
    println!("  {:<12} none", "None");
}
