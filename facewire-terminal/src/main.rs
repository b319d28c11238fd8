/// Facewire - parametric face wireframes
///
/// Renders a face to a PNG file or previews it in the terminal.
/// Viewer controls:
///   - WASD / Arrow Keys: Turn and tilt the head
///   - +/-: Move the camera closer or farther
///   - R: Reset sliders to the preset defaults
///   - Q/ESC: Quit
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use facewire_core::raster::DEFAULT_FIT_MARGIN;
use facewire_core::{
    parse_assignments, parse_name_list, render, FitPolicy, ModelKind, Preset, RenderRequest,
    RenderStyle,
};
use facewire_terminal::{export, TerminalApp};
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "facewire")]
#[command(about = "Parametric face wireframe renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the face to a PNG file
    Render {
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        face: FaceArgs,
    },
    /// Preview the face interactively in the terminal
    View {
        #[command(flatten)]
        face: FaceArgs,
    },
}

#[derive(Args, Debug)]
struct FaceArgs {
    /// Base face: male or female
    #[arg(short, long, default_value = "male")]
    preset: Preset,
    /// Face model: landmarks or curves
    #[arg(short, long, default_value = "landmarks")]
    model: ModelKind,
    /// Slider assignments, e.g. "eye_distance=0.35, jaw_width=0.9"
    #[arg(short, long = "set", value_name = "ASSIGNMENTS")]
    set: Vec<String>,
    /// Sliders to reset to the preset default, or "all"
    #[arg(long, value_name = "NAMES")]
    reset: Vec<String>,
    /// Horizontal measurements given as full spans instead of half spans
    #[arg(long, value_name = "NAMES")]
    full_span: Vec<String>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
    /// Line thickness in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    thickness: Option<u32>,
    #[arg(long, value_enum)]
    fit: Option<FitArg>,
    /// Fraction of the canvas the face fills when autofitting, in (0, 1]
    #[arg(long, value_parser = parse_margin)]
    margin: Option<f32>,
    #[arg(long, value_enum)]
    style: Option<StyleArg>,
    /// Pass slider values through without clamping them to their ranges
    #[arg(long)]
    no_clamp: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FitArg {
    Auto,
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Light,
    Dark,
}

fn parse_margin(text: &str) -> std::result::Result<f32, String> {
    let margin: f32 = text
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if margin > 0.0 && margin <= 1.0 {
        Ok(margin)
    } else {
        Err(format!("margin must be in (0, 1], got {text}"))
    }
}

impl FaceArgs {
    /// Build the render request, failing on any unknown name or malformed
    /// list before anything is drawn
    fn to_request(&self) -> Result<RenderRequest> {
        let mut request = RenderRequest::new(self.preset, self.model);

        for text in &self.set {
            request.params = request.params.with_assignments(&parse_assignments(text)?)?;
        }
        if !self.no_clamp {
            request.params = request.params.clamped();
        }
        for text in &self.reset {
            for name in parse_name_list(text)? {
                request.resets.insert(name, true);
            }
        }
        // surface unknown reset names now rather than mid-render
        request.effective_params()?;

        for text in &self.full_span {
            for name in parse_name_list(text)? {
                request.symmetry.set(&name, false)?;
            }
        }

        let options = &mut request.options;
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(thickness) = self.thickness {
            options.line_thickness = thickness;
        }
        match (self.fit, self.margin) {
            (Some(FitArg::Fixed), _) => options.fit = FitPolicy::Fixed,
            (Some(FitArg::Auto), margin) => {
                options.fit = FitPolicy::Autofit {
                    margin: margin.unwrap_or(DEFAULT_FIT_MARGIN),
                }
            }
            (None, Some(margin)) => options.fit = FitPolicy::Autofit { margin },
            (None, None) => {}
        }
        match self.style {
            Some(StyleArg::Light) => options.style = RenderStyle::light(),
            Some(StyleArg::Dark) => options.style = RenderStyle::dark(),
            None => {}
        }

        debug!("render request: {request:?}");
        Ok(request)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { out, face } => {
            let request = face.to_request()?;
            let canvas = render(&request)?;
            export::save_png(&canvas, out)?;
            println!(
                "Wrote {} {} face ({}x{}) to {}",
                request.preset,
                request.model,
                canvas.width(),
                canvas.height(),
                out.display()
            );
        }
        Commands::View { face } => {
            let mut app = TerminalApp::new(face.to_request()?)?;
            app.run()?;
        }
    }

    Ok(())
}
