use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use moon_poster::{PosterConfig, PosterRenderer};

/// Yearly moon phase posters.
#[derive(Parser)]
#[command(name = "moon_poster", version, about = "Yearly lunar phase poster generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one SVG poster per year.
    Render(RenderArgs),
    /// Open a window showing one year's poster.
    #[cfg(feature = "viewer")]
    View(ViewArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Directory holding `<year>.dat` ephemeris files.
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    /// Output directory for `<year>.svg`.
    #[arg(short, long, default_value = "posters")]
    out: PathBuf,

    /// First year to render.
    #[arg(long)]
    from: i32,

    /// Last year to render; defaults to `--from`.
    #[arg(long)]
    to: Option<i32>,
}

#[cfg(feature = "viewer")]
#[derive(clap::Args)]
struct ViewArgs {
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    #[arg(short, long)]
    year: i32,
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing already initialized: {}", e);
    }
}

fn render(args: RenderArgs) -> ExitCode {
    let to = args.to.unwrap_or(args.from);
    if to < args.from {
        error!("--to {} is before --from {}", to, args.from);
        return ExitCode::FAILURE;
    }

    let renderer = match PosterRenderer::new(PosterConfig::default(), args.data) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match renderer.render_range(args.from..=to, &args.out) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("{}", renderer.metrics().report());

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        error!("{} of {} years failed", report.failed.len(), to - args.from + 1);
        ExitCode::FAILURE
    }
}

#[cfg(feature = "viewer")]
fn view(args: ViewArgs) -> ExitCode {
    let renderer = match PosterRenderer::new(PosterConfig::default(), args.data) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match moon_poster::viewer::run(renderer, args.year) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Viewer failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args),
        #[cfg(feature = "viewer")]
        Command::View(args) => view(args),
    }
}
