use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use shelfburst_core::{
    AppConfig, AudioOutput, BookCandidate, ClockFace, DrawList, FileStorage, LibraryPage,
    PageOutputs, RecordId, ShelfError, SimulatedOutput, ValidationError, Viewport,
};
use tracing_subscriber::EnvFilter;

type Page = LibraryPage<FileStorage, SimulatedOutput, SimulatedOutput>;

const FRAME_MS: u64 = 1_000 / 60;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", describe(&err));
        std::process::exit(1);
    }
}

fn describe(err: &ShelfError) -> String {
    match err {
        ShelfError::Validation(ValidationError::MissingField(field)) => {
            format!("Please fill in every field: `{field}` is empty")
        }
        ShelfError::Validation(ValidationError::InvalidYear(raw)) => {
            format!("The year must be a whole number, got `{raw}`")
        }
        other => format!("error: {other}"),
    }
}

fn run(cli: Cli) -> shelfburst_core::Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::List => {
            let page = open_page(&config, &cli.data_dir, false)?;
            println!("{}", page.view());
        }
        Commands::Stats => {
            let page = open_page(&config, &cli.data_dir, false)?;
            println!("{}", page.stats());
        }
        Commands::Add {
            isbn,
            title,
            author,
            year,
            music,
            seconds,
        } => {
            let mut page = open_page(&config, &cli.data_dir, music)?;
            let id = page.submit(&BookCandidate::new(isbn, title, author, year))?;
            tracing::info!(%id, "record added");
            run_celebration(&mut page, seconds);
            println!("{}", page.view());
        }
        Commands::Remove { id } => {
            let mut page = open_page(&config, &cli.data_dir, false)?;
            let id = RecordId::parse(&id)?;
            if !page.delete(id) {
                return Err(ShelfError::msg(format!("no record with id {id}")));
            }
            println!("{}", page.view());
        }
        Commands::Clock => {
            let reading = ClockFace::reading(&chrono::Local::now());
            let marker = if reading.highlight_seconds { " *" } else { "" };
            println!("{}{marker}", reading.text);
        }
    }
    Ok(())
}

fn open_page(config: &AppConfig, data_dir: &Path, music: bool) -> shelfburst_core::Result<Page> {
    tracing::debug!(data_dir = %data_dir.display(), "opening library");
    let outputs = PageOutputs {
        music: SimulatedOutput::new(),
        cue: SimulatedOutput::new(),
        tick: SimulatedOutput::new(),
    };
    let mut page = LibraryPage::open(
        config,
        FileStorage::new(data_dir),
        outputs,
        Viewport::new(1280.0, 720.0),
    )?;
    if music {
        page.toggle_music();
    }
    Ok(page)
}

/// Drives frames and timers headlessly at the nominal frame rate.
fn run_celebration(page: &mut Page, seconds: u64) {
    let mut surface = DrawList::new();
    let frames = seconds * 1_000 / FRAME_MS;
    for frame in 0..frames {
        page.step_frame(&mut surface);
        surface.reset();
        for action in page.elapse(FRAME_MS) {
            tracing::info!(?action, at_ms = page.now_ms(), "celebration timer fired");
        }
        if frame % 30 == 0 {
            tracing::info!(
                frame,
                particles = page.field().len(),
                volume = page.music().output().volume(),
                "celebration frame"
            );
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Book library with fireworks", long_about = None)]
struct Cli {
    /// Directory holding the persisted library.
    #[arg(long, default_value = ".", global = true)]
    data_dir: PathBuf,
    /// Optional JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the library table and its statistics.
    List,
    /// Print only the statistics line.
    Stats,
    /// Add a book and play the celebration headlessly.
    Add {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        year: String,
        /// Simulate background music playing during the add.
        #[arg(long)]
        music: bool,
        /// How long to run the celebration for.
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
    /// Delete a book by the id shown in `list`.
    Remove { id: String },
    /// Print the current wall clock the way the page shows it.
    Clock,
}
