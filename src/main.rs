use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cinemood::api::{AnalysisBackend, HttpBackend};
use cinemood::catalog::{self, CatalogEntry};
use cinemood::download::{DownloadAction, DownloadControl, ReportKind};
use cinemood::input::InputMode;
use cinemood::session::{self, Command};
use cinemood::transform::{self, EmotionInsightsView, SceneTableView, TimelineView};
use cinemood::wizard::Step;
use cinemood::workflow::{AnalysisOutcome, InputView, StepView, Workflow};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "cinemood", version, about = "Movie emotion analysis client")]
struct Cli {
    /// Base URL of the analysis service (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the movie suggestion catalog (title or year substring)
    Catalog {
        /// Search text
        query: String,
    },

    /// Analyze one movie or plot and print every step
    Analyze {
        /// Movie title to look up
        #[arg(long, conflicts_with_all = ["plot", "plot_file"])]
        title: Option<String>,

        /// Custom plot text
        #[arg(long, conflicts_with = "plot_file")]
        plot: Option<String>,

        /// Read the custom plot from a file
        #[arg(long)]
        plot_file: Option<PathBuf>,

        /// Save the CSV, PDF and chart reports
        #[arg(long)]
        reports: bool,

        /// Directory for saved reports (defaults to config output_dir, then .)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Step through an analysis interactively
    Wizard {
        /// Directory for saved reports (defaults to config output_dir, then .)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check that the analysis service is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let mut config = cinemood::config::AppConfig::load();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    log::info!("Analysis service: {}", config.api.base_url);

    let backend = HttpBackend::new(&config.api);

    match cli.command {
        Commands::Catalog { query } => {
            let results = catalog::filter(&query);
            if results.is_empty() {
                println!("No movies matching \"{}\".", query);
                return Ok(());
            }
            print_catalog(&results);
        }

        Commands::Analyze { title, plot, plot_file, reports, out } => {
            let mut workflow = Workflow::new();
            if let Some(t) = title {
                workflow.set_movie_title(t);
            } else if let Some(p) = plot {
                workflow.set_custom_plot(p);
            } else if let Some(path) = plot_file {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read plot file {}", path.display()))?;
                workflow.set_custom_plot(text);
            }

            let outcome = run_analysis(&mut workflow, &backend).await;
            if outcome != AnalysisOutcome::Applied {
                let message = workflow
                    .error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "Analysis did not complete".to_string());
                anyhow::bail!(message);
            }

            // Non-interactive: show everything, spoilers included
            workflow.reveal_spoiler();
            loop {
                if workflow.step() != Step::Download {
                    print_view(&workflow);
                    println!();
                }
                if !workflow.next() {
                    break;
                }
            }

            if reports {
                let dir = config.resolve_output_dir(out);
                for kind in [ReportKind::Csv, ReportKind::Pdf, ReportKind::Chart] {
                    save(&workflow, kind, &dir)?;
                }
            }
        }

        Commands::Wizard { out } => {
            let dir = config.resolve_output_dir(out);
            run_wizard(&backend, &dir).await?;
        }

        Commands::Health => {
            backend
                .health()
                .await
                .with_context(|| format!("Analysis service at {} is not healthy", backend.base_url()))?;
            println!("Analysis service at {} is healthy", backend.base_url());
        }
    }

    Ok(())
}

/// Run one analysis with a spinner on screen.
async fn run_analysis(workflow: &mut Workflow, backend: &dyn AnalysisBackend) -> AnalysisOutcome {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message("Analyzing emotions...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = workflow.analyze(backend).await;
    pb.finish_and_clear();
    outcome
}

fn save(workflow: &Workflow, kind: ReportKind, dir: &Path) -> Result<()> {
    let saved = workflow
        .save_report(kind, dir)
        .with_context(|| format!("Failed to save {}", kind.label()))?;
    println!(
        "Saved {} → {} ({} bytes, {})",
        kind.label(),
        saved.path.display(),
        saved.bytes,
        saved.mime_type
    );
    Ok(())
}

/// Interactive loop over the workflow controller.
async fn run_wizard(backend: &dyn AnalysisBackend, out_dir: &Path) -> Result<()> {
    let mut workflow = Workflow::new();
    // Suggestions shown most recently, for `pick <n>`
    let mut listed: Vec<&'static CatalogEntry> = Vec::new();

    println!("Cinemood: discover the emotional journey of your favorite movies.");
    println!("Type 'help' for commands.");
    println!();
    print_view(&workflow);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("[{}] > ", workflow.step().title());
        std::io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        let cmd = match session::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match cmd {
            Command::Nothing => continue,
            Command::Quit => break,
            Command::Help => {
                println!("{}", session::HELP);
                continue;
            }
            Command::Mode(mode) => workflow.set_mode(mode),
            Command::ToggleMode => workflow.toggle_mode(),
            Command::Title(text) => {
                workflow.set_movie_title(text);
                listed = catalog::filter(workflow.input().movie_title());
            }
            Command::Plot(text) => workflow.set_custom_plot(text),
            Command::Search(query) => {
                listed = catalog::filter(&query);
                if listed.is_empty() {
                    println!("No movies matching \"{}\".", query);
                } else {
                    print_catalog(&listed);
                }
                continue;
            }
            Command::Pick(target) => match session::resolve_pick(&target, &listed, workflow.input().movie_title()) {
                Some(entry) => {
                    workflow.select_movie(entry);
                    println!("Selected {} ({})", entry.title, entry.year);
                }
                None => {
                    println!("Nothing to pick there. Try 'search <query>' first.");
                    continue;
                }
            },
            Command::Analyze => {
                if workflow.step() != Step::Input {
                    println!("Analysis starts from the input step ('reset' to start over).");
                    continue;
                }
                if workflow.is_loading() {
                    println!("An analysis is already running.");
                    continue;
                }
                run_analysis(&mut workflow, backend).await;
            }
            Command::Next => {
                if !workflow.next() {
                    println!("Can't go forward from here.");
                    continue;
                }
            }
            Command::Back => {
                if !workflow.can_go_back() {
                    println!("Already at the first step.");
                    continue;
                }
                workflow.back();
            }
            Command::Reset => {
                workflow.reset();
                listed.clear();
            }
            Command::Reveal => workflow.reveal_spoiler(),
            Command::Dismiss => workflow.dismiss_error(),
            pressed @ (Command::Download | Command::Csv | Command::Pdf) => {
                if workflow.step() != Step::Download {
                    println!("Downloads are on the last step.");
                    continue;
                }
                let control = match pressed {
                    Command::Csv => DownloadControl::Csv,
                    Command::Pdf => DownloadControl::Pdf,
                    _ => DownloadControl::Combined,
                };
                match workflow.press_download(control) {
                    DownloadAction::Save(kind) => {
                        if let Err(e) = save(&workflow, kind, out_dir) {
                            println!("{e:#}");
                        }
                        continue;
                    }
                    DownloadAction::Ignored => {
                        println!("That control isn't available right now.");
                        continue;
                    }
                    DownloadAction::Expanded => {}
                }
            }
            Command::Show => {}
        }

        println!();
        print_view(&workflow);
    }

    Ok(())
}

/// Print the active step: header, error banner, then its view.
fn print_view(workflow: &Workflow) {
    let step = workflow.step();
    println!("Step {}/{}: {}", step.index() + 1, Step::ALL.len(), step.title());
    println!("{}", "=".repeat(60));

    if let Some(err) = workflow.error() {
        println!("! {err}");
        println!();
    }

    match workflow.current_view() {
        StepView::Input(v) => print_input(&v),
        StepView::PlotSummary(v) => {
            if let Some(plot) = v.plot {
                for p in plot.paragraphs() {
                    println!("{p}");
                    println!();
                }
            } else if v.revealed {
                println!("No plot available.");
            } else {
                println!("Spoiler alert: this plot summary may contain spoilers for the movie.");
                println!("Type 'reveal' to show it anyway.");
            }
        }
        StepView::EmotionInsights(Some(v)) => print_insights(&v),
        StepView::SceneAnalysis(Some(v)) => print_scene_table(&v),
        StepView::Timeline(Some(v)) => print_timeline(&v),
        StepView::EmotionInsights(None) | StepView::SceneAnalysis(None) | StepView::Timeline(None) => {
            println!("No emotion data available");
        }
        StepView::Download(v) => {
            for control in v.controls {
                let (label, available) = match control {
                    DownloadControl::Combined => ("download  Download Reports", true),
                    DownloadControl::Csv => ("csv       CSV Report", v.csv_available),
                    DownloadControl::Pdf => ("pdf       PDF Report", v.pdf_available),
                };
                let note = if available { "" } else { " (empty)" };
                println!("  {label}{note}");
            }
        }
    }
}

fn print_input(v: &InputView) {
    match v.mode {
        InputMode::Movie => {
            println!("Mode: movie title   (toggle for custom plot)");
            println!("Title: {}", if v.movie_title.is_empty() { "-" } else { v.movie_title.as_str() });
            if !v.suggestions.is_empty() {
                println!();
                print_catalog(&v.suggestions);
            } else if v.movie_title.is_empty() {
                println!();
                println!("Popular picks:");
                for (i, e) in v.featured.iter().enumerate() {
                    println!("  {:>2}. {} ({})", i + 1, e.title, e.year);
                }
            }
        }
        InputMode::Custom => {
            println!("Mode: custom plot   (toggle for movie title)");
            if v.custom_plot.is_empty() {
                println!("Plot: -");
            } else {
                println!("Plot: {}", truncate(&v.custom_plot, 200));
            }
        }
    }
    println!();
    if v.loading {
        println!("Analyzing...");
    } else {
        println!("Type 'analyze' when ready.");
    }
}

fn print_catalog(entries: &[&CatalogEntry]) {
    for (i, e) in entries.iter().enumerate() {
        println!("  {:>2}. {:<50} {}", i + 1, e.title, e.year);
    }
}

fn print_insights(v: &EmotionInsightsView) {
    if let Some(text) = &v.insights {
        println!("{}", text.replace("**", ""));
    }

    match &v.top_emotions {
        Some(rows) if !rows.is_empty() => {
            println!("Top emotions:");
            for r in rows {
                println!(
                    "  {:<10} {:>5.1}%  ({} scenes)",
                    r.display_label(),
                    r.percentage,
                    r.count
                );
                println!("             {}", r.significance);
            }
        }
        _ => println!("No top emotion data available"),
    }
    println!();

    match &v.distribution {
        Some(series) if !series.is_empty() => {
            println!("Emotion distribution (excluding neutral):");
            for (label, value, color) in series.iter() {
                let bar = "#".repeat(transform::bar_width(value, 50));
                println!("  {:<10} {:>5.1}% {:<50} {}", label, value, bar, color);
            }
        }
        _ => println!("No distribution data available"),
    }
}

fn print_scene_table(v: &SceneTableView) {
    println!("{:>5}  {:<9} {:>6}  {}", "Scene", "Emotion", "Score", "Text");
    println!("{}", "-".repeat(80));
    for row in &v.rows {
        println!(
            "{:>5}  {:<9} {:>6}  {}",
            row.scene,
            cinemood::emotion::display_label(&row.emotion),
            transform::format_percent(row.score),
            truncate(&row.chunk, 55)
        );
    }
}

fn print_timeline(v: &TimelineView) {
    let ticks = TimelineView::axis_ticks();
    print!("{:>5}  ", "Scene");
    for (_, label) in &ticks {
        print!("{:<9}", label);
    }
    println!();
    println!("{}", "-".repeat(7 + 9 * ticks.len()));

    for p in &v.points {
        print!("{:>5}  ", p.x);
        let mut placed = false;
        for (code, _) in &ticks {
            if *code == p.y {
                print!("{:<9}", if p.is_high_confidence() { "●" } else { "o" });
                placed = true;
            } else {
                print!("{:<9}", "·");
            }
        }
        if !placed {
            print!("(code {})", p.y);
        }
        println!("  {}", p.tooltip());
    }
    println!();
    println!("● = high confidence (score > {:.0}%)", transform::HIGH_CONFIDENCE * 100.0);
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
