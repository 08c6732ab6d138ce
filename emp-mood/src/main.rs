//! emp-mood - Emotion Music Player command line
//!
//! Record a short clip, let the pipeline read your mood from tone and words,
//! and get a playlist for it. Catalog credentials are required at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emp_common::config::ConfigResolver;
use emp_common::{Emotion, Genre};
use emp_mood::config::resolve_catalog_credentials;
use emp_mood::{Analysis, MoodPipeline, RecommendationResult, SessionContext};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for emp-mood
#[derive(Parser, Debug)]
#[command(name = "emp-mood")]
#[command(about = "Mood-driven music recommendations from a spoken clip")]
#[command(version)]
struct Args {
    /// TOML config file (overrides EMP_CONFIG and the default location)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one audio clip and recommend tracks for it
    Analyze {
        /// Audio file (wav, mp3, flac, ogg, m4a)
        audio: PathBuf,

        /// Genre filter
        #[arg(long, default_value = "All")]
        genre: Genre,

        /// Recommend for this emotion instead of the detected one
        #[arg(long)]
        emotion: Option<Emotion>,
    },

    /// Recommend tracks for an emotion without analyzing audio
    Recommend {
        #[arg(long)]
        emotion: Emotion,

        #[arg(long, default_value = "All")]
        genre: Genre,
    },

    /// Interactive session reading commands from stdin
    Session,

    /// List the available genre filters
    Genres,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone()).load();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting emp-mood v{}", env!("CARGO_PKG_VERSION"));

    if let Command::Genres = args.command {
        for genre in Genre::ALL {
            println!("{}", genre);
        }
        return Ok(());
    }

    let credentials =
        resolve_catalog_credentials(&config).context("Cannot start without catalog credentials")?;
    let pipeline =
        MoodPipeline::from_config(&config, credentials).context("Failed to build mood pipeline")?;
    let mut session = SessionContext::new();

    match args.command {
        Command::Analyze {
            audio,
            genre,
            emotion,
        } => {
            pipeline.warm_up();
            let Some(analysis) = analyze_path(&pipeline, &mut session, &audio).await? else {
                return Ok(());
            };
            print_analysis(&analysis);
            let chosen = emotion.unwrap_or_else(|| analysis.final_label());
            let result = pipeline.recommend(&mut session, chosen, genre).await;
            print_result(chosen, genre, &result);
        }
        Command::Recommend { emotion, genre } => {
            let result = pipeline.recommend(&mut session, emotion, genre).await;
            print_result(emotion, genre, &result);
        }
        Command::Session => {
            pipeline.warm_up();
            run_session(&pipeline, &mut session).await?;
        }
        Command::Genres => {}
    }

    Ok(())
}

async fn analyze_path(
    pipeline: &MoodPipeline,
    session: &mut SessionContext,
    audio: &Path,
) -> Result<Option<Analysis>> {
    let bytes = tokio::fs::read(audio)
        .await
        .with_context(|| format!("Failed to read {}", audio.display()))?;
    let extension = audio.extension().and_then(|e| e.to_str());

    let analysis = pipeline
        .analyze(session, &bytes, extension)
        .await
        .with_context(|| format!("Failed to analyze {}", audio.display()))?;
    if analysis.is_none() {
        println!("Same clip as last time, skipped.");
    }
    Ok(analysis)
}

const SESSION_HELP: &str = "\
Commands:
  analyze <path>   analyze a clip and recommend for the detected mood
  genre <name>     set the genre filter (see `emp-mood genres`)
  emotion <name>   override the mood: neutral, happy, sad, angry
  history          show past recommendations, newest first
  clear            clear the history
  reset            start a fresh session
  help             show this help
  quit             leave";

async fn run_session(pipeline: &MoodPipeline, session: &mut SessionContext) -> Result<()> {
    println!("{}", SESSION_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Manual correction of the detected mood, until the next clip
    let mut override_emotion: Option<Emotion> = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "analyze" => {
                if argument.is_empty() {
                    println!("usage: analyze <path>");
                    continue;
                }
                match analyze_path(pipeline, session, Path::new(argument)).await {
                    Ok(Some(analysis)) => {
                        override_emotion = None;
                        print_analysis(&analysis);
                        recommend_current(pipeline, session, override_emotion).await;
                    }
                    Ok(None) => {}
                    Err(e) => println!("Error: {:#}", e),
                }
            }
            "genre" => match argument.parse::<Genre>() {
                Ok(genre) => {
                    session.set_genre(genre);
                    println!("Genre: {}", genre);
                    recommend_current(pipeline, session, override_emotion).await;
                }
                Err(e) => println!("{}", e),
            },
            "emotion" => match argument.parse::<Emotion>() {
                Ok(emotion) => {
                    override_emotion = Some(emotion);
                    recommend_current(pipeline, session, override_emotion).await;
                }
                Err(e) => println!("{}", e),
            },
            "history" => print_history(session),
            "clear" => {
                session.clear_history();
                println!("History cleared.");
            }
            "reset" => {
                session.reset();
                override_emotion = None;
                println!("Session reset.");
            }
            "help" => println!("{}", SESSION_HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type `help`.", other),
        }
    }

    info!(
        analyses = session.analysis_count(),
        history = session.history().len(),
        "Session finished"
    );
    Ok(())
}

async fn recommend_current(
    pipeline: &MoodPipeline,
    session: &mut SessionContext,
    override_emotion: Option<Emotion>,
) {
    let detected = session.current().map(Analysis::final_label);
    let Some(emotion) = override_emotion.or(detected) else {
        println!("Analyze a clip or choose an emotion first.");
        return;
    };
    let genre = session.genre();
    let result = pipeline.recommend(session, emotion, genre).await;
    print_result(emotion, genre, &result);
}

fn print_analysis(analysis: &Analysis) {
    println!();
    println!("Transcript: {}", analysis.transcript_display());
    println!(
        "Tone:       {} {}",
        analysis.audio().label.emoji(),
        analysis.audio().label.display_name()
    );
    println!(
        "Words:      {} {}",
        analysis.text().label.emoji(),
        analysis.text().label.display_name()
    );
    println!(
        "Mood:       {} {} (from {})",
        analysis.final_label().emoji(),
        analysis.final_label().display_name(),
        analysis.fused.decided_by
    );
}

fn print_result(emotion: Emotion, genre: Genre, result: &RecommendationResult) {
    println!();
    println!("{} {} / {}", emotion.emoji(), emotion.display_name(), genre);
    match result {
        RecommendationResult::Tracks { tracks } => {
            for (i, track) in tracks.iter().enumerate() {
                println!("{:>2}. {}", i + 1, track.describe());
                println!("    {}", track.url());
                if let Some(player) = track.embed_url() {
                    println!("    player: {}", player);
                }
            }
        }
        RecommendationResult::Error { reason } => println!("No recommendations: {}", reason),
    }
}

fn print_history(session: &SessionContext) {
    if session.history().is_empty() {
        println!("No history yet.");
        return;
    }
    for entry in session.history().newest_first() {
        println!("{}", entry);
    }
}
