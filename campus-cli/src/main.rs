use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use campus_core::{
    build_provider, locate, ChatReply, Conversation, ImageData, ProviderChoice, SubmitError,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a walking route between two campus locations
    Route {
        /// Where you are now (e.g. "Main entrance", "Room 201")
        from: String,
        /// Where you want to go (e.g. "Library", "Room 305")
        to: String,
        /// Print the route as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Talk to the navigation assistant
    Chat {
        /// Attach a photo of your surroundings to the first message
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Identify the campus location shown in a photo
    Locate {
        /// Path to the photo
        image: PathBuf,
    },
    /// Normalize a free-text location description
    Normalize {
        /// The description to normalize (e.g. "I'm at the main door")
        text: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Route { from, to, json } => run_route(&from, &to, json),
        Commands::Chat { image } => run_chat(image.as_deref()).await,
        Commands::Locate { image } => run_locate(&image).await,
        Commands::Normalize { text } => run_normalize(&text).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run_route(from: &str, to: &str, json: bool) -> Result<()> {
    let route = campus_nav::plan(from, to);

    if json {
        println!("{}", serde_json::to_string_pretty(&route)?);
        return Ok(());
    }

    println!(
        "{} {} → {}",
        "Route:".bold(),
        route.buildings[0],
        route.buildings[1]
    );
    println!();
    for (index, step) in route.steps.iter().enumerate() {
        println!("{}. {}", index + 1, step.instruction.bold());
        if let Some(details) = &step.details {
            println!("   {}", details.dimmed());
        }
    }
    println!();
    println!("Estimated time: {}", route.estimated_time.green());
    println!("Distance: {}", route.distance);
    Ok(())
}

async fn run_chat(image: Option<&Path>) -> Result<()> {
    let provider = build_provider(ProviderChoice::detect());
    let backend = provider.name();
    let mut conversation = Conversation::with_greeting(provider);

    println!("{}", conversation.turns()[0].content.cyan());
    println!(
        "{}",
        format!(
            "(backend: {}; type a message; \":image <path>\" attaches a photo, \":quit\" exits)",
            backend
        )
        .dimmed()
    );

    let mut pending_image = match image {
        Some(path) => Some(load_image(path)?),
        None => None,
    };

    let stdin = io::stdin();
    loop {
        print!("{} ", "you>".bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == ":quit" || line == ":q" {
            break;
        }
        if let Some(path) = line.strip_prefix(":image ") {
            pending_image = Some(load_image(Path::new(path.trim()))?);
            println!("{}", "(photo attached to your next message)".dimmed());
            continue;
        }

        let text = if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        };

        match conversation.submit(text, pending_image.take()).await {
            Ok(ChatReply::Assistant(reply)) => {
                println!("{} {}", "assistant>".cyan().bold(), reply);
            }
            Ok(ChatReply::Advisory(notice)) => {
                println!("{}", notice.yellow());
            }
            Err(SubmitError::NoContent) => {
                println!("{}", "Type a message or attach a photo first.".yellow());
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
            }
        }
    }

    Ok(())
}

async fn run_locate(image_path: &Path) -> Result<()> {
    let provider = build_provider(ProviderChoice::detect());
    let image = load_image(image_path)?;
    let location = locate::describe_image(provider.as_ref(), image).await?;
    println!("{}", location);
    Ok(())
}

async fn run_normalize(text: &str) -> Result<()> {
    let provider = build_provider(ProviderChoice::detect());
    let location = locate::normalize_location_text(provider.as_ref(), text).await?;
    println!("{}", location);
    Ok(())
}

fn load_image(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read image file '{}'", path.display()))?;
    let mime_type = match path.extension().and_then(|s| s.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(ImageData {
        bytes,
        mime_type: mime_type.to_string(),
    })
}
