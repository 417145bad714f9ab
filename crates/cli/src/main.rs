use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{output, play};
use spoiler_core::capture::CaptureInput;
use spoiler_core::config;
use spoiler_core::context::AppContext;
use spoiler_core::questions::QuestionBoard;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let ctx = AppContext::open(cfg).await?;

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            ctx.accounts().signup(&name, &email, &password).await?;
            println!("Account created!");
            Ok(())
        }
        Commands::Login { email, password } => {
            ctx.accounts().login(&email, &password).await?;
            println!("Login successful!");
            Ok(())
        }
        Commands::Logout => {
            ctx.accounts().logout().await?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Profile {
            json,
            profession,
            username,
            dob,
            picture,
            save_picture,
        } => {
            let edits = ProfileEdits {
                profession,
                username,
                dob,
                picture,
            };
            run_profile(&ctx, json, edits, save_picture).await
        }
        Commands::Capture {
            image,
            food_name,
            food_type,
            json,
        } => run_capture(&ctx, image, food_name, food_type, json).await,
        Commands::Questions { json } => {
            let supplier = ctx.question_supplier(QuestionBoard::new());
            let set = supplier.refresh().await;
            output::print_questions(&mut io::stdout(), &set, json)
        }
        Commands::Play { rounds } => {
            let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let finished = play::play(&ctx, &mut stdin, &mut io::stdout(), rounds).await?;
            info!("finished {} round(s)", finished.len());
            Ok(())
        }
        Commands::Records { command } => run_records(&ctx, command).await,
    }
}

#[derive(Parser)]
#[command(name = "spoiler-alert")]
#[command(about = "Food freshness checker and quiz", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and store the session
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show (or update) the logged-in user's profile
    Profile {
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Set a new profession
        #[arg(long)]
        profession: Option<String>,
        /// Set a new username
        #[arg(long)]
        username: Option<String>,
        /// Set date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Upload a profile picture from this file
        #[arg(long)]
        picture: Option<PathBuf>,
        /// Save the profile picture (PNG) to this file
        #[arg(long)]
        save_picture: Option<PathBuf>,
    },
    /// Classify a photo and record it on the backend
    Capture {
        /// Path to a JPEG image
        image: PathBuf,
        #[arg(long)]
        food_name: Option<String>,
        #[arg(long)]
        food_type: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a fresh question set and list it
    Questions {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Play the "is this edible?" quiz
    Play {
        /// Number of rounds before exiting
        #[arg(short, long, default_value_t = 1)]
        rounds: usize,
    },
    /// Inspect backend food records
    Records {
        #[command(subcommand)]
        command: RecordCommands,
    },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// List records with resolved image URLs
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a record by its unique id
    Delete { id: String },
}

struct ProfileEdits {
    profession: Option<String>,
    username: Option<String>,
    dob: Option<String>,
    picture: Option<PathBuf>,
}

async fn run_profile(
    ctx: &AppContext,
    json: bool,
    edits: ProfileEdits,
    save_picture: Option<PathBuf>,
) -> Result<()> {
    let accounts = ctx.accounts();
    if let Some(p) = edits.profession {
        accounts.update_profession(&p).await?;
    }
    if let Some(u) = edits.username {
        accounts.update_username(&u).await?;
    }
    if let Some(d) = edits.dob {
        accounts.update_date_of_birth(&d).await?;
    }
    if let Some(path) = edits.picture {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        accounts
            .update_picture(bytes, &file_name_or(&path, "pfp.png"))
            .await?;
    }
    if let Some(path) = save_picture {
        let bytes = accounts
            .picture()
            .await
            .context("failed to load profile picture")?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!("saved profile picture to {}", path.display());
    }
    let profile = accounts
        .profile()
        .await
        .context("failed to load user data")?;
    output::print_profile(&mut io::stdout(), &profile, json)
}

fn file_name_or(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

async fn run_capture(
    ctx: &AppContext,
    image: PathBuf,
    food_name: Option<String>,
    food_type: Option<String>,
    json: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(&image)
        .await
        .with_context(|| format!("reading {}", image.display()))?;
    let file_name = file_name_or(&image, "photo.jpg");
    let outcome = ctx
        .capture_flow()
        .capture(CaptureInput {
            image: bytes,
            file_name,
            food_name,
            food_type,
        })
        .await?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "food_state": outcome.state, "item": outcome.item })
        );
    } else {
        println!("The food is {}", outcome.state);
        println!("Recorded as {}", outcome.item.unique_id);
    }
    Ok(())
}

async fn run_records(ctx: &AppContext, command: RecordCommands) -> Result<()> {
    match command {
        RecordCommands::List { json } => {
            let collection = &ctx.providers.collection;
            let records = collection.list_food().await?;
            output::print_records(&mut io::stdout(), collection.base_url(), &records, json)
        }
        RecordCommands::Delete { id } => {
            ctx.providers.recorder.delete_food(&id).await?;
            println!("Food item deleted successfully");
            Ok(())
        }
    }
}
