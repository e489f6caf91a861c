/// Playcard - build card playlists from local audio files
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use playcard_cli::{
    config::CliConfig,
    workflow::{self, PlaylistOutcome, PlaylistRequest},
};
use playcard_client::{FailurePolicy, IngestOptions, IngestProgress, PlatformClient};
use playcard_core::IconRef;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "playcard")]
#[command(about = "Upload audio files into card playlists", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./playcard.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API bearer token, overrides the configuration
    #[arg(long, global = true, env = "PLAYCARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API base URL, overrides the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new playlist from audio files
    Create {
        /// Playlist title
        #[arg(short, long)]
        title: String,
        /// Large cover image URL
        #[arg(long)]
        cover: Option<String>,
        #[command(flatten)]
        upload: UploadArgs,
    },
    /// Append audio files to an existing playlist
    Append {
        /// Card id of the playlist
        card_id: String,
        /// New title (keeps the stored title when omitted)
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        upload: UploadArgs,
    },
    /// List your playlists
    List {
        /// Include deleted playlists
        #[arg(long)]
        deleted: bool,
    },
    /// Show the chapters of a playlist
    Show {
        /// Card id of the playlist
        card_id: String,
    },
}

#[derive(Args)]
struct UploadArgs {
    /// Audio files or directories of audio files, in playlist order
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Icon for the new chapters: URL, yoto:# reference or media id
    #[arg(long)]
    icon: Option<String>,
    /// Files uploaded at once
    #[arg(long)]
    concurrency: Option<usize>,
    /// Keep going past files that fail, saving the rest
    #[arg(long)]
    skip_failed: bool,
}

impl UploadArgs {
    fn options(&self, config: &CliConfig) -> IngestOptions {
        let mut options = config.ingest_options();
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency.max(1);
        }
        if self.skip_failed {
            options.failure_policy = FailurePolicy::SkipAndContinue;
        }
        options
    }

    async fn request(&self, config: &CliConfig) -> anyhow::Result<PlaylistRequest> {
        let icon = match &self.icon {
            Some(raw) => IconRef::parse(raw),
            None => config.default_icon(),
        };

        Ok(PlaylistRequest {
            files: workflow::collect_sources(&self.files).await?,
            icon,
            cover_image: None,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playcard=info,playcard_client=info,playcard_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(token) = cli.token {
        config.api.token = token;
    }
    if let Some(url) = cli.api_url {
        config.api.url = url;
    }
    config.validate()?;

    let client = PlatformClient::new(config.client_config())?;

    match cli.command {
        Commands::Create {
            title,
            cover,
            upload,
        } => {
            let mut request = upload.request(&config).await?;
            request.cover_image = cover;
            let options = upload.options(&config);

            let cancel = cancel_on_ctrl_c();
            let bar = progress_bar(request.files.len());
            let result = workflow::create_playlist(
                &client,
                &title,
                request,
                &options,
                &cancel,
                report_progress(&bar),
            )
            .await;
            bar.finish_and_clear();

            print_outcome(&result?);
        }
        Commands::Append {
            card_id,
            title,
            upload,
        } => {
            let request = upload.request(&config).await?;
            let options = upload.options(&config);

            let cancel = cancel_on_ctrl_c();
            let bar = progress_bar(request.files.len());
            let result = workflow::append_to_playlist(
                &client,
                &card_id,
                title.as_deref(),
                request,
                &options,
                &cancel,
                report_progress(&bar),
            )
            .await;
            bar.finish_and_clear();

            print_outcome(&result?);
        }
        Commands::List { deleted } => {
            let cards = workflow::list_playlists(&client, deleted).await?;
            if cards.is_empty() {
                println!("No playlists");
            }
            for card in cards {
                println!("{}  {}", card.card_id, card.title);
            }
        }
        Commands::Show { card_id } => {
            let (title, content) = workflow::show_playlist(&client, &card_id).await?;
            print!("{}", workflow::describe(&title, &content));
        }
    }

    Ok(())
}

/// Token cancelled on the first Ctrl-C; in-flight uploads stop and nothing is
/// saved. A second Ctrl-C exits at once.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupted, stopping upload (press Ctrl-C again to quit)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted again, exiting");
            std::process::exit(130);
        }
    });
    cancel
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn report_progress(bar: &ProgressBar) -> impl FnMut(IngestProgress) + Send {
    let bar = bar.clone();
    move |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.completed as u64);
        bar.set_message(progress.current_file);
    }
}

fn print_outcome(outcome: &PlaylistOutcome) {
    let skipped = outcome.report.failures.len();
    println!(
        "{}: {} new chapter(s), {} total{}",
        outcome.card_id.as_deref().unwrap_or("(no id returned)"),
        outcome.added,
        outcome.content.chapters.len(),
        if skipped > 0 {
            format!(", {} file(s) skipped", skipped)
        } else {
            String::new()
        }
    );
    print!("{}", workflow::describe(&outcome.title, &outcome.content));
}
