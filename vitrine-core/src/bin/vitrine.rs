use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use vitrine_config::{ClientConfig, ConfigLoader};
use vitrine_core::{
    DisplayedImage, HttpProfileGateway, ImageAssetManager, ProfileGateway,
    ProfileStateHolder, SaveError, SaveOrchestrator, SharedProfileStore,
    TempDirPreviewStore, telemetry,
};
use vitrine_model::{ModelError, Notice, ProfileDraft, ProfileField};

#[derive(Parser)]
#[command(name = "vitrine", about = "Inspect and edit your profile")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "VITRINE_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and print the stored profile
    Show,
    /// Load the profile, apply edits and save
    Edit {
        /// Field assignment such as `city=Bengaluru`; repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
        /// New profile picture
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("loading configuration")?;
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }

    let session = Session::connect(&config)?;
    session
        .holder
        .load()
        .await
        .context("fetching profile")?;

    match cli.command {
        Command::Show => {
            print_profile(&session.holder.current_draft());
            print_image(&session.holder.displayed_image());
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit { assignments, image } => {
            session.edit(&assignments, image).await
        }
    }
}

struct Session {
    holder: ProfileStateHolder,
    orchestrator: SaveOrchestrator,
}

impl Session {
    fn connect(config: &ClientConfig) -> Result<Self> {
        let gateway: Arc<dyn ProfileGateway> = Arc::new(
            HttpProfileGateway::new(&config.api)
                .context("building HTTP client")?,
        );
        let previews = match config.assets.preview_dir.as_deref() {
            Some(dir) => TempDirPreviewStore::in_dir(dir),
            None => TempDirPreviewStore::new(),
        }
        .context("creating preview directory")?;

        let assets =
            ImageAssetManager::new(Arc::new(previews), config.assets.max_image_bytes);
        let holder = ProfileStateHolder::new(
            gateway.clone(),
            assets,
            config.assets.origin.clone(),
        );
        let orchestrator =
            SaveOrchestrator::new(gateway, Arc::new(SharedProfileStore::new()));
        Ok(Self {
            holder,
            orchestrator,
        })
    }

    async fn edit(
        &self,
        assignments: &[String],
        image: Option<PathBuf>,
    ) -> Result<ExitCode> {
        for raw in assignments {
            let (field, value) = parse_assignment(raw)?;
            self.holder.edit(field, value);
        }

        if let Some(path) = image {
            if let Err(err) = self.holder.select_image_file(&path) {
                if let Some(notice) = self.holder.notice() {
                    eprintln!("{notice}");
                }
                return Err(err)
                    .with_context(|| format!("selecting {}", path.display()));
            }
        }

        let result = self.orchestrator.save(&self.holder).await;
        self.holder.dismiss();

        match result {
            Ok(report) => {
                println!("saved ({:?} image)", report.image);
                print_profile(&ProfileDraft::from_remote(&report.profile));
                Ok(ExitCode::SUCCESS)
            }
            Err(SaveError::Validation(errors)) => {
                eprintln!("{}", Notice::CorrectErrors);
                for (field, message) in errors.iter() {
                    eprintln!("  {}: {message}", field.label());
                }
                Ok(ExitCode::FAILURE)
            }
            Err(SaveError::Persist(err)) => {
                eprintln!("{}", Notice::SaveFailed);
                eprintln!("  {:#}", anyhow::Error::from(err));
                Ok(ExitCode::FAILURE)
            }
            Err(SaveError::Busy) => bail!("another save is already running"),
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(ProfileField, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| ModelError::MalformedAssignment(raw.to_string()))?;
    let field = field
        .trim()
        .parse::<ProfileField>()
        .with_context(|| format!("in assignment '{raw}'"))?;
    Ok((field, value.to_string()))
}

fn print_profile(draft: &ProfileDraft) {
    for field in ProfileField::ALL {
        println!("{:>14}: {}", field.label(), draft.field(field));
    }
}

fn print_image(image: &DisplayedImage) {
    match image {
        DisplayedImage::Remote(url) | DisplayedImage::Preview(url) => {
            println!("{:>14}: {url}", "Picture")
        }
        DisplayedImage::None => println!("{:>14}: (none)", "Picture"),
    }
}
