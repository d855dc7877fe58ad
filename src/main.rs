use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use leafguard::acquisition::ImageSource;
use leafguard::app::App;
use leafguard::models::{AiConfig, DiagnosisResult, FetchConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "leafguard")]
#[command(about = "Diagnose plant diseases from a photo")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Diagnose the plant in an image file or URL.
    Diagnose {
        #[command(flatten)]
        image: ImageArgs,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Recommend treatment for a named disease.
    Treat {
        /// Name of the plant disease.
        #[arg(value_name = "DISEASE", required = true, num_args = 1..)]
        disease: Vec<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the image as a data URI.
    Encode {
        #[command(flatten)]
        image: ImageArgs,
    },
}

#[derive(Debug, Args)]
struct ImageArgs {
    /// Local image file (max 5MB).
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "url",
        required_unless_present = "url"
    )]
    file: Option<PathBuf>,
    /// Image URL, or an existing `data:image/...` URI.
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// Override the content type declared for --file.
    #[arg(long, value_name = "TYPE", requires = "file", conflicts_with = "url")]
    mime: Option<String>,
}

impl ImageArgs {
    fn into_source(self) -> ImageSource {
        match (self.file, self.url) {
            (Some(path), _) => ImageSource::Path {
                path,
                content_type: self.mime,
            },
            (None, url) => ImageSource::Url(url.unwrap_or_default()),
        }
    }
}

fn print_diagnosis(result: &DiagnosisResult) {
    println!("Diagnosis:\n{}\n", result.diagnosis.trim());
    println!("Treatment:\n{}", result.treatment.trim());
}

async fn run(command: Command) -> leafguard::Result<()> {
    let fetch = FetchConfig::from_env()?;

    match command {
        Command::Diagnose { image, json } => {
            let ai = AiConfig::from_env()?;
            let app = App::new(&fetch, Some(&ai));
            let result = app.diagnose(&image.into_source()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_diagnosis(&result);
            }
        }
        Command::Treat { disease, json } => {
            let ai = AiConfig::from_env()?;
            let app = App::new(&fetch, Some(&ai));
            let result = app.recommend_treatment(&disease.join(" ")).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.treatment_recommendations.trim());
            }
        }
        Command::Encode { image } => {
            let app = App::new(&fetch, None);
            let encoded = app.encode(&image.into_source()).await?;
            println!("{}", encoded);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leafguard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    info!("Starting leafguard");

    match run(args.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
