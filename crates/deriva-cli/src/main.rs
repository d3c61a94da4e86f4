//! Operator CLI for deriva: load originals into a directory store and build
//! their thumbnail / medium-size derivatives.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use deriva_core::domain::{ControlGroup, Datastream, DatastreamId, UPSCALE_IMAGES_KEY};
use deriva_core::impls::{
    DirectoryObjectStore, ImageRsCodec, LocalTempFiles, MapConfig, StaticUser, TableMimeRegistry,
};
use deriva_core::{DerivativeGenerator, DerivativeKind, GeneratorBuilder, OutcomeRecord, Pid};

#[derive(Parser)]
#[command(name = "deriva")]
#[command(about = "Derivative image generation for repository objects")]
#[command(version)]
struct Cli {
    /// Repository root directory
    #[arg(long, env = "DERIVA_STORE", default_value = "./repository", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an object (if needed) and set its OBJ datastream from a file
    Ingest(IngestArgs),
    /// List an object's datastreams
    Show {
        #[arg(long)]
        pid: Pid,
    },
    /// Build the TN derivative
    Thumbnail(RunArgs),
    /// Build the MEDIUM_SIZE derivative
    Medium(RunArgs),
    /// Build every derivative
    All(RunArgs),
}

#[derive(Args)]
struct IngestArgs {
    #[arg(long)]
    pid: Pid,

    /// Image file to store as OBJ
    #[arg(long)]
    file: PathBuf,

    /// MIME type (guessed from the file extension if omitted)
    #[arg(long)]
    mime: Option<String>,

    /// Object label (defaults to the file name)
    #[arg(long)]
    label: Option<String>,
}

#[derive(Args)]
struct RunArgs {
    /// Object pids, processed concurrently
    #[arg(long = "pid", required = true, num_args = 1..)]
    pids: Vec<Pid>,

    /// Regenerate even if the derivative already exists
    #[arg(long)]
    force: bool,

    /// Allow MEDIUM_SIZE to enlarge small images
    #[arg(
        long,
        env = "DERIVA_BASIC_IMAGE_UPSCALE_IMAGES",
        value_parser = BoolishValueParser::new()
    )]
    upscale: bool,

    /// Working directory for temp files (default: $TMPDIR/deriva)
    #[arg(long, env = "DERIVA_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// User recorded as owner of temp files
    #[arg(long, env = "DERIVA_USER", default_value = "admin")]
    user: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deriva=info,deriva_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = DirectoryObjectStore::open(&cli.store)
        .with_context(|| format!("failed to open store at {}", cli.store.display()))?;

    match cli.command {
        Commands::Ingest(args) => {
            ingest(&store, args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { pid } => {
            show(&store, &pid)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Thumbnail(args) => run(store, &[DerivativeKind::Thumbnail], args).await,
        Commands::Medium(args) => run(store, &[DerivativeKind::MediumSize], args).await,
        Commands::All(args) => run(store, &DerivativeKind::ALL, args).await,
    }
}

fn ingest(store: &DirectoryObjectStore, args: IngestArgs) -> Result<()> {
    let content = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mime_type = match args.mime {
        Some(mime) => mime,
        None => guess_mime(&args.file).to_string(),
    };

    if !store.object_exists(&args.pid) {
        let label = args.label.unwrap_or_else(|| {
            args.file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| args.pid.to_string())
        });
        store
            .create_object(&args.pid, &label)
            .with_context(|| format!("failed to create object {}", args.pid))?;
        debug!(pid = %args.pid, label = %label, "object created");
    }

    let obj = Datastream::new(DatastreamId::OBJ, ControlGroup::Managed)
        .with_content(mime_type.clone(), content);
    let size = obj.size();
    store
        .put_datastream(&args.pid, &obj)
        .with_context(|| format!("failed to store OBJ for {}", args.pid))?;
    info!(pid = %args.pid, mime_type = %mime_type, size, "OBJ stored");
    Ok(())
}

fn guess_mime(path: &std::path::Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| TableMimeRegistry::new().mime_for_extension(ext))
        .unwrap_or("application/octet-stream")
}

fn show(store: &DirectoryObjectStore, pid: &Pid) -> Result<()> {
    let object = store
        .load_object(pid)
        .with_context(|| format!("failed to load object {pid}"))?;
    let datastreams: Vec<_> = object
        .datastream_ids()
        .filter_map(|id| object.get(id))
        .map(|ds| {
            json!({
                "id": ds.id,
                "label": ds.label,
                "mime_type": ds.mime_type,
                "control_group": ds.control_group,
                "size": ds.size(),
            })
        })
        .collect();
    let out = json!({
        "pid": object.pid,
        "label": object.label,
        "datastreams": datastreams,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn run(
    store: DirectoryObjectStore,
    kinds: &[DerivativeKind],
    args: RunArgs,
) -> Result<ExitCode> {
    let config = MapConfig::new().with(UPSCALE_IMAGES_KEY, args.upscale);
    let temp_files = match args.temp_dir {
        Some(dir) => LocalTempFiles::new(dir),
        None => LocalTempFiles::in_system_temp(),
    };

    let generator = Arc::new(
        GeneratorBuilder::new()
            .store(Arc::new(store))
            .temp_files(Arc::new(temp_files))
            .codec(Arc::new(ImageRsCodec::new()))
            .user(Arc::new(StaticUser::new(args.user)))
            .config(Arc::new(config))
            .build()?,
    );

    // One task per pid; the same pid is never processed twice at once.
    let mut pids: Vec<Pid> = Vec::with_capacity(args.pids.len());
    for pid in args.pids {
        if !pids.contains(&pid) {
            pids.push(pid);
        }
    }

    let handles: Vec<_> = pids
        .into_iter()
        .map(|pid| {
            let generator = Arc::clone(&generator);
            let kinds = kinds.to_vec();
            let force = args.force;
            tokio::task::spawn_blocking(move || run_one(&generator, &pid, &kinds, force))
        })
        .collect();

    let mut failed = 0usize;
    for handle in handles {
        for line in handle.await.context("derivative task panicked")? {
            if !line.outcome.is_success() {
                failed += 1;
            }
            println!("{}", serde_json::to_string(&line.to_json())?);
        }
    }

    if failed > 0 {
        info!(failed, "some derivatives were not created");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

struct OutcomeLine {
    pid: Pid,
    kind: DerivativeKind,
    outcome: OutcomeRecord,
}

impl OutcomeLine {
    fn to_json(&self) -> serde_json::Value {
        let messages: Vec<_> = self
            .outcome
            .messages()
            .iter()
            .map(|m| {
                json!({
                    "channel": m.channel,
                    "severity": m.severity,
                    "text": m.render(),
                })
            })
            .collect();
        json!({
            "pid": self.pid,
            "dsid": self.kind.datastream_id(),
            "kind": self.outcome.kind(),
            "success": self.outcome.is_success(),
            "messages": messages,
        })
    }
}

fn run_one(
    generator: &DerivativeGenerator,
    pid: &Pid,
    kinds: &[DerivativeKind],
    force: bool,
) -> Vec<OutcomeLine> {
    kinds
        .iter()
        .map(|&kind| OutcomeLine {
            pid: pid.clone(),
            kind,
            outcome: generator.generate(kind, pid, force),
        })
        .collect()
}
