mod cli;

use streamify::{config, job};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tokio_util::sync::CancellationToken;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamify=debug,streamify_core=debug,streamify_av=debug,streamify_hls=debug,streamify_pipeline=debug".to_string()
        } else {
            "streamify=info,streamify_av=info,streamify_pipeline=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            name,
            input,
            width,
            height,
            bitrates,
            parallel,
            json,
        } => {
            let args = job::JobArgs {
                name,
                input,
                width,
                height,
                bitrates,
            };
            run_job(
                args,
                cli.config.as_deref(),
                cli.media_root.as_deref(),
                parallel,
                json,
            )
        }
        Commands::CheckTools { json } => check_tools(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamify {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Pipeline errors carry their own exit code; everything else is a usage or
/// setup failure.
fn exit_code(e: &anyhow::Error) -> i32 {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<streamify_core::Error>())
        .map(streamify_core::Error::exit_code)
        .unwrap_or(1)
}

fn run_job(
    args: job::JobArgs,
    config_path: Option<&Path>,
    media_root: Option<&Path>,
    parallel: Option<usize>,
    json: bool,
) -> Result<()> {
    // Validate before anything touches the disk.
    let spec = args.into_spec()?;

    let mut config = config::resolve(config_path, media_root)?;
    if let Some(n) = parallel {
        config.segmenter.max_parallel = n;
    }

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling job");
                on_signal.cancel();
            }
        });

        let executor = job::executor(&config, cancel)?;
        executor.run(&spec).await
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Job: {} ({})", report.job_name, report.safe_name);
    println!("Workspace: {}", report.workspace.display());
    if report.downloaded {
        println!("Downloaded: {}", report.source.display());
    }
    println!("Video: {}", report.mp4_path.display());
    println!("Variants: {}", report.variants.len());
    for variant in &report.variants {
        println!(
            "  [{}] {}k - {}",
            variant.index,
            variant.bitrate_kbps,
            variant.playlist_path.display()
        );
    }
    println!("Manifest: {}", report.manifest_path.display());
    println!("Finished in {:.1}s", report.elapsed_secs);

    Ok(())
}

fn check_tools(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tools = streamify_av::ToolRegistry::discover(&config.tools).check_all();

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    println!("Checking external tools...\n");

    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. ffmpeg is required; wget is needed for URL inputs.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => match config::find_default_config() {
            Some(p) => {
                println!("Validating config: {:?}", p);
                config::load_config(&p)?
            }
            None => {
                println!("No config file found, using defaults");
                config::Config::default()
            }
        },
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("✓ Configuration is valid, with warnings:");
        for warning in &warnings {
            println!("  ! {}", warning);
        }
    }

    println!("  Media root: {}", config.storage.media_root.display());
    println!("  Max parallel variants: {}", config.segmenter.max_parallel);
    println!("  Video codec: {}", config.segmenter.video_codec);
    println!(
        "  Timeouts (s): fetch {}, strip {}, segment {}",
        config.tools.fetch_timeout_secs,
        config.tools.strip_timeout_secs,
        config.tools.segment_timeout_secs
    );

    Ok(())
}
