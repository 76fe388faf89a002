use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use wavstream::{Config, PumpOptions, WavReader, WriterSink};

/// wavstream - Paced PCM streaming from WAV files
#[derive(Parser)]
#[command(name = "wavstream", version, about)]
struct Cli {
    /// Config file (default: ~/.config/wavstream/config.toml)
    #[arg(short, long, env = "WAVSTREAM_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the format header of a WAV file
    Info {
        /// Path to the WAV file
        file: PathBuf,
    },
    /// Stream the sample data of a WAV file in paced frames
    Stream {
        /// Path to the WAV file
        file: PathBuf,
        /// Output file, or "-" for stdout; frames are discarded if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Bytes per frame
        #[arg(long)]
        chunk_bytes: Option<usize>,
        /// Delay between frames in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,
        /// Stream identifier passed with every frame
        #[arg(long)]
        stream_id: Option<Uuid>,
        /// Pace frames by the playback time they cover
        #[arg(long)]
        realtime: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when no -v is given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info,wavstream=debug"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `stream --out -` keeps stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Info { file } => show_info(&file),
        Command::Stream {
            file,
            out,
            chunk_bytes,
            pace_ms,
            stream_id,
            realtime,
        } => {
            let mut stream = config.stream;
            if let Some(n) = chunk_bytes {
                stream.chunk_bytes = n;
            }
            if let Some(ms) = pace_ms {
                stream.pace = Duration::from_millis(ms);
            }
            if let Some(id) = stream_id {
                stream.stream_id = id;
            }
            stream.realtime |= realtime;

            let reader = WavReader::open(&file)?;
            let options = PumpOptions::from_config(&stream, reader.format());

            tracing::info!(
                file = %file.display(),
                stream_id = %options.stream_id,
                chunk_bytes = options.chunk_bytes,
                pace_ms = options.pace.as_millis(),
                "start streaming"
            );

            let mut sink = WriterSink::new(open_output(out.as_deref())?);
            let report = wavstream::pump(reader, &mut sink, &options, shutdown_signal()).await?;

            tracing::info!(
                frames = report.frames,
                bytes = report.bytes,
                outcome = ?report.outcome,
                "streaming done"
            );
            Ok(())
        }
    }
}

/// Print the format header and data size of a WAV file
fn show_info(file: &Path) -> anyhow::Result<()> {
    let reader = WavReader::open(file)?;
    let format = reader.format();

    let pcm = if format.is_pcm() { " (PCM)" } else { "" };

    println!("File:            {}", file.display());
    println!("Format tag:      {:#06x}{pcm}", format.format_tag);
    println!("Channels:        {}", format.channels);
    println!("Sample rate:     {} Hz", format.samples_per_sec);
    println!("Byte rate:       {} B/s", format.avg_bytes_per_sec);
    println!("Block align:     {} B", format.block_align);
    println!("Bits per sample: {}", format.bits_per_sample);
    match reader.duration() {
        Some(duration) => println!(
            "Data:            {} B ({:.3} s)",
            reader.data_len(),
            duration.as_secs_f64()
        ),
        None => println!("Data:            unbounded"),
    }

    reader.close();
    Ok(())
}

fn open_output(out: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match out {
        None => Box::new(std::io::sink()),
        Some(path) if path.as_os_str() == "-" => Box::new(std::io::stdout().lock()),
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
    })
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("interrupted, stopping stream");
}
