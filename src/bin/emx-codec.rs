//! emx-codec CLI
//!
//! Base64 and glyph encoding/decoding, plus content sniffing.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use emx_codec::glyph::GlyphCodec;
use emx_codec::{extension_for, input, sniff, Base64Decoder, Base64Encoder, Blob, DecodeOptions, OutputMode};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "emx-codec")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Base64 and glyph codec tool")]
struct Cli {
    /// Give up reading input after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Guess the content type of files (directories are walked)
    Sniff {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Base64 encode/decode
    #[command(subcommand)]
    B64(B64Command),

    /// Glyph encode/decode
    #[command(subcommand)]
    Glyph(GlyphCommand),

    /// Print the file extension for a MIME type
    Ext { mime_type: String },
}

#[derive(Subcommand, Debug)]
enum B64Command {
    /// Encode text or a file as Base64
    Encode(Source),

    /// Decode Base64
    Decode {
        #[command(flatten)]
        source: Source,

        /// Output mode: auto, text, image or file
        #[arg(short, long, default_value_t = OutputMode::Auto)]
        mode: OutputMode,

        /// Only report the detected MIME type
        #[arg(long)]
        detect_only: bool,

        /// Where to write file/image output (default: decoded.<ext>)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum GlyphCommand {
    /// Encode text or a file as glyphs
    Encode {
        #[command(flatten)]
        source: Source,

        #[arg(long, value_enum, default_value_t = Variant::Ternary)]
        variant: Variant,
    },

    /// Decode glyphs
    Decode {
        #[command(flatten)]
        source: Source,

        #[arg(long, value_enum, default_value_t = Variant::Ternary)]
        variant: Variant,

        /// Write the decoded bytes to a file instead of printing text
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

/// Input source: literal text, a file, or stdin
#[derive(Args, Debug)]
struct Source {
    /// Literal input text
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Input file (default: stdin)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
    Ternary,
    Octal,
}

impl Variant {
    fn codec(self) -> GlyphCodec {
        match self {
            Variant::Ternary => GlyphCodec::ternary(),
            Variant::Octal => GlyphCodec::octal(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();
    let timeout = cli.timeout_ms.map(Duration::from_millis);

    match cli.command {
        Commands::Sniff { paths } => sniff_paths(&paths, timeout).await?,
        Commands::B64(B64Command::Encode(source)) => {
            let data = read_source(&source, timeout).await?;
            let mut stdout = io::stdout().lock();
            Base64Encoder::new().encode_to_writer(&data, &mut stdout)?;
            writeln!(stdout)?;
        }
        Commands::B64(B64Command::Decode { source, mode, detect_only, output }) => {
            let data = read_source(&source, timeout).await?;
            let text = String::from_utf8(data).context("Base64 input is not valid UTF-8")?;
            decode_base64(&text, DecodeOptions { mode, detect_only }, output)?;
        }
        Commands::Glyph(GlyphCommand::Encode { source, variant }) => {
            let data = read_source(&source, timeout).await?;
            println!("{}", variant.codec().encode(&data));
        }
        Commands::Glyph(GlyphCommand::Decode { source, variant, output }) => {
            let data = read_source(&source, timeout).await?;
            let text = String::from_utf8(data).context("Glyph input is not valid UTF-8")?;
            decode_glyphs(text.trim(), variant.codec(), output)?;
        }
        Commands::Ext { mime_type } => println!("{}", extension_for(&mime_type)),
    }

    Ok(())
}

async fn read_source(source: &Source, timeout: Option<Duration>) -> Result<Vec<u8>> {
    if let Some(text) = &source.text {
        return Ok(text.clone().into_bytes());
    }
    match &source.input {
        Some(path) => read_file(path, timeout).await,
        None => Ok(input::read_stdin().await?),
    }
}

async fn read_file(path: &Path, timeout: Option<Duration>) -> Result<Vec<u8>> {
    let data = match timeout {
        Some(timeout) => input::read_bytes_with_timeout(path, timeout).await?,
        None => input::read_bytes(path).await?,
    };
    Ok(data)
}

async fn sniff_paths(paths: &[PathBuf], timeout: Option<Duration>) -> Result<()> {
    for path in paths {
        if path.is_dir() {
            let files = walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());

            for entry in files {
                sniff_file(entry.path(), timeout).await?;
            }
        } else {
            sniff_file(path, timeout).await?;
        }
    }
    Ok(())
}

async fn sniff_file(path: &Path, timeout: Option<Duration>) -> Result<()> {
    let data = read_file(path, timeout).await?;
    let result = sniff::classify(&data);
    println!(
        "{}  {}  text={}  utf8={}",
        path.display(),
        result.mime_type,
        result.is_text_like,
        result.is_valid_utf8
    );
    Ok(())
}

fn decode_base64(encoded: &str, options: DecodeOptions, output: Option<PathBuf>) -> Result<()> {
    let result = Base64Decoder::new().decode(encoded, options);

    if result.is_failure() {
        return Err(anyhow!("{}", result.error_message));
    }
    if result.is_warning() {
        eprintln!("{}", result.error_message);
    }

    if options.detect_only {
        println!("{}", result.detected_mime_type);
    } else if let Some(blob) = &result.decoded_blob {
        write_blob(blob, output)?;
    } else {
        println!("{}", result.decoded_text);
    }
    Ok(())
}

fn decode_glyphs(encoded: &str, codec: GlyphCodec, output: Option<PathBuf>) -> Result<()> {
    if output.is_some() {
        let blob = codec.decode_to_file(encoded)?;
        return write_blob(&blob, output);
    }

    let result = codec.decode_to_text(encoded);
    if !result.success {
        let message = result.error.unwrap_or_else(|| "Decoding failed".to_string());
        return Err(anyhow!("{}", message));
    }
    println!("{}", result.text);
    Ok(())
}

fn write_blob(blob: &Blob, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(blob.file_name("decoded")));
    fs::write(&path, &blob.data).with_context(|| format!("Failed to write: {}", path.display()))?;
    eprintln!("Wrote {} ({}, {} bytes)", path.display(), blob.mime_type, blob.data.len());
    Ok(())
}
