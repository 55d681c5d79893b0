use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rescue_pdf::parser::{
    decode_stream, FilterRegistry, ParseOptions, PdfArray, PdfDictionary, PdfName, PdfObject,
    StartXRef,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "rescuepdf",
    about = "Recover structure from damaged PDF files",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate the startxref anchor and print the cross-reference offset
    Startxref {
        /// Input PDF file
        input: PathBuf,

        /// Only accept the canonical `startxref` keyword
        #[arg(long)]
        strict: bool,

        /// Initial trailing window to search, in bytes
        #[arg(short, long, default_value_t = rescue_pdf::parser::DEFAULT_XREF_SEARCH_WINDOW)]
        window: u64,
    },

    /// Decode a raw stream payload through a filter chain
    Decode {
        /// File holding the encoded stream bytes
        input: PathBuf,

        /// Filter names in application order (e.g. FlateDecode)
        #[arg(short, long = "filter", required = true)]
        filters: Vec<String>,

        /// DecodeParms as a PDF object (e.g. "<< /Predictor 12 /Columns 4 >>")
        #[arg(short, long)]
        parms: Option<String>,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered filters and whether they can decode
    Filters,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rescue_pdf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Startxref {
            input,
            strict,
            window,
        } => {
            let options = if strict {
                ParseOptions::strict()
            } else {
                ParseOptions::lenient()
            }
            .with_xref_search_window(window);

            let anchor = StartXRef::from_path(&input, &options)
                .with_context(|| format!("Failed to locate startxref in {}", input.display()))?;

            println!("File: {}", input.display());
            println!("Keyword: {}", anchor.keyword);
            println!("Anchor offset: {}", anchor.anchor_offset);
            println!("XRef offset: {}", anchor.xref_offset);
            println!("Bytes scanned: {}", anchor.bytes_scanned);
            for warning in &anchor.warnings {
                println!("Warning: {warning}");
            }
        }

        Commands::Decode {
            input,
            filters,
            parms,
            output,
        } => {
            let data = fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let dict = stream_dictionary(&filters, parms.as_deref())?;
            tracing::debug!("decoding {} bytes through {:?}", data.len(), filters);

            let decoded = decode_stream(&data, &dict, FilterRegistry::shared())
                .with_context(|| format!("Failed to decode {}", input.display()))?;

            match output {
                Some(path) => {
                    fs::write(&path, &decoded)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "Decoded {} bytes into {} bytes: {}",
                        data.len(),
                        decoded.len(),
                        path.display()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&decoded)?;
                    stdout.flush()?;
                }
            }
        }

        Commands::Filters => {
            let registry = FilterRegistry::shared();
            for name in registry.names() {
                let status = match registry.is_supported(name) {
                    Some(true) => "supported",
                    _ => "unsupported",
                };
                println!("{name:<16} {status}");
            }
        }
    }

    Ok(())
}

/// Build the stream dictionary a decode run would see
fn stream_dictionary(filters: &[String], parms: Option<&str>) -> Result<PdfDictionary> {
    let mut dict = PdfDictionary::new();

    let filter = match filters {
        [single] => PdfObject::Name(PdfName::new(single.as_str())),
        many => PdfObject::Array(PdfArray(
            many.iter()
                .map(|name| PdfObject::Name(PdfName::new(name.as_str())))
                .collect(),
        )),
    };
    dict.insert("Filter".to_string(), filter);

    if let Some(text) = parms {
        let parsed = PdfObject::parse_bytes(text.as_bytes())
            .with_context(|| format!("Invalid DecodeParms: {text}"))?;
        dict.insert("DecodeParms".to_string(), parsed);
    }

    Ok(dict)
}
