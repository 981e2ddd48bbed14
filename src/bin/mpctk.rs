use std::{fs, io::Write};

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mpc_toolkit::{
    ades::{read_rows_csv, rows_to_records, to_psv, to_xml, validate},
    mpec::{self, MpecClient, MpecDocument},
    obs80::read_obs80_file,
    FetchConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "MPC observation export and MPEC bulletin tools")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert 80-column observations or database rows to ADES
    Export {
        /// `.csv` file of database rows, any other file is read as 80-column lines
        #[arg(short, long)]
        input: Utf8PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Xml)]
        format: Format,

        /// Write XML without indentation
        #[arg(long)]
        compact: bool,

        /// Output file, standard output when absent
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Check the structure of an ADES XML file
    Validate {
        file: Utf8PathBuf,

        #[arg(long, default_value_t = 20)]
        max_errors: usize,
    },

    /// Parse a saved MPEC text and print a summary
    Mpec {
        file: Utf8PathBuf,

        #[arg(long)]
        title: Option<String>,
    },

    /// List recent MPECs from the MPC
    Recent {
        /// Include daily orbit updates and editorials
        #[arg(long)]
        all: bool,
    },

    /// Fetch one MPEC by identifier (`2026-C105`)
    Fetch {
        mpec_id: String,

        /// Cache bulletin texts in the user cache directory
        #[arg(long)]
        cache: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Xml,
    Psv,
}

fn export(input: &Utf8Path, format: Format, compact: bool, output: Option<&Utf8Path>) -> Result<()> {
    let records = if input.extension() == Some("csv") {
        let rows = read_rows_csv(input).with_context(|| format!("reading rows from {input}"))?;
        rows_to_records(&rows)
    } else {
        read_obs80_file(input).with_context(|| format!("reading observations from {input}"))?
    };
    info!(count = records.len(), "observations decoded");

    let document = match format {
        Format::Xml => to_xml(&records, !compact)?,
        Format::Psv => to_psv(&records),
    };
    match output {
        Some(path) => fs::write(path, document).with_context(|| format!("writing {path}"))?,
        None => std::io::stdout().write_all(document.as_bytes())?,
    }
    Ok(())
}

fn print_summary(doc: &MpecDocument) {
    println!("{} ({})", doc.mpec_id, doc.kind);
    if !doc.date.is_empty() {
        println!("  issued       {}", doc.date);
    }
    if let Some(designation) = &doc.designation {
        println!("  designation  {designation}");
    }
    match doc.arc_days {
        Some(arc) => println!("  observations {} over {arc:.1} days", doc.n_obs),
        None => println!("  observations {}", doc.n_obs),
    }
    let el = &doc.orbital_elements;
    if let (Some(a), Some(e), Some(incl)) = (el.a, el.e, el.incl) {
        println!("  elements     a={a:.5} e={e:.5} i={incl:.3}");
    }
    if let Some(class) = el.orbit_class() {
        println!("  orbit class  {}", class.long_name());
    }
    if !doc.mpec_url.is_empty() {
        println!("  {}", doc.mpec_url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Export {
            input,
            format,
            compact,
            output,
        } => export(&input, format, compact, output.as_deref())?,

        Command::Validate { file, max_errors } => {
            let xml = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            let report = validate(&xml, max_errors);
            println!(
                "{file}: {} optical, {} obsBlock",
                report.n_optical, report.n_obs_block
            );
            for error in &report.errors {
                println!("  {error}");
            }
            if report.truncated {
                println!("  ...");
            }
            if !report.is_valid() {
                bail!("{file} is not a valid ADES document");
            }
        }

        Command::Mpec { file, title } => {
            let text = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            print_summary(&mpec::parse(&text, None, title.as_deref(), None));
        }

        Command::Recent { all } => {
            let client = MpecClient::new(FetchConfig::from_env())?;
            for entry in client.fetch_recent(false).await {
                if all || entry.kind != mpec::MpecType::Editorial {
                    println!("{:<16} {:<10} {:<26} {}", entry.mpec_id, entry.kind, entry.date, entry.title);
                }
            }
        }

        Command::Fetch { mpec_id, cache } => {
            let mut config = FetchConfig::from_env();
            if cache && config.cache_dir.is_none() {
                config = config.with_default_cache_dir();
            }
            let client = MpecClient::new(config)?;
            let Some(detail) = client.fetch_by_id(&mpec_id).await else {
                bail!("unable to fetch {mpec_id}");
            };
            print_summary(&detail.document);
            if !detail.prev_path.is_empty() {
                println!("  previous     {}", detail.prev_path);
            }
            if !detail.next_path.is_empty() {
                println!("  next         {}", detail.next_path);
            }
        }
    }
    Ok(())
}
