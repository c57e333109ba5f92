use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use billtext_spotcheck::{
    BaseBillId, CsvReporter, DirectoryScraper, FsInbox, JsonReporter, ReportFormat, Reporter,
    SpotcheckConfig, SpotcheckProcess, SqliteStore, VERSION,
};

const USAGE: &str = "usage: billtext-spotcheck [--config <file>] <collate|ingest|compare|run> [BILL...]";

enum Command {
    Collate,
    Ingest,
    Compare(Vec<BaseBillId>),
    Run,
}

struct Args {
    config: Option<PathBuf>,
    command: Command,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(env::args().skip(1).collect())?;
    let config = SpotcheckConfig::load(args.config.as_deref())?;
    config.ensure_dirs()?;

    println!("📜 Bill Text Spot Check v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = SqliteStore::open(&config.database_path)?;
    let inbox = FsInbox::new(&config.incoming_dir, &config.archive_dir);
    let scraper = DirectoryScraper::new(
        &config.scrape_source_dir,
        &config.incoming_dir,
        &config.archive_dir,
    )?;

    let mut reporter = open_reporter(&config)?;
    let mut process =
        SpotcheckProcess::new(&scraper, &inbox, &store, &store, reporter.as_mut())?;

    match args.command {
        Command::Collate => collate(&process)?,
        Command::Ingest => ingest(&process)?,
        Command::Compare(bills) => compare(&mut process, &bills, &config)?,
        Command::Run => {
            collate(&process)?;
            ingest(&process)?;
            compare(&mut process, &[], &config)?;
        }
    }

    Ok(())
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut config = None;
    let mut rest = Vec::new();

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config needs a file path")?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }

    let Some((command, bills)) = rest.split_first() else {
        bail!("{}", USAGE);
    };

    let command = match command.as_str() {
        "collate" => Command::Collate,
        "ingest" => Command::Ingest,
        "run" => Command::Run,
        "compare" => Command::Compare(
            bills
                .iter()
                .map(|b| BaseBillId::parse(b).with_context(|| format!("Invalid bill: {}", b)))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    };

    Ok(Args { config, command })
}

fn open_reporter(config: &SpotcheckConfig) -> Result<Box<dyn Reporter>> {
    let file = File::create(&config.report_path)
        .with_context(|| format!("Failed to create report: {}", config.report_path.display()))?;
    let writer = BufWriter::new(file);

    Ok(match config.report_format {
        ReportFormat::Csv => Box::new(CsvReporter::new(writer)),
        ReportFormat::Json => Box::new(JsonReporter::new(writer)),
    })
}

fn collate(process: &SpotcheckProcess) -> Result<()> {
    println!("\n🕸️  Collating {} documents...", process.collate_type());
    let fetched = process.collate()?;
    println!("✓ Fetched {} new pages", fetched);
    Ok(())
}

fn ingest(process: &SpotcheckProcess) -> Result<()> {
    println!("\n📥 Ingesting pending pages...");
    let ingested = process.ingest()?;
    println!("✓ Stored {} {}s", ingested, process.ingest_type());
    Ok(())
}

fn compare(
    process: &mut SpotcheckProcess,
    bills: &[BaseBillId],
    config: &SpotcheckConfig,
) -> Result<()> {
    println!("\n🔎 Comparing stored bills against references...");
    let observations = if bills.is_empty() {
        process.compare_all()?
    } else {
        process.compare(bills)?
    };

    let flagged: Vec<_> = observations.iter().filter(|o| o.has_mismatches()).collect();
    for observation in &flagged {
        println!("  ⚠️  {}", observation.summary());
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Checked {} bills", observations.len());
    if flagged.is_empty() {
        println!("✅ No mismatches");
    } else {
        println!("❌ {} bills with mismatches", flagged.len());
    }
    println!("📄 Report written to {}", config.report_path.display());
    Ok(())
}
