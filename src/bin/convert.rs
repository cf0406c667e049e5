//! Import a text-encoded phone bill into a SQLite database
//!
//! usage: phonebill-convert textFile dbFile

use anyhow::Context;
use phonebill_db::{create_pool, SqliteBillRepository};
use phonebill_services::convert_text_to_store;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "\
usage: phonebill-convert textFile dbFile
  textFile  bill in the text format (customer line, then one call per line)
  dbFile    SQLite database to import into, created if missing";

fn database_url(db_file: &str) -> String {
    if db_file.starts_with("sqlite:") {
        db_file.to_string()
    } else {
        format!("sqlite://{}", db_file)
    }
}

async fn run(text_file: &str, db_file: &str) -> anyhow::Result<()> {
    let pool = create_pool(&database_url(db_file), Some(1))
        .await
        .with_context(|| format!("opening database {}", db_file))?;
    let repo = SqliteBillRepository::new(pool);

    let bill = convert_text_to_store(Path::new(text_file), &repo)
        .await
        .with_context(|| format!("converting {}", text_file))?;

    println!(
        "Imported {} phone calls for {} into {}",
        bill.len(),
        bill.customer(),
        db_file
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [text_file, db_file] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match run(text_file, db_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("phonebill-convert: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
