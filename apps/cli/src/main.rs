mod args;
mod config;

use std::io;
use std::process::ExitCode;

use chrono::Local;
use tracing_subscriber::EnvFilter;
use viewlog_db::Db;

use crate::args::CliArgs;

fn main() -> ExitCode {
    let args = match args::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            args::print_help();
            return ExitCode::from(2);
        }
    };

    init_tracing();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("viewlog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VIEWLOG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let load = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    if load.created {
        println!("Created config at {} with defaults.", load.file.display());
    }
    let db_path = args.db_path.unwrap_or(load.config.db_path);
    let log_dir = args.log_dir.unwrap_or(load.config.log_dir);

    let mut db = Db::open(&db_path)?;
    db.migrate()?;

    let stats = replay::run_replay(&mut db, &log_dir, Local::now().naive_local())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "replayed {} of {} pending buckets ({} missing, {} failed); wrote {} access rows, {} traffic rows",
            stats.buckets_processed,
            stats.buckets_attempted,
            stats.buckets_missing,
            stats.buckets_failed,
            stats.access_rows,
            stats.traffic_rows,
        );
        match &stats.watermark {
            Some(watermark) => println!("watermark advanced to {watermark}"),
            None => println!("watermark unchanged"),
        }
    }
    Ok(())
}
