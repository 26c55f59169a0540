use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub json: bool,
}

pub fn parse_args() -> Result<CliArgs, String> {
    let mut args = env::args().skip(1);
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_string())?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--db" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --db".to_string())?;
                parsed.db_path = Some(PathBuf::from(value));
            }
            "--log-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --log-dir".to_string())?;
                parsed.log_dir = Some(PathBuf::from(value));
            }
            "--json" => {
                parsed.json = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

pub fn print_help() {
    println!(
        "viewlog access-log replay\n\n\
Usage:\n  viewlog [--config <path>] [--db <path>] [--log-dir <path>] [--json]\n\n\
Options:\n  --config <path>   Config file to use (created with defaults if absent)\n  --db <path>       Override the configured database path for this run\n  --log-dir <path>  Override the configured log directory for this run\n  --json            Print the run summary as JSON\n  -h, --help        Show this help message\n"
    );
}
