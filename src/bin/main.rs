use clap::{Parser, Subcommand};
use env_logger::Builder;

use jsd_oneshot::config::{self, Config};
use jsd_oneshot::{deob, solver};

/// A one-shot solver for JS Detection (JSD) anti-bot interstitials
#[derive(Parser)]
#[command(name = "jsd-oneshot")]
#[command(version)]
#[command(about = "A one-shot solver for JS Detection (JSD) anti-bot interstitials")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full oneshot flow against a target URL
    Solve {
        /// The protected URL to solve the challenge for
        url: String,

        /// Skip the homepage fetch and supply the `r`/`t` challenge values directly
        #[arg(long, requires = "t")]
        r: Option<String>,

        /// Paired with --r: the `t` challenge value
        #[arg(long, requires = "r")]
        t: Option<String>,

        /// Challenge script URL, if not the platform default
        #[arg(long)]
        script_url: Option<String>,

        /// Directory used to cache fetched scripts
        #[arg(long)]
        cache_dir: Option<String>,

        /// HTTP client timeout, in seconds
        #[arg(long)]
        timeout_seconds: Option<u64>,
    },
    /// Run only the analyzer against a local script file or URL, for debugging
    Analyze {
        /// Path to a local challenge script, or a URL to fetch it from
        source: String,

        /// Print the rewritten AST as approximate JS source
        #[arg(long)]
        dump: bool,
    },
}

fn main() {
    Builder::from_default_env().target(env_logger::Target::Stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            url,
            r,
            t,
            script_url,
            cache_dir,
            timeout_seconds,
        } => run_solve(url, r, t, script_url, cache_dir, timeout_seconds),
        Commands::Analyze { source, dump } => run_analyze(&source, dump),
    }
}

fn run_solve(url: String, r: Option<String>, t: Option<String>, script_url: Option<String>, cache_dir: Option<String>, timeout_seconds: Option<u64>) {
    let overrides = Config {
        cache_dir,
        cache_ttl_seconds: None,
        timeout_seconds,
        user_agent: None,
    };

    let cfg = match config::load(Some(overrides)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let now = now_string();
    let now_unix = unix_now();

    let outcome = match (r, t) {
        (Some(r), Some(t)) => solver::solve_from_data(&url, &cfg, solver::SolveData { r, t, script_url }, &now, now_unix),
        _ => solver::solve(&url, &cfg, &now, now_unix),
    };

    match outcome {
        Ok(outcome) => {
            eprintln!("status: {}", outcome.status);
            match &outcome.cf_clearance {
                Some(token) => eprintln!("cf_clearance: {token}"),
                None => eprintln!("no cf_clearance cookie returned"),
            }
            if outcome.success {
                println!("solved");
            } else {
                eprintln!("challenge was not solved");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_analyze(source: &str, dump: bool) {
    let script = if source.starts_with("http://") || source.starts_with("https://") {
        match reqwest::blocking::get(source).and_then(|r| r.text()) {
            Ok(body) => body,
            Err(e) => {
                eprintln!("Error: failed to fetch {source}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        match std::fs::read_to_string(source) {
            Ok(body) => body,
            Err(e) => {
                eprintln!("Error: failed to read {source}: {e}");
                std::process::exit(1);
            }
        }
    };

    match deob::analyze(&script) {
        Ok(result) => {
            eprintln!("offset: {}", result.offset);
            eprintln!("target: {}", result.target);
            eprintln!("alphabet: {}", result.alphabet);
            eprintln!("aliases: {:?}", result.aliases);
            eprintln!("recovered strings: {}", result.strings.len());
            for warning in &result.warnings {
                eprintln!("warning: {warning:?}");
            }
            if dump {
                println!("{}", jsd_oneshot::ast::generate(&result.program));
            }
        }
        Err(e) => {
            eprintln!("Error: analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// `MM/DD/YYYY HH:MM:SS`, matching the Go original's `01/02/2006 15:04:05` layout.
fn now_string() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let days = secs / 86_400;
    let time_of_day = secs % 86_400;
    let (h, m, s) = (time_of_day / 3600, (time_of_day % 3600) / 60, time_of_day % 60);

    let (year, month, day) = civil_from_days(days as i64);
    format!("{month:02}/{day:02}/{year:04} {h:02}:{m:02}:{s:02}")
}

/// Converts days since the Unix epoch to a proleptic-Gregorian (year, month, day),
/// Howard Hinnant's `civil_from_days` algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}
