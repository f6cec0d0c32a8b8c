//! ProfileKit CLI - coding profile statistics from the command line

mod server;

use clap::{Args, Parser, Subcommand};
use profilekit::{Aggregator, AggregatorBuilder, StatsQuery};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// ProfileKit - aggregate coding platform profile statistics
#[derive(Parser, Debug)]
#[command(name = "profilekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch profiles and print them as JSON
    Fetch {
        /// Platform for a single lookup
        #[arg(long, requires = "username")]
        platform: Option<String>,

        /// Username for a single lookup
        #[arg(long, requires = "platform")]
        username: Option<String>,

        /// LeetCode username
        #[arg(long)]
        leetcode: Option<String>,

        /// GeeksforGeeks username
        #[arg(long)]
        gfg: Option<String>,

        /// CodeChef username
        #[arg(long)]
        codechef: Option<String>,

        /// HackerRank username
        #[arg(long)]
        hackerrank: Option<String>,

        #[command(flatten)]
        client: ClientArgs,
    },
    /// Serve the stats endpoint over HTTP
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,

        /// Cache entry lifetime in seconds
        #[arg(long, default_value_t = 120)]
        cache_ttl_secs: u64,

        /// Disable the record cache
        #[arg(long)]
        no_cache: bool,

        #[command(flatten)]
        client: ClientArgs,
    },
}

/// HTTP client flags shared by both subcommands
#[derive(Args, Debug)]
struct ClientArgs {
    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

impl ClientArgs {
    fn apply(self, mut builder: AggregatorBuilder) -> AggregatorBuilder {
        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        builder.timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Fetch {
            platform,
            username,
            leetcode,
            gfg,
            codechef,
            hackerrank,
            client,
        }) => {
            let aggregator = build_or_exit(client.apply(Aggregator::builder().no_cache()));
            let params = fetch_params(
                platform,
                username,
                [
                    ("leetcode", leetcode),
                    ("gfg", gfg),
                    ("codechef", codechef),
                    ("hackerrank", hackerrank),
                ],
            );
            let query = StatsQuery::from_params(&params, &aggregator.platform_names());
            if query.requests().is_empty() {
                eprintln!("Error: give --platform and --username, or one of --leetcode, --gfg, --codechef, --hackerrank");
                std::process::exit(1);
            }
            run_fetch(&aggregator, &query).await;
        }
        Some(Commands::Serve {
            addr,
            cache_ttl_secs,
            no_cache,
            client,
        }) => {
            let mut builder = client.apply(Aggregator::builder());
            builder = if no_cache {
                builder.no_cache()
            } else {
                builder.cache_ttl(Duration::from_secs(cache_ttl_secs))
            };
            run_serve(builder, &addr).await;
        }
        None => {
            eprintln!("Usage: profilekit fetch --platform <P> --username <U>");
            eprintln!("   or: profilekit fetch --leetcode <U> --gfg <U> ...");
            eprintln!("   or: profilekit serve --addr <ADDR>");
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Query parameters equivalent to the fetch flags
///
/// Mode selection is left to [`StatsQuery::from_params`], exactly as for
/// the HTTP endpoint.
fn fetch_params(
    platform: Option<String>,
    username: Option<String>,
    per_platform: [(&str, Option<String>); 4],
) -> HashMap<String, String> {
    [("platform", platform), ("username", username)]
        .into_iter()
        .chain(per_platform)
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}

async fn run_fetch(aggregator: &Aggregator, query: &StatsQuery) {
    let response = aggregator.query(query).await;

    let json = serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
        eprintln!("Error serializing response: {}", e);
        std::process::exit(1);
    });
    writeln_safe(&json);
}

async fn run_serve(builder: AggregatorBuilder, addr: &str) {
    let aggregator = build_or_exit(builder);
    if let Err(e) = server::run(addr, aggregator).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_or_exit(builder: AggregatorBuilder) -> Aggregator {
    builder.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
