//! RouterOS CLI Client
//!
//! Command-line interface for running API commands against a device.

use std::ops::ControlFlow;

use clap::{Args as ClapArgs, Parser, Subcommand};
use routeros::{Client, Config, Pair, PairOp, Query, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// RouterOS CLI
#[derive(Parser, Debug)]
#[command(name = "routeros-cli")]
#[command(about = "CLI for the RouterOS API")]
#[command(version)]
struct Args {
    /// Device address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8728")]
    address: String,

    /// Login user
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// Login password
    #[arg(short, long, default_value = "")]
    password: String,

    /// Connect timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command with key=value parameters
    Call {
        /// Command path, e.g. /system/identity/print
        command: String,

        /// Parameters as key=value
        params: Vec<String>,
    },

    /// Run a query
    Query {
        command: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run a streaming command and print replies as they arrive
    Listen {
        command: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Stop after this many replies (0 = until the stream ends)
        #[arg(short, long, default_value = "0")]
        count: usize,
    },
}

#[derive(ClapArgs, Debug)]
struct QueryArgs {
    /// Properties to return, comma separated
    #[arg(long, value_delimiter = ',')]
    proplist: Vec<String>,

    /// Filters as [op]key=value where op is one of = - < >
    #[arg(short, long)]
    filter: Vec<String>,

    /// Operator combining the filters, e.g. '|'
    #[arg(long, default_value = "")]
    op: String,
}

impl QueryArgs {
    fn to_query(&self) -> Result<Query, String> {
        let mut query = Query::new().proplist(self.proplist.iter().cloned()).op(&self.op);
        for filter in &self.filter {
            query = query.filter(parse_filter(filter)?);
        }
        Ok(query)
    }
}

fn parse_param(param: &str) -> Result<Pair, String> {
    let (key, value) = param
        .split_once('=')
        .ok_or_else(|| format!("parameter '{}' is not key=value", param))?;
    Ok(Pair::new(key, value))
}

fn parse_filter(filter: &str) -> Result<Pair, String> {
    let mut chars = filter.chars();
    let (op, rest) = match chars.next().and_then(PairOp::from_char) {
        Some(op) => (op, chars.as_str()),
        None => (PairOp::None, filter),
    };

    if op == PairOp::Absent {
        return Ok(Pair::filter(op, rest, ""));
    }

    let pair = parse_param(rest)?;
    Ok(Pair::filter(op, pair.key, pair.value))
}

fn print_reply(reply: &Reply) {
    for pair in &reply.pairs {
        println!("{}: {}", pair.key, pair.value);
    }
    for record in &reply.sub_pairs {
        let row: Vec<String> = record.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        println!("{}", row.join(" "));
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder()
        .address(&args.address)
        .connect_timeout_ms(args.connect_timeout_ms)
        .build();

    let mut client = Client::with_config(config)?;
    client.connect(&args.user, &args.password)?;
    tracing::info!("Connected to {}", client.address());

    match &args.command {
        Commands::Call { command, params } => {
            let params = params
                .iter()
                .map(|p| parse_param(p))
                .collect::<Result<Vec<_>, _>>()?;
            print_reply(&client.call(command, &params)?);
        }
        Commands::Query { command, query } => {
            print_reply(&client.query(command, &query.to_query()?)?);
        }
        Commands::Listen {
            command,
            query,
            count,
        } => {
            let mut seen = 0;
            client.keep_alive_call(command, &query.to_query()?, |records| {
                for record in &records {
                    println!("{:?}", record);
                }
                seen += 1;
                if *count > 0 && seen >= *count {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })?;
        }
    }

    client.close()?;
    Ok(())
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,routeros=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("RouterOS CLI v{}", routeros::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
