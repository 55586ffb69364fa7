//! Query client for a running ipconf instance.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ipconf-cli")]
#[command(about = "Query a running ipconf instance", long_about = None)]
struct Cli {
    /// Base URL of the instance to query
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the client IP the server resolved
    Ip,
    /// Print the User-Agent the server saw
    UserAgent,
    /// Print the Host the server saw
    Host,
    /// Print the protocol the request arrived over
    Proto,
    /// Print the Accept header the server saw
    Accept,
    /// Print the Accept-Encoding header the server saw
    AcceptEncoding,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Ip => "/ip",
            Commands::UserAgent => "/user-agent",
            Commands::Host => "/host",
            Commands::Proto => "/proto",
            Commands::Accept => "/accept",
            Commands::AcceptEncoding => "/accept-encoding",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}{}", cli.url, cli.command.path()))
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        println!("{body}");
        Ok(())
    } else {
        eprintln!("[{status}] {body}");
        std::process::exit(1);
    }
}
