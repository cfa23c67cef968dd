use std::process::ExitCode;

use clap::{Parser, Subcommand};
use green_api_relay::client::{Credentials, RelayClient, RelayReply};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Drive the GREEN-API relay from the terminal", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, env = "GREEN_API_ID_INSTANCE")]
    id_instance: String,

    #[arg(short = 't', long, env = "GREEN_API_TOKEN")]
    api_token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show instance settings
    Settings,
    /// Show instance authorization state
    State,
    /// Send a text message
    SendMessage {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        message: String,
    },
    /// Send a file by URL
    SendFile {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let credentials = Credentials::new(&cli.id_instance, &cli.api_token)?;
    let client = RelayClient::new(&cli.url, credentials)?;

    let reply = match cli.command {
        Commands::Settings => client.get_settings().await?,
        Commands::State => client.get_state_instance().await?,
        Commands::SendMessage { phone, message } => client.send_message(&phone, &message).await?,
        Commands::SendFile { phone, url } => client.send_file_by_url(&phone, &url).await?,
    };

    print_reply(&reply)
}

fn print_reply(reply: &RelayReply) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let pretty = serde_json::to_string_pretty(&reply.body)?;
    if !reply.is_success() {
        eprintln!("Error: relay returned status {}", reply.status);
        eprintln!("Response: {}", pretty);
    } else {
        println!("{}", pretty);
    }
    Ok(ExitCode::from(exit_status(reply)))
}

/// Process exit status: non-zero when the relay reported an error.
fn exit_status(reply: &RelayReply) -> u8 {
    if reply.is_success() {
        0
    } else {
        1
    }
}
