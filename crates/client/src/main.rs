//! squiggle-client CLI entry point.

use clap::Parser;
use squiggle_client::cli::plays::{load_player_states, PlaysAction};
use squiggle_client::cli::{Cli, Commands, OutputFormat};
use squiggle_client::output::{format_output, pretty};
use squiggle_client::SquiggleClient;
use squiggle_core::play::CreatePlayRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = SquiggleClient::new(&cli.base_url);

    match cli.command {
        Commands::Plays(plays_cmd) => match plays_cmd.action {
            PlaysAction::List => {
                let plays = client.list_plays().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&plays, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_plays(&plays)),
                }
            }
            PlaysAction::Create { name, file } => {
                let player_states = load_player_states(file.as_deref())?;
                let request = CreatePlayRequest::new(name).with_player_states(player_states);
                let play = client.create_play(&request).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&play, cli.format)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_play(&play))
                    }
                }
            }
            PlaysAction::Get { id } => {
                let play = client.get_play(&id).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&play, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_play(&play)),
                }
            }
            PlaysAction::Delete { id } => {
                client.delete_play(&id).await?;
                if !cli.quiet {
                    println!("Deleted play {}", id);
                }
            }
        },
        Commands::Health => {
            let status = client.health().await?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "status": status }))
                }
                OutputFormat::Pretty => println!("Server health: {}", status),
            }
        }
    }

    Ok(())
}
