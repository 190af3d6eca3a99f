use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use arxiv_filter::auth::AuthContext;
use arxiv_filter::config::{load_config, resolve_output_dir};
use arxiv_filter::mail::GmailClient;
use arxiv_filter::processor::DigestProcessor;

#[derive(Parser)]
#[command(name = "arxiv_filter")]
#[command(about = "Filter arXiv digest mails into per-subject abstract files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive OAuth login and store the token file
    Login,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let auth = AuthContext::from_config(&cfg)?;

    match cli.cmd {
        Some(Command::Login) => {
            auth.interactive_login()?;
            println!("Login complete; token stored.");
            Ok(())
        }

        // Bare invocation: one full unread-inbox sweep, then exit.
        None => {
            let access_token = auth.access_token()?;
            let mail = GmailClient::new(access_token)?;

            let processor = DigestProcessor::new(
                &mail,
                &cfg.categories,
                resolve_output_dir(&cfg),
                &cfg.processed_label_id,
            );
            processor.run()?;
            Ok(())
        }
    }
}
