//! CLI entry point for chatline

use anyhow::{bail, Result};
use chatline_core::logging::init_logging;
use chatline_core::{ClientOptions, Message, Session};
use chatline_providers::Client;
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Send one conversational turn to a chat completions endpoint")]
#[command(version)]
struct Cli {
    /// API token
    #[arg(short, long, env = "OPENAI_API_KEY", hide_env_values = true)]
    token: Option<String>,

    /// Model to use (overrides openai.model in .openai.yaml)
    #[arg(short, long)]
    model: Option<String>,

    /// Config file (default: nearest .openai.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// History file; every turn is appended to it and it is reloaded next time
    #[arg(long)]
    history: Option<PathBuf>,

    /// System prompt, used only when the history file does not exist yet
    #[arg(short, long)]
    system: Option<String>,

    /// Image to attach to the prompt
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Prompt text; read from stdin when omitted
    prompt: Vec<String>,
}

impl Cli {
    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            token: self.token.clone(),
            model: self.model.clone(),
            config_file: self.config.clone(),
            start_dir: None,
        }
    }

    fn read_prompt(&self) -> Result<String> {
        let prompt = if self.prompt.is_empty() && !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            self.prompt.join(" ")
        };

        if prompt.trim().is_empty() {
            bail!("no prompt given");
        }
        Ok(prompt)
    }
}

/// Open the session: resume from the history file, or start one seeded
/// with the system prompt
fn open_session(cli: &Cli, client: &Client) -> Result<Session> {
    let system = cli.system.clone();
    let seed = move |session: &mut Session| match system {
        Some(text) => session.append(Message::new("system").text(text)),
        None => Ok(()),
    };

    let session = match &cli.history {
        Some(path) => client.new_session_with(|s| s.enable_auto_sync_with(path, seed))?,
        None => client.new_session_with(seed)?,
    };
    debug!("Session opened with {} messages", session.len());
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.client_options();

    let logging = options
        .load_file()
        .map(|file| file.logging)
        .unwrap_or_default();
    let _guard = init_logging(&logging);

    run(&cli, &options)
}

/// One turn: open the session, send the prompt, print and record the reply
fn run(cli: &Cli, options: &ClientOptions) -> Result<()> {
    let client = Client::try_new(options)?;
    let mut session = open_session(cli, &client)?;

    let prompt = cli.read_prompt()?;
    session.append(
        client
            .new_message("user")
            .text(prompt)
            .maybe_image(cli.image.as_deref()),
    )?;

    let response = client.send(|req| req.attach_session(&session));
    if !response.is_success() {
        let reason = response.error().unwrap_or("unknown error");
        error!("Request failed: {}", reason);
        bail!("{}", reason);
    }

    if let Some(call) = response.function_call() {
        println!("{}", serde_json::to_string(call)?);
    }
    if let Some(completion) = response.completion() {
        print!("{}", completion);
        session.append(Message::new("assistant").text(completion))?;
    }

    Ok(())
}
