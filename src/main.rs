use std::future::Future;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use astrocompanion::connector::api::controller::{ChartController, ChatController};
use astrocompanion::connector::api::http;
use astrocompanion::domain::common_timezones;
use astrocompanion::{BirthArgs, ChatTurn, Commands, Container, ContainerConfig, ReplyPhase, Router};

#[derive(Parser)]
#[command(name = "astrocompanion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with a scripted offline chat client instead of the Anthropic API
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Replace the shipped astrologer system prompt with this file
    #[arg(long, global = true)]
    system_prompt: Option<PathBuf>,

    /// Command line of an external chart engine (JSON over stdin/stdout)
    #[arg(long, global = true)]
    engine_command: Option<String>,

    #[arg(long, global = true, default_value_t = 30_000)]
    engine_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Timezones = cli.command {
        println!("{}", common_timezones().join("\n"));
        return Ok(());
    }

    let container = Container::new(ContainerConfig {
        mock_llm: cli.mock_llm,
        system_prompt_path: cli.system_prompt,
        engine_command: cli.engine_command,
        engine_timeout: Duration::from_millis(cli.engine_timeout_ms),
    })
    .await?;

    match cli.command {
        Commands::Chat { birth } => run_chat(&container, &birth).await,
        Commands::Serve { port, public } => {
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            http::serve(Arc::new(container), SocketAddr::new(ip, port)).await
        }
        command => {
            let output = Router::new(&container).route(command).await?;
            println!("{}", output);
            Ok(())
        }
    }
}

/// Line-based chat loop. Replies stream to stdout; Ctrl-C stops the reply in
/// flight without leaving the session, and at the prompt it ends the session.
async fn run_chat(container: &Container, birth: &BirthArgs) -> Result<()> {
    let charts = ChartController::new(container);
    let chat = ChatController::new(container);

    if let Some(view) = Router::new(container).prepare_chart(birth).await {
        println!("{}", view.status);
    }
    println!("{}", charts.status_line().await);
    println!("Ask anything. Commands: /prompts /status /clear /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<ChatTurn> = Vec::new();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = next_input(&mut lines, tokio::signal::ctrl_c()).await? else {
            println!();
            break;
        };
        let input = line.trim();

        match input {
            "/quit" | "/exit" => break,
            "/status" => {
                println!("{}", charts.status_line().await);
                continue;
            }
            "/prompts" => {
                for (i, prompt) in chat.suggested_prompts().await.iter().enumerate() {
                    println!("{}. {}", i + 1, prompt);
                }
                continue;
            }
            "/clear" => {
                history.clear();
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        let Some(mut reply) = chat.reply(input, &history).await else {
            continue;
        };
        let cancel = reply.cancel_token();
        let mut full = String::new();

        loop {
            tokio::select! {
                chunk = reply.next() => match chunk {
                    Some(text) => {
                        print!("{}", text);
                        std::io::stdout().flush()?;
                        full.push_str(&text);
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    cancel.cancel();
                    print!("\n[reply cancelled]");
                    break;
                }
            }
        }
        println!();

        if reply.phase() == ReplyPhase::Completed {
            history.push(ChatTurn::user(input));
            history.push(ChatTurn::assistant(full));
        }
    }

    Ok(())
}

/// Next line of input, or `None` at end of input or when `interrupt` fires
/// first. An interrupt that fails to register is ignored.
async fn next_input<R, F>(lines: &mut Lines<R>, interrupt: F) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        line = lines.next_line() => line,
        Ok(()) = interrupt => Ok(None),
    }
}
