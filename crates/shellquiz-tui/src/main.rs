//! Shellquiz entry point.
//!
//! # Usage
//!
//! ```bash
//! # Take the quiz on this terminal
//! shellquiz
//!
//! # Serve the quiz to remote clients
//! QUIZ_SERVER=true shellquiz --port 23234
//!
//! # Take the quiz on a remote server
//! shellquiz connect 127.0.0.1:23234 --host-cert .ssh/shellquiz_host_cert.pem
//! ```

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand, builder::BoolishValueParser};
use shellquiz_app::{Driver, QuestionBank, Quiz, QuizConfig, Runtime};
use shellquiz_server::{
    DEFAULT_GRACE_PERIOD, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_HOST, DEFAULT_HOST_CERT_PATH,
    DEFAULT_HOST_KEY_PATH, DEFAULT_PORT, GENERATED_SUBJECT, Server, ServerConfig,
};
use shellquiz_tui::{ConnectOptions, TerminalDriver, TerminalError, connect};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// AWS quiz for the terminal, locally or over the network
#[derive(Parser, Debug)]
#[command(name = "shellquiz")]
#[command(about = "Multiple-choice quiz for the terminal, served locally or to remote clients")]
#[command(version)]
struct Args {
    /// Serve the quiz to remote clients instead of running it here
    #[arg(long, env = "QUIZ_SERVER", value_parser = BoolishValueParser::new())]
    server: bool,

    /// Address to listen on in server mode
    #[arg(long, env = "QUIZ_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on in server mode
    #[arg(long, env = "QUIZ_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Host private key (PEM), created on first start
    #[arg(long, env = "QUIZ_HOST_KEY", default_value = DEFAULT_HOST_KEY_PATH)]
    host_key: PathBuf,

    /// Host certificate (PEM), created on first start
    #[arg(long, env = "QUIZ_HOST_CERT", default_value = DEFAULT_HOST_CERT_PATH)]
    host_cert: PathBuf,

    /// Seconds to wait for sessions to finish on shutdown
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD.as_secs())]
    grace_period_secs: u64,

    /// Seconds the intro banner stays up
    #[arg(long, default_value_t = 3)]
    intro_secs: u64,

    /// Let any key skip the intro banner
    #[arg(long)]
    dismiss_intro_on_key: bool,

    /// Log level in server mode (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take the quiz on a remote server
    Connect {
        /// Server address (host:port)
        addr: String,

        /// Name the server certificate was issued for
        #[arg(long, default_value = GENERATED_SUBJECT)]
        server_name: String,

        /// Server certificate to trust (PEM)
        #[arg(long, env = "QUIZ_HOST_CERT", default_value = DEFAULT_HOST_CERT_PATH)]
        host_cert: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let quiz = QuizConfig {
        intro_delay: Duration::from_secs(args.intro_secs),
        dismiss_intro_on_key: args.dismiss_intro_on_key,
    };

    match &args.command {
        Some(Command::Connect { addr, server_name, host_cert }) => {
            let options = ConnectOptions {
                addr: addr.clone(),
                server_name: server_name.clone(),
                host_cert: host_cert.clone(),
            };
            run_client(&options).await
        },
        None if args.server => run_server(&args, quiz).await,
        None => run_local(quiz).await,
    }
}

async fn run_server(args: &Args, quiz: QuizConfig) -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = ServerConfig {
        host: args.host.clone(),
        port: args.port,
        host_key_path: args.host_key.clone(),
        host_cert_path: args.host_cert.clone(),
        grace_period: Duration::from_secs(args.grace_period_secs),
        handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        quiz,
    };

    tracing::info!("Starting shellquiz server on {}", config.bind_address());

    let result = match Server::bind(&config, QuestionBank::builtin()).await {
        Ok(server) => server.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("server failed: {e}");
            ExitCode::FAILURE
        },
    }
}

#[allow(clippy::print_stdout)]
async fn run_local(config: QuizConfig) -> ExitCode {
    match play_locally(config).await {
        Ok(quiz) => {
            if let Some(score) = quiz.final_score() {
                println!("Your score: {score}%");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            println!("Oh no: {e}");
            ExitCode::FAILURE
        },
    }
}

async fn play_locally(config: QuizConfig) -> Result<Quiz, TerminalError> {
    let driver = TerminalDriver::new()?;
    let size = driver.window_size()?;
    let quiz = Quiz::new(QuestionBank::builtin(), config, size);
    Runtime::new(driver, quiz).run().await
}

#[allow(clippy::print_stdout)]
async fn run_client(options: &ConnectOptions) -> ExitCode {
    match connect(options).await {
        Ok(diagnostics) => {
            for line in diagnostics {
                println!("{line}");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            println!("Oh no: {e}");
            ExitCode::FAILURE
        },
    }
}
