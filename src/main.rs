//! VeriText CLI - Main Entry Point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use veritext_core::constants;
use veritext_core::logic::monitor::classify;
use veritext_core::{
    compare_response, AuthClient, AuthConfig, ClassificationResult, DetectorClient,
    DetectorConfig, MonitorConfig, ModelId, RegisterRequest, ServiceMonitor, Session, UploadFile,
};

#[derive(Parser)]
#[command(name = "veritext", version, about = "AI text detection client")]
struct Cli {
    /// Text-analysis API base URL
    #[arg(long, env = "VERITEXT_TEXT_API_URL")]
    api_url: Option<String>,

    /// Authentication API base URL
    #[arg(long, env = "VERITEXT_AUTH_API_URL")]
    auth_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One-shot service health check
    Status,

    /// Poll service health until interrupted
    Watch {
        /// Seconds between checks
        #[arg(long, default_value_t = constants::DEFAULT_REFRESH_INTERVAL)]
        interval: u64,
    },

    /// Analyze a text with one model
    Analyze {
        text: String,

        /// Model to use: B or N
        #[arg(long, default_value = "B")]
        model: String,
    },

    /// Analyze a file (TXT, PDF, DOCX, DOC) with one model
    AnalyzeFile {
        path: PathBuf,

        /// Model to use: B or N
        #[arg(long, default_value = "B")]
        model: String,
    },

    /// Run the same text through both models and aggregate the verdict
    Compare { text: String },

    /// Log in and store the session
    Login { email: String, password: String },

    /// Register a new account
    Register {
        email: String,
        password: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show the authenticated user's profile
    Profile,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::persistent();

    let detector = DetectorClient::new(
        DetectorConfig {
            base_url: cli.api_url.unwrap_or_else(constants::get_text_api_url),
            timeout_seconds: constants::get_request_timeout(),
        },
        session.clone(),
    );

    let auth = AuthClient::new(
        AuthConfig {
            base_url: cli.auth_url.unwrap_or_else(constants::get_auth_api_url),
            timeout_seconds: constants::get_request_timeout(),
        },
        session,
    );

    match cli.command {
        Command::Status => {
            let config = MonitorConfig::default();
            let started = Instant::now();
            let result = detector.check_health().await;
            let latency = started.elapsed();

            let (state, message) = classify(&result, latency, config.degraded_latency);
            println!("Service: {} ({} ms)", state, latency.as_millis());
            if let Some(message) = message {
                println!("  {}", message);
            }
        }

        Command::Watch { interval } => {
            let config = MonitorConfig {
                refresh_interval: std::time::Duration::from_secs(interval),
                ..MonitorConfig::default()
            };

            let handle = ServiceMonitor::start(Arc::new(detector), config, |health| {
                let latency = health
                    .latency_ms
                    .map(|ms| format!("{} ms", ms))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "[{}] {} ({}){}",
                    health.last_checked_at.format("%H:%M:%S"),
                    health.state,
                    latency,
                    health
                        .message
                        .as_deref()
                        .map(|m| format!(" - {}", m))
                        .unwrap_or_default()
                );
            });

            tokio::signal::ctrl_c().await?;
            handle.stop();
            println!("Monitor stopped");
        }

        Command::Analyze { text, model } => {
            let model: ModelId = model.parse()?;
            let result = detector.analyze_text(&text, model).await?;
            print_result(&result);
        }

        Command::AnalyzeFile { path, model } => {
            let model: ModelId = model.parse()?;
            let file = UploadFile::from_path(&path)?;
            let result = detector.analyze_file(file, model).await?;
            print_result(&result);
        }

        Command::Compare { text } => {
            let response = detector.compare_models(&text).await?;

            println!("Model B:");
            print_result(&response.model_b);
            println!("Model N:");
            print_result(&response.model_n);

            let outcome = compare_response(&response);
            println!(
                "Verdict: {} (higher confidence: model {})",
                if outcome.consensus {
                    "consensus"
                } else {
                    "divergent"
                },
                outcome.winning_model
            );
            println!(
                "Deltas: AI {:.2} / Human {:.2}",
                outcome.ai_probability_delta_display(),
                outcome.human_probability_delta_display()
            );
        }

        Command::Login { email, password } => {
            let response = auth.login(&email, &password).await?;
            match response.user {
                Some(user) => println!("Logged in as {}", user.email),
                None => println!("Logged in"),
            }
        }

        Command::Register {
            email,
            password,
            username,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                email,
                password,
                username,
                first_name,
                last_name,
            };
            let response = auth.register(&request).await?;
            match response.message {
                Some(message) => println!("{}", message),
                None => println!("Registered"),
            }
        }

        Command::Logout => {
            auth.logout().await;
            println!("Logged out");
        }

        Command::Profile => {
            let user = auth.profile().await?;
            println!("Email: {}", user.email);
            if let Some(username) = user.username {
                println!("Username: {}", username);
            }
            if let (Some(first), Some(last)) = (user.first_name, user.last_name) {
                println!("Name: {} {}", first, last);
            }
        }
    }

    Ok(())
}

fn print_result(result: &ClassificationResult) {
    println!(
        "  {} (AI {:.2}% / Human {:.2}%)",
        result.prediction,
        result.clamped_ai_probability(),
        result.clamped_human_probability()
    );
}
