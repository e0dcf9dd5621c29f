use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod batch;
mod config;
mod decline;
mod form;
mod interactive;
mod mailer;
mod models;
mod notice;
mod report;
mod session;
mod suggest;

use config::EmailConfig;
use form::{ParseMode, Submission};
use mailer::{Mailer, NoticeEmail, SEND_FAILED_MESSAGE};
use models::SUBJECT_COUNT;

#[derive(Parser)]
#[command(name = "scholar-lens")]
#[command(about = "Flags academic decline and drafts parent notices", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(flatten)]
    email: EmailConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one student record
    Evaluate {
        #[arg(long, default_value = "")]
        name: String,
        /// Male, Female or Other
        #[arg(long)]
        gender: String,
        #[arg(long)]
        absences: String,
        #[arg(long)]
        study_hours: String,
        /// Yes or No
        #[arg(long)]
        activities: String,
        /// Seven comma-separated scores: Math, Geography, Biology,
        /// Chemistry, Physics, English, Second Language
        #[arg(long, value_delimiter = ',')]
        scores: Vec<String>,
        #[arg(long)]
        parent_email: String,
        /// Write the parent notice HTML to this file
        #[arg(long)]
        html_out: Option<PathBuf>,
        /// Email the notice to the parent when decline is detected
        #[arg(long)]
        send: bool,
        /// Treat unparsable numbers as 0 instead of rejecting them
        #[arg(long)]
        lenient: bool,
    },
    /// Evaluate every student in a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        /// Write a markdown report to this file
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        lenient: bool,
    },
    /// Log in and fill in the form from the terminal
    Interactive {
        #[arg(long)]
        lenient: bool,
    },
}

fn parse_mode(lenient: bool) -> ParseMode {
    if lenient {
        ParseMode::Lenient
    } else {
        ParseMode::Strict
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "scholar_lens=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Evaluate {
            name,
            gender,
            absences,
            study_hours,
            activities,
            scores,
            parent_email,
            html_out,
            send,
            lenient,
        } => {
            let scores: [String; SUBJECT_COUNT] = scores.try_into().map_err(|given: Vec<String>| {
                anyhow::anyhow!("expected {SUBJECT_COUNT} scores, got {}", given.len())
            })?;
            let submission = Submission {
                name,
                gender,
                absences,
                study_hours,
                activities,
                scores,
                parent_email,
            };
            let validated = submission
                .parse(parse_mode(lenient), None)
                .context("invalid student form")?;

            let record = &validated.record;
            let result = suggest::assess(record);
            let reasons = decline::evaluate_with_reasons(record);
            tracing::info!(
                student = %record.student_name,
                gender = ?validated.gender,
                declining = result.is_declining,
                "evaluated submission"
            );
            print!("{}", report::render_assessment(record, &result, &reasons));

            let Some(message_html) = notice::notice_for(record, &result) else {
                if send {
                    println!("Nothing to send: no decline detected.");
                }
                return Ok(());
            };

            match &html_out {
                Some(path) => {
                    std::fs::write(path, &message_html)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Notice written to {}.", path.display());
                }
                None => {
                    println!();
                    println!("{message_html}");
                }
            }

            if send {
                let mailer = Mailer::new(cli.email);
                let email = NoticeEmail {
                    to_email: validated.parent_email.clone(),
                    to_name: record.student_name.clone(),
                    message_html,
                };
                if let Err(error) = mailer.send(&email).await {
                    tracing::error!(%error, "failed to send notice email");
                    anyhow::bail!(SEND_FAILED_MESSAGE);
                }
                println!("Email sent to {}.", validated.parent_email);
            }
        }
        Commands::Batch {
            csv,
            out,
            limit,
            lenient,
        } => {
            let outcome = batch::evaluate_csv(&csv, parse_mode(lenient))?;

            if outcome.evaluated.is_empty() && outcome.rejected.is_empty() {
                println!("No students found in {}.", csv.display());
                return Ok(());
            }

            let flagged: Vec<_> = outcome.flagged().collect();
            if flagged.is_empty() {
                println!("No students flagged for decline.");
            } else {
                println!("Students flagged for decline:");
                for row in flagged.iter().take(limit) {
                    println!(
                        "- row {}: {} ({}) average {:.1} across {} triggered rules",
                        row.row,
                        row.record.student_name,
                        row.parent_email,
                        decline::average_score(&row.record),
                        row.reasons.len()
                    );
                }
            }
            if !outcome.rejected.is_empty() {
                println!("Skipped {} invalid rows.", outcome.rejected.len());
            }

            if let Some(out) = out {
                let report = report::build_report(
                    &csv.display().to_string(),
                    chrono::Utc::now().date_naive(),
                    &outcome,
                    limit,
                );
                std::fs::write(&out, report)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Interactive { lenient } => {
            let mailer = Mailer::new(cli.email);
            let stdin = std::io::stdin();
            interactive::run(stdin.lock(), std::io::stdout(), &mailer, parse_mode(lenient))
                .await?;
        }
    }

    Ok(())
}
