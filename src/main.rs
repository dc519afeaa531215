use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exam_net::config::{load_config, validate_config, Config};
use exam_net::output;
use exam_net::service::{self, ExamReport};
use exam_net::store::FileStore;
use exam_net::transport::{expand_answer_arg, parse_field_arg, RejectReason, SubmitRequest};

const EXIT_SUCCESS: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List exams that have an answer key (default if no subcommand)
    Exams,
    /// Store a student's answers, then show their result and the leaderboard
    Submit {
        /// Exam code, as used in the answer key file
        #[arg(short, long)]
        exam: String,

        /// Student code, as listed in the roster
        #[arg(short, long)]
        student: String,

        /// Answers for one subject, comma separated: "Matematik=A,B,,D" (empty = blank)
        #[arg(short, long = "answer", value_name = "SUBJECT=ANSWERS")]
        answers: Vec<String>,

        /// A single form field: "Matematik_3=C"
        #[arg(long = "field", value_name = "SUBJECT_N=ANSWER", value_parser = parse_field_arg)]
        fields: Vec<(String, String)>,

        /// Show every question's outcome
        #[arg(short, long)]
        details: bool,
    },
    /// Re-score a stored submission
    #[command(name = "result")]
    Report {
        #[arg(short, long)]
        exam: String,

        #[arg(short, long)]
        student: String,

        /// Show every question's outcome
        #[arg(short, long)]
        details: bool,
    },
    /// Show the leaderboard for an exam
    Rank {
        #[arg(short, long)]
        exam: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "exam-net")]
#[command(about = "Score exam submissions with negative marking and rank students", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/exam-net/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding answer keys, coefficients, roster and submissions
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "exam_net=debug" } else { "exam_net=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut store = FileStore::from_config(&config);
    let command = cli.command.unwrap_or(Commands::Exams);

    match run(command, &mut store, &config, cli.format) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            if let Some(reason) = e.downcast_ref::<RejectReason>() {
                eprintln!("{}", reason);
                std::process::exit(EXIT_REJECTED);
            }
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }
}

fn run(command: Commands, store: &mut FileStore, config: &Config, format: OutputFormat) -> Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Exams => {
            let summaries = service::exam_summaries(&*store, config)?;
            match format {
                OutputFormat::Table => println!("{}", output::format_exam_list(&summaries, use_colors)),
                OutputFormat::Tsv => {
                    for s in &summaries {
                        println!("{}\t{}\t{}\t{}", s.exam_code, s.subjects, s.questions, s.submissions);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
            }
        }
        Commands::Submit {
            exam,
            student,
            answers,
            fields,
            details,
        } => {
            let mut request = SubmitRequest::new(&student, &exam);
            for arg in &answers {
                match expand_answer_arg(arg) {
                    Ok(expanded) => request.fields.extend(expanded),
                    Err(msg) => Cli::command().error(ErrorKind::ValueValidation, msg).exit(),
                }
            }
            request.fields.extend(fields);

            let report = service::submit(store, &request, config)?;
            print_report(&report, format, details, use_colors)?;
        }
        Commands::Report {
            exam,
            student,
            details,
        } => {
            let report = service::student_report(&*store, exam.trim(), student.trim(), config)?;
            print_report(&report, format, details, use_colors)?;
        }
        Commands::Rank { exam } => {
            let ranking = service::leaderboard(&*store, exam.trim(), config)?;
            match format {
                OutputFormat::Table => println!("{}", output::format_ranking(&ranking, None, use_colors)),
                OutputFormat::Tsv => println!("{}", output::format_ranking_tsv(&ranking)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranking)?),
            }
        }
    }

    Ok(())
}

fn print_report(report: &ExamReport, format: OutputFormat, details: bool, use_colors: bool) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", output::format_report(report, use_colors));
            if details {
                for result in report.results.iter() {
                    println!();
                    println!("{}", output::format_question_detail(result, use_colors));
                }
            }
            println!();
            println!("Leaderboard");
            println!(
                "{}",
                output::format_ranking(&report.ranking, Some(report.student_code.as_str()), use_colors)
            );
        }
        OutputFormat::Tsv => println!("{}", output::format_report_tsv(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
