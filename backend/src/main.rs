use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use student_records::config::AppConfig;
use student_records::domain::{
    calculate_club_statistics, calculate_course_attendance_stats, calculate_student_attendance_stats,
    identify_frequently_absent_students, student_club_info,
};
use student_records::{Backend, LoadReport, UnsafeOverwrite};

const EXIT_OK: u8 = 0;
/// Exit code used when a data file contained lines that could not be loaded
const EXIT_SKIPPED_LINES: u8 = 2;

#[derive(Parser)]
#[command(name = "student-records")]
#[command(about = "Student, attendance and club records kept in CSV files", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the config file and STUDENT_RECORDS_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every data file and report lines that could not be read
    Check,
    /// Print derived statistics as JSON
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },
    /// Sort a record file in place
    Sort {
        #[command(subcommand)]
        command: SortCommand,
    },
}

#[derive(Subcommand)]
enum StatsCommand {
    /// Attendance for one student in a course, or for the whole course
    Attendance {
        #[arg(long)]
        course: i32,
        #[arg(long)]
        student: Option<i32>,
    },
    /// Students of a course whose attendance is below a threshold
    Absent {
        #[arg(long)]
        course: i32,
        /// Fraction between 0 and 1
        #[arg(long, default_value_t = 0.75)]
        threshold: f64,
    },
    /// Club counts, popularity and categories
    Clubs,
    /// Clubs a student belongs to
    StudentClubs {
        #[arg(long)]
        student: i32,
    },
}

#[derive(Subcommand)]
enum SortCommand {
    Students {
        #[arg(long, value_enum, default_value_t = StudentOrder::Name)]
        by: StudentOrder,
        /// Save even if some lines of the file could not be loaded; those lines are lost
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StudentOrder {
    Name,
    Gpa,
    Id,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_directory = data_dir;
    }
    debug!("Using data directory {}", config.data_directory.display());

    let (mut backend, report) = Backend::open(config)?;

    let code = match cli.command {
        Commands::Check => check(&report),
        Commands::Stats { command } => {
            stats(&mut backend, command)?;
            EXIT_OK
        }
        Commands::Sort {
            command: SortCommand::Students { by, force },
        } => sort_students(&mut backend, by, force)?,
    };

    Ok(ExitCode::from(code))
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check(report: &LoadReport) -> u8 {
    for file in &report.files {
        println!(
            "{}: {} loaded, {} skipped",
            file.path.display(),
            file.outcome.loaded,
            file.outcome.skipped_count()
        );
        for skipped in &file.outcome.skipped {
            println!("  line {}: {} ({})", skipped.line_number, skipped.reason, skipped.raw);
        }
    }

    exit_code(report)
}

fn exit_code(report: &LoadReport) -> u8 {
    if report.is_clean() {
        EXIT_OK
    } else {
        EXIT_SKIPPED_LINES
    }
}

/// Sort and save the students. Refuses, unless forced, when saving would
/// drop lines that failed to load.
fn sort_students(backend: &mut Backend, by: StudentOrder, force: bool) -> Result<u8> {
    if force {
        backend.discard_skipped_lines();
    }
    match by {
        StudentOrder::Name => backend.students.sort_by_name(),
        StudentOrder::Gpa => backend.students.sort_by_gpa(),
        StudentOrder::Id => backend.students.sort_by_id(),
    }

    if let Err(e) = backend.save_students() {
        return match e.downcast_ref::<UnsafeOverwrite>() {
            Some(refused) => {
                eprintln!("Not sorting: {}. Fix the file or pass --force.", refused);
                Ok(EXIT_SKIPPED_LINES)
            }
            None => Err(e),
        };
    }
    info!("Sorted {} students", backend.students.len());
    Ok(EXIT_OK)
}

fn stats(backend: &mut Backend, command: StatsCommand) -> Result<()> {
    let policy = backend.config.attendance.clone();

    match command {
        StatsCommand::Attendance { course, student } => {
            backend.attendance.sort_by_date();
            match student {
                Some(student) => print_json(&calculate_student_attendance_stats(
                    &backend.attendance,
                    student,
                    course,
                    &policy,
                )),
                None => print_json(&calculate_course_attendance_stats(&backend.attendance, course, &policy)),
            }
        }
        StatsCommand::Absent { course, threshold } => print_json(&identify_frequently_absent_students(
            &backend.attendance,
            course,
            threshold,
            &policy,
        )),
        StatsCommand::Clubs => print_json(&calculate_club_statistics(&backend.clubs, &backend.memberships)),
        StatsCommand::StudentClubs { student } => {
            print_json(&student_club_info(&backend.memberships, &backend.clubs, student))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Could not serialize statistics")?;
    println!("{}", json);
    Ok(())
}
