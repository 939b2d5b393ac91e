#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use studentdb::{
    AppError, Config, ConnectionProvider, LogLevel, SqliteStudentRepository, StoreError, Student,
    StudentRepository,
};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// Generate shell completions for studentdb
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Subcommands that open the store
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// List every student (phones not loaded)
    List,

    /// List students born on the given date
    BornOn {
        /// Birth date as YYYY-MM-DD
        #[arg(value_name = "DATE")]
        birth_date: NaiveDate,
    },

    /// List students that own phones, with their phones
    WithPhones,

    /// Show one student with its phones
    Phones {
        /// Student id
        id: i64,
    },

    /// Insert a new student
    Add {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Birth date as YYYY-MM-DD
        #[arg(short, long)]
        birth_date: NaiveDate,
    },

    /// Overwrite the name and birth date of an existing student
    Update {
        /// Student id
        id: i64,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Birth date as YYYY-MM-DD
        #[arg(short, long)]
        birth_date: NaiveDate,
    },

    /// Delete a student
    Remove {
        /// Student id
        id: i64,
    },

    /// Show row counts and database size
    Stats,
}

/// studentdb - persist students and read back their phones
#[derive(Parser, Debug)]
#[command(name = "studentdb")]
#[command(version)]
#[command(about = "Student records backed by SQLite")]
#[command(long_about = "studentdb stores students and reads back the phones they own.

EXAMPLES:
    studentdb add -n 'Vinicius Francischini' -b 2000-12-12
    studentdb born-on 2000-12-12
    studentdb with-phones --json
    studentdb remove 2
    studentdb completions bash > studentdb.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically, unless --database is given.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Database file, overrides the configured path (":memory:" for a throwaway store)
    #[arg(short, long, env = "STUDENTDB_DATABASE", global = true)]
    database: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // ANSI colour and tag per level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known.
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "studentdb", &mut std::io::stdout());
        }
        Commands::Store(ref command) => run(&cli, command)?,
    }

    Ok(())
}

fn run(options: &CommandLineOptions, command: &StoreCommand) -> Result<(), AppError> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(options)?;
    log::set_max_level(config.log_level.to_level_filter());

    debug!("Using database at {}", config.database.path);
    let connection = config
        .database
        .create_connection()
        .map_err(|e| StoreError::Unavailable(format!("{:#}", e)))?;
    let repository = SqliteStudentRepository::new(connection);

    execute(&repository, command, options.json)
}

/// Resolve the effective configuration: file first, then command line flags
///
/// A missing config file is only written out when the store location is not
/// given on the command line.
fn load_config(options: &CommandLineOptions) -> Result<Config, AppError> {
    let config_path = Path::new(&options.config_path);

    let mut config = if options.database.is_some() && !config_path.exists() {
        debug!(
            "No config file at '{}', using defaults and command line flags",
            config_path.display()
        );
        Config::default()
    } else {
        Config::load_or_create(config_path).map_err(|e| AppError::Config(format!("{:#}", e)))?
    };

    apply_overrides(&mut config, options);

    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(database) = &options.database {
        config.database.path = database.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn execute(
    repository: &SqliteStudentRepository,
    command: &StoreCommand,
    json: bool,
) -> Result<(), AppError> {
    match command {
        StoreCommand::List => {
            let students = repository.all_students()?;
            print_students(&students, json)?;
        }
        StoreCommand::BornOn { birth_date } => {
            let students = repository.students_birth_at(*birth_date)?;
            print_students(&students, json)?;
        }
        StoreCommand::WithPhones => {
            let students = repository.students_with_phones()?;
            if json {
                print_json(&students)?;
            } else {
                for student in students.values() {
                    print_student_with_phones(student);
                }
            }
        }
        StoreCommand::Phones { id } => match find_student(repository, *id)? {
            Some(student) => {
                let student = repository.with_phones(student)?;
                if json {
                    print_json(&student)?;
                } else {
                    print_student_with_phones(&student);
                }
            }
            None => warn!("No student with id {}", id),
        },
        StoreCommand::Add { name, birth_date } => {
            let student = repository.save(Student::new(name.clone(), *birth_date))?;
            info!("Student added");
            print_students(std::slice::from_ref(&student), json)?;
        }
        StoreCommand::Update {
            id,
            name,
            birth_date,
        } => {
            if find_student(repository, *id)?.is_none() {
                warn!("No student with id {}, the update will not change any row", id);
            }
            let student = repository.save(Student::persisted(*id, name.clone(), *birth_date))?;
            info!("Student updated");
            print_students(std::slice::from_ref(&student), json)?;
        }
        StoreCommand::Remove { id } => match find_student(repository, *id)? {
            Some(student) => {
                repository.remove(&student)?;
                info!("Removed {}", student);
            }
            None => warn!("No student with id {}", id),
        },
        StoreCommand::Stats => {
            let stats = repository.connection().stats()?;
            println!("{}", stats);
        }
    }

    Ok(())
}

// The repository has no lookup by id; scanning the listing is enough for a
// one-shot command.
fn find_student(
    repository: &SqliteStudentRepository,
    id: i64,
) -> Result<Option<Student>, AppError> {
    Ok(repository
        .all_students()?
        .into_iter()
        .find(|student| student.id() == Some(id)))
}

fn print_students(students: &[Student], json: bool) -> Result<(), AppError> {
    if json {
        return print_json(&students);
    }

    if students.is_empty() {
        info!("No students found");
    }
    for student in students {
        println!("{}", student);
    }
    Ok(())
}

fn print_student_with_phones(student: &Student) {
    println!("{}", student);
    for phone in student.phones() {
        println!("    {}", phone);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
