use std::fmt;
use std::io::{BufRead, Write as _};
use std::sync::Arc;

use course_core::model::AnswerOutcome;
use course_core::policy::ModuleAccess;
use services::{Clock, CourseError, CourseService, ReviewOutcome, ReviewService};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

mod course;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:navigator.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  NAV_DB_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Status,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "status" => Some(Self::Status),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("NAV_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://navigator.sqlite3".into(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: run the course when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let catalog = Arc::new(course::builtin_catalog());
    let mut service =
        CourseService::load(catalog, storage.progress, Clock::default_clock()).await;

    match cmd {
        Command::Run => run_course(&mut service),
        Command::Status => print_status(&service),
        Command::Reset => {
            service.reset().await;
            println!("Progress cleared.");
        }
    }

    service.flush().await;
    Ok(())
}

fn print_status(service: &CourseService) {
    let catalog = service.catalog();
    println!(
        "XP {} / {}  ·  streak {} (best {})  ·  {}/{} modules complete",
        service.score(),
        catalog.len() as u32 * course_core::model::COMPLETION_REWARD,
        service.streak(),
        service.best_streak(),
        service.completed_count(),
        catalog.len()
    );

    for phase in catalog.phases() {
        println!("— {} ({})", phase.name(), phase.id());
        for module in catalog.modules_in_phase(phase.id()) {
            let position = catalog.position_of(module.id()).unwrap_or_default();
            let marker = match service.module_access(position) {
                Some(ModuleAccess::Completed) => "[x]",
                Some(ModuleAccess::Unlocked) => "[ ]",
                _ => "[·]",
            };
            println!("  {marker} {:>2}. {}", module.id(), module.title());
        }
    }
}

fn prompt(line: &str) -> Option<String> {
    print!("{line}");
    std::io::stdout().flush().ok()?;
    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input).ok()?;
    if input.is_empty() {
        return None; // EOF
    }
    Some(input.trim().to_lowercase())
}

fn letter(display: usize) -> char {
    (b'a' + display as u8) as char
}

/// Display position picked by the user, from the first character of the
/// input. Only ASCII lowercase letters map to a position; anything else
/// (including multibyte characters whose low byte happens to fall into
/// the letter range) is rejected.
fn picked_display(input: &str) -> Option<usize> {
    input
        .chars()
        .next()
        .filter(char::is_ascii_lowercase)
        .and_then(|c| (c as u8).checked_sub(b'a'))
        .map(usize::from)
}

fn render_current(service: &CourseService) {
    let Some(module) = service.current_module() else {
        return;
    };
    let phase_name = service
        .catalog()
        .phase(module.phase())
        .map_or("", |p| p.name());

    println!();
    println!(
        "═ Module {} / {} — {} · {}",
        service.position() + 1,
        service.catalog().len(),
        phase_name,
        module.title()
    );
    println!("  Concept: {}", module.concept());

    if let Some(shuffled) = service.shuffled_current() {
        println!();
        println!("  {}", module.activity().question());
        for (display, option) in shuffled.options().iter().enumerate() {
            println!("    {}) {option}", letter(display));
        }
    }
    if service.can_advance() {
        println!("  ✓ Completed");
    }
}

fn answer_current(service: &mut CourseService, input: &str) {
    let Some(module_id) = service.current_module().map(course_core::model::Module::id) else {
        return;
    };
    let Some(display) = picked_display(input) else {
        return;
    };
    let Some(canonical) = service
        .shuffled_current()
        .and_then(|shuffled| shuffled.canonical_of(display))
    else {
        println!("  No such option.");
        return;
    };

    match service.submit_answer(module_id, canonical) {
        Ok(AnswerOutcome::Completed { reward }) => {
            let explanation = service
                .current_module()
                .map_or(String::new(), |m| m.activity().explanation().to_owned());
            println!("  Correct! +{reward} XP  ·  streak {}", service.streak());
            println!("  {explanation}");
        }
        Ok(AnswerOutcome::AlreadyCompleted) => println!("  Already completed."),
        Ok(AnswerOutcome::Incorrect) => println!("  Not quite — try again."),
        Err(err) => println!("  {err}"),
    }
}

fn review_round(service: &mut CourseService) {
    let Some(module_id) = ReviewService::pick_module(service.catalog(), service.progress())
    else {
        println!("  Nothing to review yet — complete a module first.");
        return;
    };
    let Some(module) = service.catalog().get(module_id) else {
        return;
    };
    let activity = module.activity().clone();
    let shuffled = course_core::shuffle::ShuffledActivity::for_module(&activity, module_id);

    println!();
    println!("  Review — {}", module.title());
    println!("  {}", activity.question());
    for (display, option) in shuffled.options().iter().enumerate() {
        println!("    {}) {option}", letter(display));
    }

    let Some(input) = prompt("  review> ") else {
        return;
    };
    let canonical = picked_display(&input).and_then(|display| shuffled.canonical_of(display));

    match canonical.map(|idx| service.review_answer(module_id, idx)) {
        Some(Ok(ReviewOutcome::Correct { reward })) => println!("  Correct! +{reward} XP"),
        Some(Ok(ReviewOutcome::Incorrect)) => {
            println!("  Not this time. {}", activity.explanation());
        }
        Some(Err(err)) => println!("  {err}"),
        None => println!("  No such option."),
    }
}

fn run_course(service: &mut CourseService) {
    println!("Agentic AI Navigator — a..d answer · n next · p prev · g <n> go · r review · s status · q quit");

    loop {
        render_current(service);
        let Some(input) = prompt("> ") else {
            break;
        };

        match input.as_str() {
            "" => {}
            "q" | "quit" => break,
            "n" | "next" => {
                if service.can_advance() {
                    service.advance();
                } else {
                    println!("  Answer the current module correctly to continue.");
                }
            }
            "p" | "prev" => service.rewind(),
            "s" | "status" => print_status(service),
            "r" | "review" => review_round(service),
            other if other.starts_with('g') => {
                let target = other
                    .trim_start_matches('g')
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1));
                match target {
                    Some(position) => match service.jump_to(position) {
                        Ok(()) => {}
                        Err(CourseError::Locked { .. }) => {
                            println!("  Complete the previous module to unlock.");
                        }
                        Err(err) => println!("  {err}"),
                    },
                    None => println!("  Usage: g <module number>"),
                }
            }
            answer if answer.len() == 1 && answer.chars().all(|c| c.is_ascii_lowercase()) => {
                answer_current(service, answer);
            }
            _ => println!("  Unknown command."),
        }

        if service.is_course_complete() {
            println!();
            println!(
                "🏆 Course complete! {} XP · best streak {}",
                service.score(),
                service.best_streak()
            );
        }
    }
}


#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
