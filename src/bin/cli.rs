use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use serde_json::Value;
use skiplan::calendar::{self, format_calendar_day, parse_calendar_day, parse_weekday, weekday_name};
use skiplan::config::{self, AppConfig, StoreBackend};
use skiplan::{
    CalendarState, CalendarStore, Class, ClassMark, ClassStatus, DayMode, Mutation,
    PercentageColorConfig, Session,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "skiplan", about = "Semester attendance planner")]
struct Args {
    /// Config file (defaults to ~/.skiplan/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Store location, overriding the config file.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Store backend: json or sqlite.
    #[arg(long)]
    backend: Option<StoreBackend>,
    /// Seed dataset used when the store is empty.
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let path = args.config.clone().or_else(config::default_config_path);
    let mut cfg = match path {
        Some(path) => AppConfig::load_or_default(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(data) = &args.data {
        cfg.store.path = Some(data.clone());
    }
    if let Some(backend) = args.backend {
        cfg.store.backend = backend;
    }
    if let Some(seed) = &args.seed {
        cfg.seed_path = Some(seed.clone());
    }
    Ok(cfg)
}

fn load_seed(cfg: &AppConfig) -> Option<Value> {
    let path = cfg.seed_path.as_ref()?;
    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from));
    match parsed {
        Ok(seed) => Some(seed),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable seed dataset");
            None
        }
    }
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if ci < widths.len() && cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_overview(state: &CalendarState) -> String {
    let semester = &state.semester;
    let colors = semester.percentage_colors;
    let mut out = format!(
        "Semester {} .. {} (minimum {}%, caution {}%)\n",
        format_calendar_day(semester.start_date),
        format_calendar_day(semester.end_date),
        colors.minimum,
        colors.caution
    );
    let rows: Vec<Vec<String>> = semester
        .week_schedule
        .iter()
        .map(|(weekday, day)| vec![weekday_name(weekday).to_string(), day.classes.join(",")])
        .collect();
    out.push_str(&render_table(&["weekday", "classes"], &rows));
    out.push_str(&format!("\nmarked days: {}", state.marks.len()));
    out
}

fn render_classes(state: &CalendarState) -> String {
    let rows: Vec<Vec<String>> = state
        .classes
        .iter()
        .map(|c| vec![c.code.clone(), c.name.clone(), c.weight.to_string()])
        .collect();
    render_table(&["code", "name", "weight"], &rows)
}

fn render_stats(state: &CalendarState, today: NaiveDate) -> String {
    let colors = state.semester.percentage_colors;
    let rows: Vec<Vec<String>> = state
        .class_stats()
        .iter()
        .map(|s| {
            vec![
                s.code.clone(),
                s.name.clone(),
                format!("{:.1}", s.remaining_percentage),
                s.band(&colors).as_str().to_string(),
                s.absence_count.to_string(),
                s.free_count.to_string(),
                s.total_days.to_string(),
            ]
        })
        .collect();
    format!(
        "{}\n{}",
        state.semester_stats(today).to_cli_summary(),
        render_table(
            &["code", "name", "remaining", "band", "absences", "free", "days"],
            &rows
        )
    )
}

fn render_day(state: &CalendarState, date: NaiveDate) -> String {
    let mut out = format!(
        "{} ({}) mode={}{}\n",
        format_calendar_day(date),
        weekday_name(chrono::Datelike::weekday(&date)),
        state.day_mode(date).as_str(),
        if state.is_within_semester(date) { "" } else { " [outside semester]" }
    );
    let rows: Vec<Vec<String>> = state
        .classes_on_date(date)
        .iter()
        .map(|c| vec![c.code.clone(), state.class_status(date, &c.code).to_string()])
        .collect();
    out.push_str(&render_table(&["code", "status"], &rows));
    out
}

/// `CODE=status,CODE=status`
fn parse_class_marks(input: &str) -> Result<Vec<ClassMark>, String> {
    input
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (code, status) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected CODE=status, got '{}'", pair))?;
            let status: ClassStatus = status.parse().map_err(|e| format!("{}", e))?;
            Ok(ClassMark::new(skiplan::class::normalize_code(code), status))
        })
        .collect()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_calendar_day(s)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show semester and weekly schedule\n  stats                              Show semester and per-class statistics\n  classes                            List classes\n  class add <CODE> <weight> <name...>\n                                     Add a class\n  class remove <CODE>                Remove a class\n  schedule <weekday> <codes_csv|->   Set the classes meeting on a weekday\n  semester <YYYY-MM-DD> <YYYY-MM-DD> Set the semester period\n  day <YYYY-MM-DD>                   Show a day's classes and statuses\n  mark <YYYY-MM-DD> <CODE=status,...>\n                                     Record statuses (regular|absence|free)\n  mode <YYYY-MM-DD> <mode>           individual|all-regular|all-absence|all-free\n  clear <YYYY-MM-DD>                 Remove a day's mark\n  colors <minimum> <caution>         Set percentage thresholds\n  reset                              Remove every mark\n  export [path]                      Export calendar JSON\n  import <path>                      Replace state from a JSON file\n  reload                             Re-read the store\n  quit|exit                          Exit"
    );
}

fn run_repl<S: CalendarStore>(session: &mut Session<S>, cfg: &AppConfig) {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_overview(session.state())),
            "stats" => println!("{}", render_stats(session.state(), calendar::today())),
            "classes" => println!("{}", render_classes(session.state())),
            "class" => match parts.next() {
                Some("add") => {
                    let code = parts.next();
                    let weight_s = parts.next();
                    let name: Vec<&str> = parts.collect();
                    match (code, weight_s, !name.is_empty()) {
                        (Some(code), Some(weight_s), true) => {
                            let weight: f64 = match weight_s.parse() {
                                Ok(v) => v,
                                Err(_) => {
                                    println!("Invalid weight");
                                    continue;
                                }
                            };
                            let class = Class::new(code, name.join(" "), weight);
                            if session.state().find_class(&class.code).is_some() {
                                println!("Class {} already exists.", class.code);
                                continue;
                            }
                            let code = class.code.clone();
                            session.apply(Mutation::AddClass(class));
                            println!("Class {} added.", code);
                        }
                        _ => println!("Usage: class add <CODE> <weight> <name...>"),
                    }
                }
                Some("remove") => match parts.next() {
                    Some(code) => {
                        let code = skiplan::class::normalize_code(code);
                        if session.state().find_class(&code).is_none() {
                            println!("No class {}.", code);
                            continue;
                        }
                        session.apply(Mutation::RemoveClass { code: code.clone() });
                        println!("Class {} removed.", code);
                    }
                    None => println!("Usage: class remove <CODE>"),
                },
                _ => println!("Usage: class add <CODE> <weight> <name...> | class remove <CODE>"),
            },
            "schedule" => {
                let weekday = parts.next().and_then(parse_weekday);
                let codes = parts.next();
                match (weekday, codes) {
                    (Some(weekday), Some(codes)) => {
                        let classes: Vec<String> = if codes == "-" {
                            Vec::new()
                        } else {
                            codes
                                .split(',')
                                .filter(|c| !c.trim().is_empty())
                                .map(skiplan::class::normalize_code)
                                .collect()
                        };
                        session.apply(Mutation::SetDaySchedule { weekday, classes });
                        println!("{} schedule set.", weekday_name(weekday));
                    }
                    _ => println!("Usage: schedule <weekday> <codes_csv|->"),
                }
            }
            "semester" => {
                let start = parts.next().and_then(parse_date);
                let end = parts.next().and_then(parse_date);
                match (start, end) {
                    (Some(start), Some(end)) => {
                        session.apply(Mutation::SetSemesterPeriod { start, end });
                        println!(
                            "Semester set to {} .. {}.",
                            format_calendar_day(start),
                            format_calendar_day(end)
                        );
                    }
                    _ => println!("Usage: semester <YYYY-MM-DD> <YYYY-MM-DD>"),
                }
            }
            "day" => match parts.next().and_then(parse_date) {
                Some(date) => println!("{}", render_day(session.state(), date)),
                None => println!("Usage: day <YYYY-MM-DD>"),
            },
            "mark" => {
                let date = parts.next().and_then(parse_date);
                let marks = parts.next();
                match (date, marks) {
                    (Some(date), Some(marks)) => match parse_class_marks(marks) {
                        Ok(class_marks) => {
                            session.apply(Mutation::SetDayMark {
                                date,
                                class_marks,
                                all_day_free: false,
                            });
                            println!("Marked {}.", format_calendar_day(date));
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: mark <YYYY-MM-DD> <CODE=status,...>"),
                }
            }
            "mode" => {
                let date = parts.next().and_then(parse_date);
                let mode = parts.next();
                match (date, mode) {
                    (Some(date), Some(mode)) => match mode.parse::<DayMode>() {
                        Ok(mode) => {
                            session.apply(Mutation::SetDayMode { date, mode });
                            println!("{} set to {}.", format_calendar_day(date), mode.as_str());
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: mode <YYYY-MM-DD> <mode>"),
                }
            }
            "clear" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    session.apply(Mutation::SetDayMark {
                        date,
                        class_marks: Vec::new(),
                        all_day_free: false,
                    });
                    println!("Cleared {}.", format_calendar_day(date));
                }
                None => println!("Usage: clear <YYYY-MM-DD>"),
            },
            "colors" => {
                let minimum = parts.next().and_then(|s| s.parse::<f64>().ok());
                let caution = parts.next().and_then(|s| s.parse::<f64>().ok());
                match (minimum, caution) {
                    (Some(minimum), Some(caution)) => {
                        let state = session.apply(Mutation::SetPercentageColors(
                            PercentageColorConfig::new(minimum, caution),
                        ));
                        let colors = state.semester.percentage_colors;
                        println!(
                            "Thresholds set: minimum={} caution={}",
                            colors.minimum, colors.caution
                        );
                    }
                    _ => println!("Usage: colors <minimum> <caution>"),
                }
            }
            "reset" => {
                session.apply(Mutation::ResetAllMarks);
                println!("All marks removed.");
            }
            "export" => {
                let result = match parts.next() {
                    Some(path) => {
                        let path = PathBuf::from(path);
                        session.export_to(&path).map(|_| path)
                    }
                    None => session.export_to_dir(cfg.export_dir()),
                };
                match result {
                    Ok(path) => println!("Exported to {}", path.display()),
                    Err(e) => println!("Export failed: {}", e),
                }
            }
            "import" => match parts.next() {
                Some(path) => match session.import_file(path) {
                    Ok(state) => println!(
                        "Imported {} classes and {} marked days.",
                        state.classes.len(),
                        state.marks.len()
                    ),
                    Err(e) => println!("Import failed: {}", e),
                },
                None => println!("Usage: import <path>"),
            },
            "reload" => match session.reload() {
                Ok(_) => println!("Reloaded."),
                Err(e) => println!("Reload failed: {}", e),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let seed = load_seed(&cfg);
    let store = cfg.open_store().context("opening calendar store")?;
    let data_path = cfg.data_path()?;
    let mut session = Session::open_today(store, seed.as_ref())
        .with_context(|| format!("loading calendar from {}", data_path.display()))?;

    println!("Skiplan (CLI) - type 'help' for commands\n");
    println!("{}", render_overview(session.state()));

    run_repl(&mut session, &cfg);
    Ok(())
}
