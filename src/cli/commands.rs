use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use std::path::PathBuf;
use std::str::FromStr;

use crate::actions::{ActionExecutor, LogExecutor, RecordingExecutor};
use crate::conditions::{
    EntryList, EvalContext, IfActions, ListKind, PatternMatcher, RegexMatcher,
};
use crate::config::{self, ConfigFile};
use crate::expression::parse_expr;
use crate::subject::{format_value, Snapshot, Subject};

use super::exit_codes;
use super::output::{
    self, CheckData, CycleData, EntryData, OutputMode, ReplayData, SectionsData, ThresholdData,
};

#[derive(Parser)]
#[command(name = "ifactions")]
#[command(about = "Evaluate edge-triggered if-actions against a sequence of values")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides IFACTIONS_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log evaluation details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Feed a sequence of values to one section and print the actions that fire
    Replay {
        /// Section whose options configure the subject
        #[arg(short, long)]
        section: String,

        /// Value of another subject referenced by conditions (repeatable)
        #[arg(long = "with", value_name = "NAME=VALUE")]
        others: Vec<String>,

        /// Steps: VALUE, VALUE:TEXT, reset, or reset:VALUE
        #[arg(required = true, allow_hyphen_values = true)]
        steps: Vec<String>,
    },

    /// Validate the conditions and patterns of a section
    Check {
        /// Section to validate
        #[arg(short, long)]
        section: String,
    },

    /// List the sections of the config file
    Sections,
}

/// one replay step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// new value, with optional text replacing the formatted value
    Update { value: f64, text: Option<String> },
    /// reset the subject to a value outside an update
    Reset(f64),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (head, tail) = match s.split_once(':') {
            Some((head, tail)) => (head, Some(tail)),
            None => (s, None),
        };

        if head.eq_ignore_ascii_case("reset") {
            let value = match tail {
                Some(v) => parse_number(v)?,
                None => 0.0,
            };
            return Ok(Step::Reset(value));
        }

        Ok(Step::Update {
            value: parse_number(head)?,
            text: tail.map(str::to_string),
        })
    }
}

fn parse_number(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| anyhow!("invalid value '{}'", s))
}

/// parse a `NAME=VALUE` pair for `--with`
fn parse_other(s: &str) -> Result<(String, f64)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("expected NAME=VALUE, got '{}'", s));
    }
    Ok((name.to_string(), parse_number(value)?))
}

type ReplayArgs = (Vec<Step>, Vec<(String, f64)>);

fn parse_replay_args(steps: &[String], others: &[String]) -> Result<ReplayArgs> {
    let steps = steps
        .iter()
        .map(|s| s.parse::<Step>())
        .collect::<Result<Vec<_>>>()?;
    let others = others
        .iter()
        .map(|s| parse_other(s))
        .collect::<Result<Vec<_>>>()?;
    Ok((steps, others))
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Replay {
            section,
            others,
            steps,
        } => {
            let (steps, others) = match parse_replay_args(&steps, &others) {
                Ok(parsed) => parsed,
                Err(e) => fail(output_mode, exit_codes::INVALID_ARGS, &e.to_string()),
            };

            let config = load_section(config_path, &section, output_mode);
            let data = replay(&config, &section, &steps, &others);

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                print_replay(&data);
            }
            Ok(())
        }

        Commands::Check { section } => {
            let config = load_section(config_path, &section, output_mode);
            let data = check(&config, &section);

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                print_check(&data);
            }

            if !data.ok {
                std::process::exit(exit_codes::CHECK_FAILED);
            }
            Ok(())
        }

        Commands::Sections => {
            let config = match config::load(config_path) {
                Ok(c) => c,
                Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &e.to_string()),
            };
            let data = SectionsData {
                sections: config
                    .section_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };

            if output_mode.is_json() {
                output::print_json(&data);
            } else if !output_mode.is_quiet() {
                for name in &data.sections {
                    println!("{}", name);
                }
            }
            Ok(())
        }
    }
}

/// report an error in the active output mode and exit
fn fail(output_mode: OutputMode, code: i32, message: &str) -> ! {
    if output_mode.is_json() {
        output::print_json_error(code, message);
    } else {
        eprintln!("Error: {}", message);
    }
    std::process::exit(code);
}

fn load_section(
    config_path: Option<&std::path::Path>,
    section: &str,
    output_mode: OutputMode,
) -> ConfigFile {
    let config = match config::load(config_path).context("failed to load configuration") {
        Ok(c) => c,
        Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e)),
    };

    if !config.has_section(section) {
        fail(
            output_mode,
            exit_codes::CONFIG_ERROR,
            &format!("section '{}' not found in config", section),
        );
    }
    config
}

/// run every step against a fresh subject configured from `section`
pub fn replay(
    config: &ConfigFile,
    section: &str,
    steps: &[Step],
    others: &[(String, f64)],
) -> ReplayData {
    let mut actions = IfActions::new();
    actions.read_options(config, section);

    let mut subject = Snapshot::new(section).with_window(section);
    for (name, value) in others {
        subject = subject.with_other(name.clone(), *value);
    }

    let mut cycles = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let cycle = match step {
            Step::Update { value, text } => {
                subject.set_value(*value);
                if let Some(text) = text {
                    subject.set_text(text.clone());
                }

                // record for the report; also visible at info level with -v
                let mut recorder = RecordingExecutor::new();
                let mut exec = |action: &str, window: &str| {
                    ActionExecutor::<str>::execute(&mut LogExecutor, action, window);
                    ActionExecutor::<str>::execute(&mut recorder, action, window);
                };
                let report = actions.evaluate(&subject, &mut EvalContext::<str>::new(&mut exec));
                log::debug!(
                    "[{}] cycle {}: {} action(s) executed",
                    section,
                    i + 1,
                    report.fired
                );

                CycleData {
                    cycle: i + 1,
                    kind: "update",
                    value: *value,
                    text: subject.current_text().into_owned(),
                    fired: recorder.drain(),
                    diagnostics: report.diagnostics.iter().map(|d| d.to_string()).collect(),
                }
            }
            Step::Reset(value) => {
                subject.set_value(*value);
                actions.set_state(*value);

                CycleData {
                    cycle: i + 1,
                    kind: "reset",
                    value: *value,
                    text: format_value(*value),
                    fired: Vec::new(),
                    diagnostics: Vec::new(),
                }
            }
        };
        cycles.push(cycle);
    }

    ReplayData {
        section: section.to_string(),
        cycles,
    }
}

/// parse every condition and compile every pattern of `section`
pub fn check(config: &ConfigFile, section: &str) -> CheckData {
    let mut actions = IfActions::new();
    actions.read_options(config, section);

    let mut thresholds = Vec::new();
    let t = &actions.thresholds;
    if !t.equal.action.is_empty() {
        thresholds.push(ThresholdData {
            option: "IfEqual",
            value: t.equal.value as f64,
            action: t.equal.action.clone(),
        });
    }
    if !t.above.action.is_empty() {
        thresholds.push(ThresholdData {
            option: "IfAbove",
            value: t.above.value,
            action: t.above.action.clone(),
        });
    }
    if !t.below.action.is_empty() {
        thresholds.push(ThresholdData {
            option: "IfBelow",
            value: t.below.value,
            action: t.below.action.clone(),
        });
    }

    let conditions = check_list(&actions.conditions, |source| {
        parse_expr(source).map(|_| ()).map_err(|e| e.to_string())
    });
    let matches = check_list(&actions.matches, |source| {
        RegexMatcher
            .compile(source)
            .map(|_| ())
            .map_err(|e| e.to_string())
    });

    let ok = conditions.iter().chain(&matches).all(|e| e.error.is_none());

    CheckData {
        section: section.to_string(),
        ok,
        thresholds,
        condition_mode: actions.conditions.level_triggered,
        conditions,
        match_mode: actions.matches.level_triggered,
        matches,
    }
}

fn check_list(
    list: &EntryList,
    validate: impl Fn(&str) -> std::result::Result<(), String>,
) -> Vec<EntryData> {
    list.iter()
        .enumerate()
        .map(|(i, entry)| EntryData {
            key: ListKind::numbered(list.kind.source_key(), i + 1),
            source: entry.source.clone(),
            true_action: entry.true_action.clone(),
            false_action: entry.false_action.clone(),
            error: validate(&entry.source).err(),
        })
        .collect()
}

fn print_replay(data: &ReplayData) {
    for cycle in &data.cycles {
        match cycle.kind {
            "reset" => println!("{:>3}  reset {}", cycle.cycle, cycle.text),
            _ => {
                let fired = if cycle.fired.is_empty() {
                    "(none)".to_string()
                } else {
                    cycle.fired.join(", ")
                };
                println!("{:>3}  {:<12} {}", cycle.cycle, cycle.text, fired);
            }
        }
        for diagnostic in &cycle.diagnostics {
            println!("     error: {}", diagnostic);
        }
    }
}

fn print_check(data: &CheckData) {
    println!("[{}]", data.section);

    for t in &data.thresholds {
        println!("  {}Value={} -> {}", t.option, format_value(t.value), t.action);
    }

    for (name, level, entries) in [
        ("IfConditionMode", data.condition_mode, &data.conditions),
        ("IfMatchMode", data.match_mode, &data.matches),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!("  {}={}", name, if level { 1 } else { 0 });
        for entry in entries {
            match &entry.error {
                Some(e) => println!("  {}={}  ERROR: {}", entry.key, entry.source, e),
                None => println!("  {}={}  ok", entry.key, entry.source),
            }
        }
    }

    if data.ok {
        println!("OK");
    } else {
        println!("FAILED");
    }
}
