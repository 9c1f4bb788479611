use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use skillock_core::data::{DataStore, MalformedPolicy, write_breakdown};
use skillock_core::report::{BreakdownFormat, format_record_summary, render_breakdown};
use skillock_core::{Aggregator, QuestGraph, QuestRecord, SkillRegistry, SkillockError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything loaded from a data directory, with the graph already built
pub struct Dataset {
    pub records: Vec<QuestRecord>,
    pub skills: SkillRegistry,
    pub graph: QuestGraph,
}

pub struct BreakdownOptions {
    pub quests: Vec<String>,
    pub format: BreakdownFormat,
    pub output_dir: PathBuf,
    pub to_stdout: bool,
}

#[derive(Debug, Default)]
pub struct BreakdownOutcome {
    pub written: Vec<PathBuf>,
    pub rendered: Vec<(String, String)>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub quests: usize,
    pub skills: usize,
    pub round_trip_failures: Vec<String>,
    pub unregistered_skills: BTreeSet<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.round_trip_failures.is_empty() && self.unregistered_skills.is_empty()
    }
}

// Helper functions shared by the handlers

/// Expand `~` in a data directory argument
pub fn resolve_data_dir(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Directory `init` creates: its own PATH argument wins over `--data-dir`
pub fn init_target(path: Option<&str>, data_dir: &str) -> PathBuf {
    resolve_data_dir(path.unwrap_or(data_dir))
}

pub fn malformed_policy(skip_malformed: bool) -> MalformedPolicy {
    if skip_malformed {
        MalformedPolicy::Skip
    } else {
        MalformedPolicy::Strict
    }
}

/// Load the record files and build the quest graph once
pub fn load_dataset(store: &DataStore, policy: MalformedPolicy) -> anyhow::Result<Dataset> {
    let records = store.load_quests(policy).with_context(|| {
        format!(
            "Failed to load quest file {}",
            store.quests_path().display()
        )
    })?;

    let skills = if store.skills_path().exists() {
        store.load_skills(policy).with_context(|| {
            format!(
                "Failed to load skill file {}",
                store.skills_path().display()
            )
        })?
    } else {
        warn!(
            "No skill file at {}, deriving skills from quest records",
            store.skills_path().display()
        );
        SkillRegistry::from_records(&records)
    };

    let graph = QuestGraph::build(records.iter().cloned());

    Ok(Dataset {
        records,
        skills,
        graph,
    })
}

/// Aggregate and render every requested quest.
///
/// Unknown targets are collected in `skipped` and the run carries on.
pub fn run_breakdowns(
    dataset: &Dataset,
    options: &BreakdownOptions,
    progress: Option<&ProgressBar>,
) -> anyhow::Result<BreakdownOutcome> {
    let targets: Vec<String> = if options.quests.is_empty() {
        dataset
            .graph
            .quest_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        options.quests.clone()
    };

    if let Some(pb) = progress {
        pb.set_length(targets.len() as u64);
    }

    let mut aggregator = Aggregator::new(&dataset.graph, dataset.skills.known_skills());
    let mut outcome = BreakdownOutcome::default();

    for quest in targets {
        if let Some(pb) = progress {
            pb.set_message(format!("Analyzing {}", quest));
        }

        let profile = match aggregator.aggregate_quest(&quest) {
            Ok(profile) => profile,
            Err(SkillockError::TargetNotFound(name)) => {
                warn!("Aborted breakdown: {} is not in the quest graph", name);
                outcome.skipped.push(name);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let content = render_breakdown(&quest, &profile, options.format)
            .with_context(|| format!("Failed to render breakdown for {}", quest))?;

        if options.to_stdout {
            outcome.rendered.push((quest, content));
        } else {
            let path = write_breakdown(&options.output_dir, &quest, &content, options.format)
                .with_context(|| format!("Failed to write breakdown for {}", quest))?;
            outcome.written.push(path);
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    info!(
        "Breakdown complete: {} analyzed, {} skipped",
        outcome.written.len() + outcome.rendered.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// The per-record summary for `quest`, without inherited requirements
pub fn record_summary(dataset: &Dataset, quest: &str) -> anyhow::Result<String> {
    let Some(node) = dataset.graph.get(quest) else {
        return Err(SkillockError::TargetNotFound(quest.to_string()).into());
    };
    match &dataset.graph.node(node).data {
        Some(record) => Ok(format_record_summary(record)),
        None => bail!("{} is only referenced as a prerequisite and has no record", quest),
    }
}

/// Load both files and check every quest record survives a serialize/parse cycle
pub fn verify_dataset(store: &DataStore, policy: MalformedPolicy) -> anyhow::Result<VerifyReport> {
    let dataset = load_dataset(store, policy)?;
    let mut report = VerifyReport {
        quests: dataset.records.len(),
        skills: dataset.skills.len(),
        ..VerifyReport::default()
    };

    for (idx, record) in dataset.records.iter().enumerate() {
        match QuestRecord::from_line(&record.to_string(), idx + 1) {
            Ok(reparsed) if &reparsed == record => {}
            _ => report.round_trip_failures.push(record.name.clone()),
        }

        for requirement in &record.skill_requirements {
            if !dataset.skills.contains(&requirement.skill) {
                report
                    .unregistered_skills
                    .insert(requirement.skill.clone());
            }
        }
    }

    Ok(report)
}

/// Write normalized skill and quest files derived from the quest records
pub fn export_dataset(dataset: &Dataset, output_dir: &Path) -> anyhow::Result<DataStore> {
    let store = DataStore::new(output_dir);
    let skills = SkillRegistry::from_records(&dataset.records);

    store
        .save_skills(&skills)
        .with_context(|| format!("Failed to write {}", store.skills_path().display()))?;
    store
        .save_quests(&dataset.records)
        .with_context(|| format!("Failed to write {}", store.quests_path().display()))?;

    Ok(store)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn print_banner() {
    print_divider();
    println!(
        "{}",
        format!("  SKILLOCK v{}", env!("CARGO_PKG_VERSION"))
            .bright_white()
            .bold()
    );
    println!("  Quest and skill requirement breakdowns");
    print_divider();
    println!();
}

fn data_store(args: &ArgMatches) -> DataStore {
    let data_dir = args
        .get_one::<String>("data-dir")
        .map(String::as_str)
        .unwrap_or("~/.config/skillock/");
    DataStore::new(resolve_data_dir(data_dir))
}

fn exit_with_error(e: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), e);
    std::process::exit(1);
}

pub fn handle_init(args: &ArgMatches) {
    let force = args.get_flag("force");
    let data_dir = args
        .get_one::<String>("data-dir")
        .map(String::as_str)
        .unwrap_or("~/.config/skillock/");
    let root = init_target(args.get_one::<String>("PATH").map(String::as_str), data_dir);
    let existed = DataStore::exists(&root);

    println!(
        "{} Target: {}",
        "→".blue(),
        root.display().to_string().bright_white()
    );

    if existed && !force {
        println!(
            "{} Existing skill and quest files are kept (use --force to empty them)",
            "⚠".yellow().bold()
        );
    }

    let store = match DataStore::init(&root, force) {
        Ok(store) => store,
        Err(e) => exit_with_error(anyhow::Error::new(e).context("Failed to initialize data directory")),
    };

    println!(
        "  {} {}",
        "✓".green(),
        store.skills_path().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "✓".green(),
        store.quests_path().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "✓".green(),
        store.breakdown_dir().display().to_string().bright_white()
    );
    println!();
    println!("{} Initialization complete", "✓".green().bold());
}

pub fn handle_breakdown(args: &ArgMatches) {
    let store = data_store(args);
    let policy = malformed_policy(args.get_flag("skip-malformed"));
    let to_stdout = args.get_flag("stdout");
    let quiet = args.get_flag("quiet");
    let format = args
        .get_one::<String>("format")
        .and_then(|f| BreakdownFormat::from_str(f))
        .unwrap_or(BreakdownFormat::Text);
    let output_dir = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| store.breakdown_dir());
    let quests: Vec<String> = args
        .get_many::<String>("QUEST")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let dataset = load_dataset(&store, policy).unwrap_or_else(|e| exit_with_error(e));

    let options = BreakdownOptions {
        quests,
        format,
        output_dir,
        to_stdout,
    };

    let progress = if to_stdout || quiet {
        None
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    };

    let outcome = run_breakdowns(&dataset, &options, progress.as_ref())
        .unwrap_or_else(|e| exit_with_error(e));

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    for (quest, content) in &outcome.rendered {
        if !quiet {
            println!("{}", format!("── {} ──", quest).bright_blue().bold());
        }
        println!("{}", content);
        println!();
    }

    for quest in &outcome.skipped {
        eprintln!("{} {}: Aborted (not in quest graph)", "⚠".yellow().bold(), quest);
    }

    if !to_stdout && !quiet {
        println!(
            "{} Breakdown complete: {} written to {}",
            "✓".green().bold(),
            outcome.written.len().to_string().cyan(),
            options.output_dir.display().to_string().bright_white()
        );
    }
}

pub fn handle_show(args: &ArgMatches) {
    let store = data_store(args);
    let Some(quest) = args.get_one::<String>("QUEST") else {
        exit_with_error(anyhow::anyhow!("A quest name is required"));
    };

    let dataset = load_dataset(&store, MalformedPolicy::Strict).unwrap_or_else(|e| exit_with_error(e));
    match record_summary(&dataset, quest) {
        Ok(summary) => print!("{}", summary),
        Err(e) => exit_with_error(e),
    }
}

pub fn handle_verify(args: &ArgMatches) {
    let store = data_store(args);
    let policy = malformed_policy(args.get_flag("skip-malformed"));

    let report = verify_dataset(&store, policy).unwrap_or_else(|e| exit_with_error(e));

    println!(
        "{} Loaded {} quests and {} skills",
        "✓".green().bold(),
        report.quests.to_string().cyan(),
        report.skills.to_string().cyan()
    );

    for quest in &report.round_trip_failures {
        println!("  {} {} does not survive a save/load cycle", "✗".red(), quest);
    }
    for skill in &report.unregistered_skills {
        println!("  {} {} is required by a quest but missing from the skill file", "⚠".yellow(), skill);
    }

    if report.is_clean() {
        println!("{} Data files are consistent", "✓".green().bold());
    } else {
        std::process::exit(1);
    }
}

pub fn handle_export(args: &ArgMatches) {
    let store = data_store(args);
    let Some(output_dir) = args.get_one::<PathBuf>("output") else {
        exit_with_error(anyhow::anyhow!("An output directory is required"));
    };

    let dataset = load_dataset(&store, MalformedPolicy::Strict).unwrap_or_else(|e| exit_with_error(e));
    let exported = export_dataset(&dataset, output_dir).unwrap_or_else(|e| exit_with_error(e));

    println!(
        "{} Wrote {}",
        "✓".green().bold(),
        exported.skills_path().display().to_string().bright_white()
    );
    println!(
        "{} Wrote {}",
        "✓".green().bold(),
        exported.quests_path().display().to_string().bright_white()
    );
}
