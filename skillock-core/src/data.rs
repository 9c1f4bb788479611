use crate::error::{Result, SkillockError};
use crate::model::{QuestRecord, SkillLine};
use crate::registry::SkillRegistry;
use crate::report::{BreakdownFormat, breakdown_file_name, save_report};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SKILLS_FILE: &str = "skills.txt";
pub const QUESTS_FILE: &str = "quests.txt";
pub const BREAKDOWN_DIR: &str = "breakdown";

/// What to do with a line that does not follow the record layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort the whole load on the first bad line
    #[default]
    Strict,
    /// Log the bad line and keep going
    Skip,
}

fn parse_lines<T>(
    content: &str,
    policy: MalformedPolicy,
    parse: impl Fn(&str, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let mut parsed = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse(line, idx + 1) {
            Ok(record) => parsed.push(record),
            Err(e @ SkillockError::MalformedRecord { .. }) if policy == MalformedPolicy::Skip => {
                warn!("Skipping line: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(parsed)
}

pub fn parse_quest_file(content: &str, policy: MalformedPolicy) -> Result<Vec<QuestRecord>> {
    parse_lines(content, policy, QuestRecord::from_line)
}

pub fn parse_skill_file(content: &str, policy: MalformedPolicy) -> Result<Vec<SkillLine>> {
    parse_lines(content, policy, SkillLine::from_line)
}

pub fn serialize_quests(records: &[QuestRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{}\n", record))
        .collect()
}

pub fn serialize_skills(registry: &SkillRegistry) -> Result<String> {
    let mut output = String::new();
    for skill in registry.known_skills() {
        output.push_str(&registry.entry_line(skill)?);
        output.push('\n');
    }
    Ok(output)
}

/// Write one breakdown into `dir`, returning the file path
pub fn write_breakdown(
    dir: &Path,
    quest: &str,
    content: &str,
    format: BreakdownFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(breakdown_file_name(quest, format));
    save_report(content, &path)?;
    debug!("Wrote breakdown for {} to {}", quest, path.display());
    Ok(path)
}

/// Flat-file data directory holding the skill file, the quest file and breakdowns
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory layout. Existing record files are only emptied when `force` is set.
    pub fn init(root: impl Into<PathBuf>, force: bool) -> Result<Self> {
        let store = Self::new(root);
        fs::create_dir_all(store.breakdown_dir())?;

        for path in [store.skills_path(), store.quests_path()] {
            if force || !path.exists() {
                fs::write(&path, "")?;
                debug!("Created {}", path.display());
            }
        }

        info!("Initialized data directory at {}", store.root.display());
        Ok(store)
    }

    pub fn exists(root: &Path) -> bool {
        root.join(SKILLS_FILE).exists() && root.join(QUESTS_FILE).exists()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skills_path(&self) -> PathBuf {
        self.root.join(SKILLS_FILE)
    }

    pub fn quests_path(&self) -> PathBuf {
        self.root.join(QUESTS_FILE)
    }

    pub fn breakdown_dir(&self) -> PathBuf {
        self.root.join(BREAKDOWN_DIR)
    }

    pub fn load_quests(&self, policy: MalformedPolicy) -> Result<Vec<QuestRecord>> {
        let content = fs::read_to_string(self.quests_path())?;
        let records = parse_quest_file(&content, policy)?;
        info!("Loaded {} quest records", records.len());
        Ok(records)
    }

    pub fn load_skills(&self, policy: MalformedPolicy) -> Result<SkillRegistry> {
        let content = fs::read_to_string(self.skills_path())?;
        let registry = SkillRegistry::from_lines(parse_skill_file(&content, policy)?);
        info!("Loaded {} skills", registry.len());
        Ok(registry)
    }

    pub fn save_quests(&self, records: &[QuestRecord]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.quests_path(), serialize_quests(records))?;
        Ok(())
    }

    pub fn save_skills(&self, registry: &SkillRegistry) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.skills_path(), serialize_skills(registry)?)?;
        Ok(())
    }
}
