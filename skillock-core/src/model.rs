// Requirement records and their line-oriented persisted form

use crate::error::{Result, SkillockError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Skill name that is tracked as a single scalar instead of two slots
pub const QUEST_POINTS: &str = "Quest points";
/// Skill name that is tracked as a single scalar instead of two slots
pub const COMBAT_LEVEL: &str = "Combat level";

/// Marker appended to a level or quest name when a boosted stat satisfies the gate
pub const BOOSTABLE_MARKER: char = '*';

/// Returns true for the skill names aggregated as scalars
pub fn is_scalar_skill(skill: &str) -> bool {
    skill == QUEST_POINTS || skill == COMBAT_LEVEL
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: String,
    pub level: u32,
    pub boostable: bool,
}

impl SkillRequirement {
    pub fn new(skill: impl Into<String>, level: u32, boostable: bool) -> Self {
        Self {
            skill: skill.into(),
            level,
            boostable,
        }
    }

    /// Parse a `skillName-level[*]` entry of a quest line.
    ///
    /// The older `skillName*-level` placement is also read as boostable and is
    /// written back in the `level*` form.
    pub fn parse(entry: &str, line_no: usize) -> Result<Self> {
        let (skill, level) = entry.rsplit_once('-').ok_or_else(|| {
            SkillockError::malformed(line_no, format!("skill entry '{}' has no level", entry))
        })?;

        let (level, level_marked) = match level.strip_suffix(BOOSTABLE_MARKER) {
            Some(level) => (level, true),
            None => (level, false),
        };
        let (skill, skill_marked) = match skill.strip_suffix(BOOSTABLE_MARKER) {
            Some(skill) => (skill, true),
            None => (skill, false),
        };

        if skill.is_empty() {
            return Err(SkillockError::malformed(
                line_no,
                format!("skill entry '{}' has no skill name", entry),
            ));
        }
        let boostable = level_marked || skill_marked;

        Ok(Self {
            skill: skill.to_string(),
            level: parse_level(level, line_no)?,
            boostable,
        })
    }
}

impl fmt::Display for SkillRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.skill, self.level)?;
        if self.boostable {
            write!(f, "{}", BOOSTABLE_MARKER)?;
        }
        Ok(())
    }
}

/// Everything recorded for a single quest, independent of the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub name: String,
    pub prerequisites: BTreeSet<String>,
    pub skill_requirements: Vec<SkillRequirement>,
}

impl QuestRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prerequisites: BTreeSet::new(),
            skill_requirements: Vec::new(),
        }
    }

    pub fn with_prerequisite(mut self, quest: impl Into<String>) -> Self {
        self.prerequisites.insert(quest.into());
        self
    }

    pub fn with_requirement(mut self, skill: impl Into<String>, level: u32, boostable: bool) -> Self {
        self.skill_requirements
            .push(SkillRequirement::new(skill, level, boostable));
        self
    }

    /// Parse a quest file line: `questName:prereq1,prereq2:skillName-level[*],...`
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.splitn(3, ':');
        let (Some(name), Some(prerequisites), Some(skills)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(SkillockError::malformed(
                line_no,
                "expected three ':'-separated fields",
            ));
        };

        if name.is_empty() {
            return Err(SkillockError::malformed(line_no, "quest name is empty"));
        }

        let prerequisites = prerequisites
            .split(',')
            .filter(|quest| !quest.is_empty())
            .map(str::to_string)
            .collect();

        let skill_requirements = skills
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(|entry| SkillRequirement::parse(entry, line_no))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            prerequisites,
            skill_requirements,
        })
    }
}

impl fmt::Display for QuestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prerequisites: Vec<&str> = self.prerequisites.iter().map(String::as_str).collect();
        let skills: Vec<String> = self
            .skill_requirements
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(
            f,
            "{}:{}:{}",
            self.name,
            prerequisites.join(","),
            skills.join(",")
        )
    }
}

/// One quest's requirement for a skill, as listed in the skill file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub quest: String,
    pub level: u32,
    pub boostable: bool,
}

impl SkillEntry {
    /// Parse a `level-questName[*]` entry of a skill line
    pub fn parse(entry: &str, line_no: usize) -> Result<Self> {
        let (level, quest) = entry.split_once('-').ok_or_else(|| {
            SkillockError::malformed(line_no, format!("skill entry '{}' has no quest", entry))
        })?;

        let (quest, boostable) = match quest.strip_suffix(BOOSTABLE_MARKER) {
            Some(quest) => (quest, true),
            None => (quest, false),
        };

        if quest.is_empty() {
            return Err(SkillockError::malformed(
                line_no,
                format!("skill entry '{}' has no quest name", entry),
            ));
        }

        Ok(Self {
            quest: quest.to_string(),
            level: parse_level(level, line_no)?,
            boostable,
        })
    }
}

impl fmt::Display for SkillEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.level, self.quest)?;
        if self.boostable {
            write!(f, "{}", BOOSTABLE_MARKER)?;
        }
        Ok(())
    }
}

/// A whole skill file line: `skillName:level-questName[*],...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLine {
    pub skill: String,
    pub entries: Vec<SkillEntry>,
}

impl SkillLine {
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let (skill, entries) = line
            .split_once(':')
            .ok_or_else(|| SkillockError::malformed(line_no, "missing ':' after skill name"))?;

        if skill.is_empty() {
            return Err(SkillockError::malformed(line_no, "skill name is empty"));
        }

        let entries = entries
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(|entry| SkillEntry::parse(entry, line_no))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skill: skill.to_string(),
            entries,
        })
    }
}

impl fmt::Display for SkillLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        write!(f, "{}:{}", self.skill, entries.join(","))
    }
}

fn parse_level(level: &str, line_no: usize) -> Result<u32> {
    level
        .parse::<u32>()
        .map_err(|_| SkillockError::malformed(line_no, format!("invalid level '{}'", level)))
}
