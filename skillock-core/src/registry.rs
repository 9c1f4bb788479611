// Per-skill index of quest requirements, in first-seen order

use crate::error::{Result, SkillockError};
use crate::model::{QuestRecord, SkillEntry, SkillLine};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    order: Vec<String>,
    entries: HashMap<String, Vec<SkillEntry>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every skill requirement of the given quest records
    pub fn from_records(records: &[QuestRecord]) -> Self {
        let mut registry = Self::new();
        for record in records {
            for requirement in &record.skill_requirements {
                registry.register(
                    &requirement.skill,
                    SkillEntry {
                        quest: record.name.clone(),
                        level: requirement.level,
                        boostable: requirement.boostable,
                    },
                );
            }
        }
        registry
    }

    pub fn from_lines(lines: Vec<SkillLine>) -> Self {
        let mut registry = Self::new();
        for line in lines {
            registry.ensure_skill(&line.skill);
            for entry in line.entries {
                registry.register(&line.skill, entry);
            }
        }
        registry
    }

    pub fn register(&mut self, skill: &str, entry: SkillEntry) {
        self.ensure_skill(skill);
        if let Some(entries) = self.entries.get_mut(skill) {
            entries.push(entry);
        }
    }

    fn ensure_skill(&mut self, skill: &str) {
        if !self.entries.contains_key(skill) {
            self.order.push(skill.to_string());
            self.entries.insert(skill.to_string(), Vec::new());
        }
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.entries.contains_key(skill)
    }

    /// Skill names in registration order
    pub fn known_skills(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, skill: &str) -> Result<&[SkillEntry]> {
        self.entries
            .get(skill)
            .map(Vec::as_slice)
            .ok_or_else(|| SkillockError::UnknownSkill(skill.to_string()))
    }

    /// Render the skill file line for `skill`
    pub fn entry_line(&self, skill: &str) -> Result<String> {
        let entries = self.get(skill)?;
        Ok(SkillLine {
            skill: skill.to_string(),
            entries: entries.to_vec(),
        }
        .to_string())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
