// Breakdown rendering for aggregated profiles and single records

use crate::aggregate::{BASE_COMBAT_LEVEL, RequirementProfile};
use crate::model::{COMBAT_LEVEL, QUEST_POINTS, QuestRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Stand-in for a slot with no requirement
pub const NO_REQUIREMENT: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakdownFormat {
    Text,
    Json,
}

impl BreakdownFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(BreakdownFormat::Text),
            "json" => Some(BreakdownFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            BreakdownFormat::Text => "txt",
            BreakdownFormat::Json => "json",
        }
    }
}

/// Render the breakdown text layout for one quest.
///
/// Scalars are only listed when they exceed their baseline.
pub fn format_breakdown(profile: &RequirementProfile) -> String {
    let mut lines: Vec<String> = vec!["Quest requirements".to_string()];
    lines.extend(profile.required_quests.iter().cloned());
    lines.push(String::new());

    lines.push("Skill requirements (unboosted/boosted)".to_string());
    for (skill, levels) in profile.required_skills() {
        lines.push(format!(
            "{}: {}/{}",
            skill,
            slot_or_marker(levels.unboosted),
            slot_or_marker(levels.boosted)
        ));
    }

    if profile.combat_level > BASE_COMBAT_LEVEL {
        lines.push(format!("{}: {}", COMBAT_LEVEL, profile.combat_level));
    }
    if profile.quest_points > 0 {
        lines.push(format!("{}: {}", QUEST_POINTS, profile.quest_points));
    }

    lines.join("\n")
}

fn slot_or_marker(level: u32) -> String {
    if level > 0 {
        level.to_string()
    } else {
        NO_REQUIREMENT.to_string()
    }
}

pub fn generate_json_breakdown(
    quest: &str,
    profile: &RequirementProfile,
) -> Result<String, serde_json::Error> {
    let skills: Vec<serde_json::Value> = profile
        .required_skills()
        .map(|(skill, levels)| {
            serde_json::json!({
                "skill": skill,
                "unboosted": (levels.unboosted > 0).then_some(levels.unboosted),
                "boosted": (levels.boosted > 0).then_some(levels.boosted),
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "breakdown": {
            "metadata": {
                "generator": "Skillock",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "quest": quest,
            "required_quests": profile.required_quests,
            "skills": skills,
            "combat_level": (profile.combat_level > BASE_COMBAT_LEVEL).then_some(profile.combat_level),
            "quest_points": (profile.quest_points > 0).then_some(profile.quest_points)
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn render_breakdown(
    quest: &str,
    profile: &RequirementProfile,
    format: BreakdownFormat,
) -> Result<String, serde_json::Error> {
    match format {
        BreakdownFormat::Text => Ok(format_breakdown(profile)),
        BreakdownFormat::Json => generate_json_breakdown(quest, profile),
    }
}

/// Summary of a record on its own, without anything inherited from ancestors
pub fn format_record_summary(record: &QuestRecord) -> String {
    let mut output = vec![
        format!("***{}***", record.name),
        "Quest requirements:".to_string(),
    ];
    if record.prerequisites.is_empty() {
        output.push("\tNone".to_string());
    } else {
        for quest in &record.prerequisites {
            output.push(format!("\t{}", quest));
        }
    }

    output.push(String::new());
    output.push("Skill requirements:".to_string());
    if record.skill_requirements.is_empty() {
        output.push("\tNone".to_string());
    } else {
        for requirement in &record.skill_requirements {
            output.push(format!(
                "\t{} - {}{}",
                requirement.skill,
                requirement.level,
                if requirement.boostable { " (boostable)" } else { "" }
            ));
        }
    }

    let mut summary = output.join("\n");
    summary.push('\n');
    summary
}

/// File name a quest's breakdown is stored under
pub fn breakdown_file_name(quest: &str, format: BreakdownFormat) -> String {
    let stem: String = quest
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.{}", stem, format.extension())
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
