// Tests for breakdown rendering

use skillock_core::report::{
    BreakdownFormat, breakdown_file_name, format_breakdown, format_record_summary,
    generate_json_breakdown, render_breakdown,
};
use skillock_core::{QuestRecord, RequirementProfile, SkillLevels};

fn sample_profile() -> RequirementProfile {
    let mut profile = RequirementProfile::new(&["Attack", "Magic", "Strength", "Cooking"]);
    profile.required_quests.insert("Rune Mysteries".to_string());
    profile.required_quests.insert("Lost City".to_string());
    profile.skill_levels.insert(
        "Attack".to_string(),
        SkillLevels {
            unboosted: 50,
            boosted: 40,
        },
    );
    profile.skill_levels.insert(
        "Magic".to_string(),
        SkillLevels {
            unboosted: 0,
            boosted: 33,
        },
    );
    profile.skill_levels.insert(
        "Strength".to_string(),
        SkillLevels {
            unboosted: 60,
            boosted: 0,
        },
    );
    profile.combat_level = 40;
    profile.quest_points = 12;
    profile
}

// ============================================================================
// Breakdown Format Tests
// ============================================================================

#[test]
fn test_breakdown_format_from_str() {
    assert!(matches!(
        BreakdownFormat::from_str("text"),
        Some(BreakdownFormat::Text)
    ));
    assert!(matches!(
        BreakdownFormat::from_str("txt"),
        Some(BreakdownFormat::Text)
    ));
    assert!(matches!(
        BreakdownFormat::from_str("JSON"),
        Some(BreakdownFormat::Json)
    ));
}

#[test]
fn test_breakdown_format_from_str_invalid() {
    assert!(BreakdownFormat::from_str("csv").is_none());
    assert!(BreakdownFormat::from_str("").is_none());
}

#[test]
fn test_breakdown_format_extension() {
    assert_eq!(BreakdownFormat::Text.extension(), "txt");
    assert_eq!(BreakdownFormat::Json.extension(), "json");
}

// ============================================================================
// Text Breakdown Tests
// ============================================================================

#[test]
fn test_format_breakdown_baseline() {
    let text = format_breakdown(&RequirementProfile::default());
    assert_eq!(
        text,
        "Quest requirements\n\nSkill requirements (unboosted/boosted)"
    );
}

#[test]
fn test_format_breakdown_full() {
    let text = format_breakdown(&sample_profile());
    assert_eq!(
        text,
        "Quest requirements\n\
         Lost City\n\
         Rune Mysteries\n\
         \n\
         Skill requirements (unboosted/boosted)\n\
         Attack: 50/40\n\
         Magic: */33\n\
         Strength: 60/*\n\
         Combat level: 40\n\
         Quest points: 12"
    );
}

#[test]
fn test_format_breakdown_hides_zero_skills() {
    let text = format_breakdown(&sample_profile());
    assert!(!text.contains("Cooking"));
}

#[test]
fn test_format_breakdown_hides_baseline_scalars() {
    let mut profile = sample_profile();
    profile.combat_level = 3;
    profile.quest_points = 0;

    let text = format_breakdown(&profile);
    assert!(!text.contains("Combat level"));
    assert!(!text.contains("Quest points"));
}

// ============================================================================
// JSON Breakdown Tests
// ============================================================================

#[test]
fn test_generate_json_breakdown() {
    let json = generate_json_breakdown("Dragon Slayer I", &sample_profile()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let breakdown = &value["breakdown"];

    assert_eq!(breakdown["quest"], "Dragon Slayer I");
    assert_eq!(breakdown["metadata"]["generator"], "Skillock");
    assert_eq!(breakdown["combat_level"], 40);
    assert_eq!(breakdown["quest_points"], 12);
    assert_eq!(
        breakdown["required_quests"],
        serde_json::json!(["Lost City", "Rune Mysteries"])
    );

    let skills = breakdown["skills"].as_array().unwrap();
    assert_eq!(skills.len(), 3);
    assert_eq!(skills[1]["skill"], "Magic");
    assert!(skills[1]["unboosted"].is_null());
    assert_eq!(skills[1]["boosted"], 33);
}

#[test]
fn test_generate_json_breakdown_baseline() {
    let json = generate_json_breakdown("Cook's Assistant", &RequirementProfile::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["breakdown"]["combat_level"].is_null());
    assert!(value["breakdown"]["quest_points"].is_null());
    assert_eq!(value["breakdown"]["skills"], serde_json::json!([]));
}

#[test]
fn test_render_breakdown_dispatches_on_format() {
    let profile = sample_profile();

    let text = render_breakdown("Dragon Slayer I", &profile, BreakdownFormat::Text).unwrap();
    assert_eq!(text, format_breakdown(&profile));

    let json = render_breakdown("Dragon Slayer I", &profile, BreakdownFormat::Json).unwrap();
    assert!(json.trim_start().starts_with('{'));
}

// ============================================================================
// Record Summary Tests
// ============================================================================

#[test]
fn test_format_record_summary_empty() {
    let summary = format_record_summary(&QuestRecord::new("Cook's Assistant"));
    assert_eq!(
        summary,
        "***Cook's Assistant***\nQuest requirements:\n\tNone\n\nSkill requirements:\n\tNone\n"
    );
}

#[test]
fn test_format_record_summary_full() {
    let record = QuestRecord::new("Dragon Slayer I")
        .with_prerequisite("Rune Mysteries")
        .with_requirement("Attack", 40, true)
        .with_requirement("Quest points", 32, false);

    assert_eq!(
        format_record_summary(&record),
        "***Dragon Slayer I***\n\
         Quest requirements:\n\
         \tRune Mysteries\n\
         \n\
         Skill requirements:\n\
         \tAttack - 40 (boostable)\n\
         \tQuest points - 32\n"
    );
}

// ============================================================================
// File Naming Tests
// ============================================================================

#[test]
fn test_breakdown_file_name() {
    assert_eq!(
        breakdown_file_name("Dragon Slayer I", BreakdownFormat::Text),
        "Dragon Slayer I.txt"
    );
    assert_eq!(
        breakdown_file_name("Recipe for Disaster/Freeing King Awowogei", BreakdownFormat::Json),
        "Recipe for Disaster_Freeing King Awowogei.json"
    );
}
