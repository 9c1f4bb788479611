// Tests for quest graph construction

use skillock_core::graph::{QuestGraph, ROOT_KEY};
use skillock_core::{QuestRecord, SkillockError};
use std::collections::BTreeSet;

fn sample_records() -> Vec<QuestRecord> {
    vec![
        QuestRecord::new("Druidic Ritual").with_requirement("Herblore", 3, false),
        QuestRecord::new("Lost City")
            .with_prerequisite("Druidic Ritual")
            .with_requirement("Crafting", 31, false),
        QuestRecord::new("Fairytale I - Growing Pains")
            .with_prerequisite("Lost City")
            .with_prerequisite("Nature Spirit"),
        QuestRecord::new("Priest in Peril"),
    ]
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_new_graph_has_only_root() {
    let graph = QuestGraph::new();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.all_nodes(), vec![graph.root()]);
    assert_eq!(graph.node(graph.root()).key, ROOT_KEY);
    assert!(graph.node(graph.root()).data.is_none());
}

#[test]
fn test_get_or_create_returns_existing_node() {
    let mut graph = QuestGraph::new();

    let first = graph.get_or_create("Cook's Assistant");
    let second = graph.get_or_create("Cook's Assistant");

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 2);
    assert!(graph.node(first).is_placeholder());
}

#[test]
fn test_add_edge_is_idempotent() {
    let mut graph = QuestGraph::new();
    let parent = graph.get_or_create("Rune Mysteries");
    let child = graph.get_or_create("Dragon Slayer I");

    graph.add_edge(parent, child);
    graph.add_edge(parent, child);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.parents(child).collect::<Vec<_>>(), vec![parent]);
    assert_eq!(graph.children(parent).collect::<Vec<_>>(), vec![child]);
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_build_attaches_free_quests_to_root() {
    let graph = QuestGraph::build(sample_records());
    let root = graph.root();

    let children: BTreeSet<&str> = graph
        .children(root)
        .map(|node| graph.node(node).key.as_str())
        .collect();

    assert_eq!(
        children,
        BTreeSet::from(["Druidic Ritual", "Priest in Peril"])
    );
    assert_eq!(graph.parents(root).count(), 0);
}

#[test]
fn test_build_creates_placeholder_for_unrecorded_prerequisite() {
    let graph = QuestGraph::build(sample_records());

    let placeholder = graph.get("Nature Spirit").unwrap();
    assert!(graph.node(placeholder).is_placeholder());
    assert_eq!(graph.parents(placeholder).count(), 0);
    assert_eq!(graph.placeholder_count(), 1);

    let edges = graph.edge_set();
    assert!(edges.contains(&(
        "Nature Spirit".to_string(),
        "Fairytale I - Growing Pains".to_string()
    )));
}

#[test]
fn test_build_attaches_records() {
    let graph = QuestGraph::build(sample_records());

    let node = graph.get("Lost City").unwrap();
    let record = graph.node(node).data.as_ref().unwrap();
    assert_eq!(record.skill_requirements.len(), 1);
    assert!(record.prerequisites.contains("Druidic Ritual"));
}

#[test]
fn test_build_edge_set() {
    let graph = QuestGraph::build(sample_records());

    let expected: BTreeSet<(String, String)> = [
        (ROOT_KEY, "Druidic Ritual"),
        (ROOT_KEY, "Priest in Peril"),
        ("Druidic Ritual", "Lost City"),
        ("Lost City", "Fairytale I - Growing Pains"),
        ("Nature Spirit", "Fairytale I - Growing Pains"),
    ]
    .into_iter()
    .map(|(parent, child)| (parent.to_string(), child.to_string()))
    .collect();

    assert_eq!(graph.edge_set(), expected);
}

#[test]
fn test_build_is_order_independent() {
    let forward = QuestGraph::build(sample_records());

    let mut reversed_records = sample_records();
    reversed_records.reverse();
    let reversed = QuestGraph::build(reversed_records);

    let mut rotated_records = sample_records();
    rotated_records.rotate_left(2);
    let rotated = QuestGraph::build(rotated_records);

    assert_eq!(forward.edge_set(), reversed.edge_set());
    assert_eq!(forward.edge_set(), rotated.edge_set());
    assert_eq!(forward.node_count(), reversed.node_count());
    assert_eq!(forward.placeholder_count(), rotated.placeholder_count());
}

#[test]
fn test_quest_names_excludes_placeholders() {
    let graph = QuestGraph::build(sample_records());

    assert_eq!(
        graph.quest_names(),
        vec![
            "Druidic Ritual",
            "Fairytale I - Growing Pains",
            "Lost City",
            "Priest in Peril",
        ]
    );
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[test]
fn test_all_nodes_visits_each_node_once() {
    let records = vec![
        QuestRecord::new("G"),
        QuestRecord::new("E").with_prerequisite("G"),
        QuestRecord::new("F").with_prerequisite("G"),
        QuestRecord::new("D").with_prerequisite("E").with_prerequisite("F"),
    ];
    let graph = QuestGraph::build(records);

    let nodes = graph.all_nodes();
    let keys: BTreeSet<&str> = nodes.iter().map(|&n| graph.node(n).key.as_str()).collect();

    assert_eq!(nodes.len(), 5);
    assert_eq!(keys, BTreeSet::from([ROOT_KEY, "D", "E", "F", "G"]));
    assert_eq!(nodes[0], graph.root());
}

#[test]
fn test_all_nodes_skips_unreachable_placeholders() {
    let graph = QuestGraph::build(sample_records());

    let placeholder = graph.get("Nature Spirit").unwrap();
    assert!(!graph.all_nodes().contains(&placeholder));
}

#[test]
fn test_find_reachable_quest() {
    let graph = QuestGraph::build(sample_records());

    let node = graph.find("Fairytale I - Growing Pains").unwrap();
    assert_eq!(graph.node(node).key, "Fairytale I - Growing Pains");
}

#[test]
fn test_find_unknown_quest() {
    let graph = QuestGraph::build(sample_records());

    match graph.find("Song of the Elves") {
        Err(SkillockError::TargetNotFound(name)) => assert_eq!(name, "Song of the Elves"),
        other => panic!("expected TargetNotFound, got {:?}", other),
    }
}

#[test]
fn test_find_unreachable_placeholder() {
    let graph = QuestGraph::build(sample_records());
    assert!(matches!(
        graph.find("Nature Spirit"),
        Err(SkillockError::TargetNotFound(_))
    ));
}

#[test]
fn test_find_does_not_return_root() {
    let graph = QuestGraph::build(sample_records());
    assert!(graph.find(ROOT_KEY).is_err());
}
