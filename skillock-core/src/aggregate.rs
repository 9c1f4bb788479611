//! Requirement aggregation over the quest graph.
//!
//! A quest's profile is its own requirements merged with the profile of every
//! parent, recursively. Every merge is a per-slot maximum or a set union, so
//! the result does not depend on parent order or on how many paths reach a
//! shared ancestor.

use crate::error::Result;
use crate::graph::QuestGraph;
use crate::model::{COMBAT_LEVEL, QUEST_POINTS, QuestRecord, SkillRequirement, is_scalar_skill};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Combat level every account starts with
pub const BASE_COMBAT_LEVEL: u32 = 3;

/// Highest required level per slot. Boosted and unboosted gates never mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevels {
    pub unboosted: u32,
    pub boosted: u32,
}

impl SkillLevels {
    pub fn raise(&mut self, level: u32, boostable: bool) {
        let slot = if boostable {
            &mut self.boosted
        } else {
            &mut self.unboosted
        };
        *slot = (*slot).max(level);
    }

    pub fn merge(&mut self, other: &SkillLevels) {
        self.unboosted = self.unboosted.max(other.unboosted);
        self.boosted = self.boosted.max(other.boosted);
    }

    pub fn is_empty(&self) -> bool {
        self.unboosted == 0 && self.boosted == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub skill_levels: BTreeMap<String, SkillLevels>,
    pub quest_points: u32,
    pub combat_level: u32,
    pub required_quests: BTreeSet<String>,
}

impl Default for RequirementProfile {
    fn default() -> Self {
        Self {
            skill_levels: BTreeMap::new(),
            quest_points: 0,
            combat_level: BASE_COMBAT_LEVEL,
            required_quests: BTreeSet::new(),
        }
    }
}

impl RequirementProfile {
    /// Empty profile with a zeroed entry for every known two-slot skill
    pub fn new<S: AsRef<str>>(known_skills: &[S]) -> Self {
        let mut profile = Self::default();
        for skill in known_skills {
            let skill = skill.as_ref();
            if !is_scalar_skill(skill) {
                profile
                    .skill_levels
                    .insert(skill.to_string(), SkillLevels::default());
            }
        }
        profile
    }

    pub fn apply_requirement(&mut self, requirement: &SkillRequirement) {
        match requirement.skill.as_str() {
            QUEST_POINTS => self.quest_points = self.quest_points.max(requirement.level),
            COMBAT_LEVEL => self.combat_level = self.combat_level.max(requirement.level),
            skill => self
                .skill_levels
                .entry(skill.to_string())
                .or_default()
                .raise(requirement.level, requirement.boostable),
        }
    }

    /// Fold a quest's own requirements into the profile
    pub fn apply(&mut self, record: &QuestRecord) {
        for requirement in &record.skill_requirements {
            self.apply_requirement(requirement);
        }
        self.required_quests
            .extend(record.prerequisites.iter().cloned());
    }

    /// Fold an ancestor's aggregated profile into this one
    pub fn merge(&mut self, other: &RequirementProfile) {
        for (skill, levels) in &other.skill_levels {
            self.skill_levels
                .entry(skill.clone())
                .or_default()
                .merge(levels);
        }
        self.quest_points = self.quest_points.max(other.quest_points);
        self.combat_level = self.combat_level.max(other.combat_level);
        self.required_quests
            .extend(other.required_quests.iter().cloned());
    }

    /// Skills with at least one non-zero slot
    pub fn required_skills(&self) -> impl Iterator<Item = (&str, &SkillLevels)> {
        self.skill_levels
            .iter()
            .filter(|(_, levels)| !levels.is_empty())
            .map(|(skill, levels)| (skill.as_str(), levels))
    }
}

/// Computes requirement profiles against a built graph.
///
/// Completed profiles are cached per node and reused for later targets, which
/// is valid because the graph is never mutated after it is built.
pub struct Aggregator<'g> {
    graph: &'g QuestGraph,
    known_skills: Vec<String>,
    cache: HashMap<NodeIndex, RequirementProfile>,
    memoize: bool,
}

impl<'g> Aggregator<'g> {
    pub fn new<S: AsRef<str>>(graph: &'g QuestGraph, known_skills: &[S]) -> Self {
        Self {
            graph,
            known_skills: known_skills
                .iter()
                .map(|skill| skill.as_ref().to_string())
                .collect(),
            cache: HashMap::new(),
            memoize: true,
        }
    }

    pub fn with_memoization(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        if !memoize {
            self.cache.clear();
        }
        self
    }

    pub fn aggregate(&mut self, target: NodeIndex) -> RequirementProfile {
        let mut path = HashSet::new();
        self.resolve(target, &mut path).0
    }

    /// Resolve `name` among the nodes reachable from the root, then aggregate it
    pub fn aggregate_quest(&mut self, name: &str) -> Result<RequirementProfile> {
        let target = self.graph.find(name)?;
        Ok(self.aggregate(target))
    }

    /// Returns the profile and whether a cycle cut any ancestor out of it.
    /// Cut profiles depend on where the walk entered the cycle and are never cached.
    fn resolve(
        &mut self,
        node: NodeIndex,
        path: &mut HashSet<NodeIndex>,
    ) -> (RequirementProfile, bool) {
        if let Some(profile) = self.cache.get(&node) {
            return (profile.clone(), false);
        }

        let graph = self.graph;
        let mut profile = RequirementProfile::new(self.known_skills.as_slice());
        if let Some(record) = &graph.node(node).data {
            profile.apply(record);
        }

        let mut cut = false;
        path.insert(node);
        for parent in graph.parents(node) {
            // a parent already on the current path closes a cycle
            if path.contains(&parent) {
                warn!(
                    "Cycle detected: {} is its own ancestor via {}",
                    graph.node(parent).key,
                    graph.node(node).key
                );
                cut = true;
                continue;
            }
            let (inherited, parent_cut) = self.resolve(parent, path);
            cut |= parent_cut;
            profile.merge(&inherited);
        }
        path.remove(&node);

        debug!(
            "Resolved {} ({} required quests)",
            graph.node(node).key,
            profile.required_quests.len()
        );

        if self.memoize && !cut {
            self.cache.insert(node, profile.clone());
        }
        (profile, cut)
    }
}

/// One-off aggregation without keeping a cache around
pub fn aggregate<S: AsRef<str>>(
    graph: &QuestGraph,
    target: NodeIndex,
    known_skills: &[S],
) -> RequirementProfile {
    Aggregator::new(graph, known_skills).aggregate(target)
}
