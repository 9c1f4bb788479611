pub mod aggregate;
pub mod data;
pub mod error;
pub mod graph;
pub mod model;
pub mod registry;
pub mod report;

pub use aggregate::{Aggregator, RequirementProfile, SkillLevels};
pub use data::{DataStore, MalformedPolicy};
pub use error::{Result, SkillockError};
pub use graph::{QuestGraph, QuestNode};
pub use model::{QuestRecord, SkillEntry, SkillLine, SkillRequirement};
pub use registry::SkillRegistry;
pub use report::BreakdownFormat;
