//! Scoring engine behind the tea-blending quiz: turns a completed answer set
//! into a preference profile, a taste archetype and a ranked blend of teas.

pub mod answers;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use answers::{Answer, AnswerSet};
pub use catalog::{Catalog, PreferenceSignal, TeaId};
pub use engine::{EngineConfig, ProfileAnalysis, Recommendation, RecommendationEngine, TeaScore};
