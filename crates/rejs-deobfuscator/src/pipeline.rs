//! Pass orchestration.
//!
//! Passes run in `PassKind::PIPELINE_ORDER`, each with the tree to itself.
//! A failing pass is logged and recorded; the passes after it still run
//! on whatever the failing pass left behind.

use crate::config::Configuration;
use crate::transforms::Transformation;
use rejs_parser::{NodeArena, NodeIndex};
use serde::Serialize;
use tracing::{debug, info_span, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "reason")]
pub enum PassStatus {
    Edited,
    Unchanged,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PassOutcome {
    pub pass: &'static str,
    pub status: PassStatus,
}

/// Output of a deobfuscation run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub output: String,
    /// Every pass execution, in order, across all rounds.
    pub outcomes: Vec<PassOutcome>,
    pub rounds: u32,
}

impl RunReport {
    /// True when any pass changed the tree.
    pub fn edited(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.status == PassStatus::Edited)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PassOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, PassStatus::Failed(_)))
    }
}

pub struct Pipeline {
    passes: Vec<Box<dyn Transformation>>,
}

impl Pipeline {
    pub fn from_config(config: &Configuration) -> Pipeline {
        Pipeline {
            passes: config
                .enabled_passes()
                .into_iter()
                .map(|pass| pass.transformation())
                .collect(),
        }
    }

    /// Run exactly these passes in this order.
    pub fn from_passes(passes: Vec<Box<dyn Transformation>>) -> Pipeline {
        Pipeline { passes }
    }

    /// One round over every pass.
    pub fn run(&self, arena: &mut NodeArena, root: NodeIndex) -> Vec<PassOutcome> {
        let mut outcomes = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let name = pass.name();
            let _span = info_span!("pass", name).entered();
            let status = match pass.execute(arena, root) {
                Ok(true) => PassStatus::Edited,
                Ok(false) => PassStatus::Unchanged,
                Err(error) => {
                    warn!(pass = name, %error, "pass failed, continuing");
                    PassStatus::Failed(error.to_string())
                }
            };
            debug!(pass = name, ?status, "pass finished");
            outcomes.push(PassOutcome { pass: name, status });
        }
        outcomes
    }
}
