use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{Bias, RunConfig};
use crate::driver::{AnalysisResult, StopReason};
use crate::intent::{Intent, IntentSet};
use crate::oracle::Subset;
use crate::stats::StatsSummary;

#[derive(Debug, Serialize)]
pub struct SubsetReport {
    pub intent_ids: Vec<String>,
    pub intent_details: BTreeMap<String, Intent>,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalysisInfo {
    pub total_intents: usize,
    pub bias: Bias,
    pub stop_reason: StopReason,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub analysis_info: AnalysisInfo,
    pub muses: Vec<SubsetReport>,
    pub msses: Vec<SubsetReport>,
    pub statistics: StatsSummary,
}

fn render_subset(intents: &IntentSet, subset: &Subset) -> SubsetReport {
    let intent_ids = intents.ids_of(&subset.iter().copied().collect::<Vec<_>>());
    let intent_details = subset
        .iter()
        .map(|&idx| {
            let intent = intents.get(idx);
            (intent.id.clone(), intent.clone())
        })
        .collect();
    SubsetReport {
        size: intent_ids.len(),
        intent_ids,
        intent_details,
    }
}

pub fn build_report(intents: &IntentSet, config: &RunConfig, result: AnalysisResult) -> Report {
    Report {
        analysis_info: AnalysisInfo {
            total_intents: intents.len(),
            bias: config.bias,
            stop_reason: result.stop_reason,
        },
        muses: result.muses.iter().map(|m| render_subset(intents, m)).collect(),
        msses: result.msses.iter().map(|m| render_subset(intents, m)).collect(),
        statistics: result.stats,
    }
}
