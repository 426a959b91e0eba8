use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::util::HashMap;

/// In-process gallery analytics: how often each sketch was opened and how
/// often its callbacks failed. Nothing here is persisted unless a host
/// chooses to write a summary.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Stats {
    activations: HashMap<String, u64>,
    frames_rendered: u64,
    frame_failures: u64,
    handler_failures: u64,
    lifecycle_failures: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_activations: u64,
    pub sketches_opened: usize,
    pub most_activated: Option<String>,
    pub frames_rendered: u64,
    pub frame_failures: u64,
    pub handler_failures: u64,
    pub lifecycle_failures: u64,
}

impl Stats {
    pub fn record_activation(&mut self, name: &str) {
        *self.activations.entry(name.to_string()).or_default() += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames_rendered += 1;
    }

    pub fn record_frame_failure(&mut self) {
        self.frame_failures += 1;
    }

    pub fn record_handler_failure(&mut self) {
        self.handler_failures += 1;
    }

    /// `init` or `teardown` failures.
    pub fn record_lifecycle_failure(&mut self) {
        self.lifecycle_failures += 1;
    }

    pub fn activations(&self, name: &str) -> u64 {
        self.activations.get(name).copied().unwrap_or_default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frame_failures(&self) -> u64 {
        self.frame_failures
    }

    pub fn handler_failures(&self) -> u64 {
        self.handler_failures
    }

    pub fn lifecycle_failures(&self) -> u64 {
        self.lifecycle_failures
    }

    /// Ties for the most activated sketch resolve to the smallest name.
    pub fn summary(&self) -> StatsSummary {
        let most_activated = self
            .activations
            .iter()
            .max_by(|(a_name, a), (b_name, b)| {
                a.cmp(b).then_with(|| b_name.cmp(a_name))
            })
            .map(|(name, _)| name.clone());

        StatsSummary {
            total_activations: self.activations.values().sum(),
            sketches_opened: self.activations.len(),
            most_activated,
            frames_rendered: self.frames_rendered,
            frame_failures: self.frame_failures,
            handler_failures: self.handler_failures,
            lifecycle_failures: self.lifecycle_failures,
        }
    }
}

impl StatsSummary {
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_and_ranks_activations() {
        let mut stats = Stats::default();
        stats.record_activation("b");
        stats.record_activation("a");
        stats.record_activation("b");
        stats.record_frame();
        stats.record_frame_failure();

        let summary = stats.summary();
        assert_eq!(summary.total_activations, 3);
        assert_eq!(summary.sketches_opened, 2);
        assert_eq!(summary.most_activated.as_deref(), Some("b"));
        assert_eq!(summary.frames_rendered, 1);
        assert_eq!(summary.frame_failures, 1);
        assert_eq!(stats.activations("b"), 2);
        assert_eq!(stats.activations("missing"), 0);
    }

    #[test]
    fn ties_resolve_to_smallest_name() {
        let mut stats = Stats::default();
        stats.record_activation("zeta");
        stats.record_activation("alpha");

        assert_eq!(stats.summary().most_activated.as_deref(), Some("alpha"));
    }

    #[test]
    fn empty_summary_has_no_favorite() {
        let summary = Stats::default().summary();
        assert_eq!(summary.total_activations, 0);
        assert_eq!(summary.most_activated, None);
    }

    #[test]
    fn summary_saves_as_json() {
        let mut stats = Stats::default();
        stats.record_activation("a");

        let path = std::env::temp_dir()
            .join(format!("easel-stats-{}", std::process::id()))
            .join("summary.json");
        stats.summary().save(&path).expect("save summary");

        let json = fs::read_to_string(&path).expect("read summary");
        let loaded: StatsSummary =
            serde_json::from_str(&json).expect("parse summary");
        assert_eq!(loaded, stats.summary());
        let _ = fs::remove_dir_all(path.parent().expect("parent"));
    }
}
