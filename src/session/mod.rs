//! Per-admin conversation stages.
//!
//! Two admin flows need a follow-up message: Import waits for a JSON backup
//! document, Clear waits for the confirmation password. The armed stage is
//! kept in memory per admin id; a restart simply resets everyone to idle.
//! Stages are advisory only - they never block commands from running.

use std::sync::Arc;

use dashmap::DashMap;

/// What the next private message from an admin is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminStage {
    /// Next document is a filter backup to restore
    AwaitingImportFile,
    /// Next text message is the delete-all confirmation password
    AwaitingClearPassword,
}

/// In-memory stage map. No entry means the admin is idle.
#[derive(Clone, Default)]
pub struct SessionTracker {
    stages: Arc<DashMap<u64, AdminStage>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a stage, replacing whatever was armed before.
    pub fn set(&self, admin_id: u64, stage: AdminStage) {
        self.stages.insert(admin_id, stage);
    }

    /// Current stage without consuming it.
    pub fn get(&self, admin_id: u64) -> Option<AdminStage> {
        self.stages.get(&admin_id).map(|s| *s)
    }

    /// Consume the stage once its pending input has arrived. The stage is
    /// cleared whether or not that input turns out to be usable.
    pub fn take(&self, admin_id: u64) -> Option<AdminStage> {
        self.stages.remove(&admin_id).map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_by_default() {
        let tracker = SessionTracker::new();
        assert_eq!(tracker.get(1), None);
        assert_eq!(tracker.take(1), None);
    }

    #[test]
    fn test_set_then_take_consumes() {
        let tracker = SessionTracker::new();
        tracker.set(1, AdminStage::AwaitingImportFile);

        assert_eq!(tracker.get(1), Some(AdminStage::AwaitingImportFile));
        assert_eq!(tracker.take(1), Some(AdminStage::AwaitingImportFile));
        assert_eq!(tracker.get(1), None);
    }

    #[test]
    fn test_arming_one_stage_replaces_the_other() {
        let tracker = SessionTracker::new();
        tracker.set(1, AdminStage::AwaitingImportFile);
        tracker.set(1, AdminStage::AwaitingClearPassword);

        assert_eq!(tracker.get(1), Some(AdminStage::AwaitingClearPassword));
    }

    #[test]
    fn test_stages_are_per_admin() {
        let tracker = SessionTracker::new();
        tracker.set(1, AdminStage::AwaitingImportFile);
        tracker.set(2, AdminStage::AwaitingClearPassword);

        assert_eq!(tracker.take(1), Some(AdminStage::AwaitingImportFile));
        assert_eq!(tracker.get(2), Some(AdminStage::AwaitingClearPassword));
    }
}
