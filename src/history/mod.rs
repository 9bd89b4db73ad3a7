use crate::report::PositionReport;
use dashmap::DashMap;


/// Append-only per-entity position history.
///
/// Reports are kept in arrival order and never deleted by the core;
/// retention is an external policy. "Latest" and "previous" are always
/// re-derived by a stable sort on the caller-supplied timestamps, so
/// out-of-order arrival is handled and equal timestamps keep their
/// insertion order (documented tie-break, not an accident).
pub struct HistoryStore {
    /// Lock-free concurrent map: entity id → reports in arrival order
    entries: DashMap<String, Vec<PositionReport>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Append a report to its entity's history. Always succeeds;
    /// duplicate reports with identical timestamps are both retained.
    pub fn append(&self, report: PositionReport) {
        self.entries
            .entry(report.user_id.clone())
            .or_default()
            .push(report);
    }

    /// The report with the maximum timestamp, or None if the entity has
    /// no history yet (a valid state for newly added members).
    pub fn latest(&self, entity_id: &str) -> Option<PositionReport> {
        self.sorted_desc(entity_id).into_iter().next()
    }

    /// The report with the second-highest timestamp; used for
    /// transition comparison.
    pub fn second_latest(&self, entity_id: &str) -> Option<PositionReport> {
        self.sorted_desc(entity_id).into_iter().nth(1)
    }

    /// Full history for an entity, newest first. Empty if unknown.
    pub fn history_for(&self, entity_id: &str) -> Vec<PositionReport> {
        self.sorted_desc(entity_id)
    }

    /// All entity ids with at least one report.
    pub fn entity_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of reports stored for an entity.
    pub fn len(&self, entity_id: &str) -> usize {
        self.entries.get(entity_id).map_or(0, |v| v.len())
    }

    fn sorted_desc(&self, entity_id: &str) -> Vec<PositionReport> {
        let mut reports = match self.entries.get(entity_id) {
            Some(v) => v.clone(),
            None => return Vec::new(),
        };
        // Stable sort: equal timestamps keep insertion order
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        reports
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
