use crate::fence::{FenceCatalog, FenceShape, GeoFence};
use crate::geo::haversine_distance;
use crate::history::HistoryStore;
use crate::notify::{Notification, NotificationKind, NotificationSink};
use crate::report::{PositionReport, ValidationError};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info};


/// Geo-fence evaluation engine.
///
/// On each submitted position the engine appends to history, re-derives
/// containment for every applicable circular fence from the two most
/// recent reports, and emits notifications for enter/exit transitions.
/// Containment is never cached: correctness depends only on history
/// contents, not on mutable side state.
pub struct EvaluationEngine {
    pub history: Arc<HistoryStore>,
    pub catalog: Arc<FenceCatalog>,
    pub sink: Arc<NotificationSink>,

    /// Broadcast channel for live notification consumers (WebSocket)
    notification_tx: broadcast::Sender<Notification>,

    /// Per-entity ingest locks: reports for the same entity are never
    /// evaluated concurrently, distinct entities run in parallel
    entity_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl EvaluationEngine {
    pub fn new(
        history: Arc<HistoryStore>,
        catalog: Arc<FenceCatalog>,
        sink: Arc<NotificationSink>,
    ) -> Self {
        let (notification_tx, _) = broadcast::channel(1000);

        Self {
            history,
            catalog,
            sink,
            notification_tx,
            entity_locks: DashMap::new(),
        }
    }

    /// Subscribe to notifications as they are emitted.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notification_tx.subscribe()
    }

    /// Ingest one position report: validate, append, evaluate, emit.
    ///
    /// Returns the notifications emitted for this submission (possibly
    /// empty). The only error is structural (missing userId); absent
    /// history, missing fence radius, and non-circle shapes all resolve
    /// quietly to "no notification". Non-finite coordinates yield NaN
    /// distances, which compare false against any radius ("outside").
    pub fn submit_position(
        &self,
        mut report: PositionReport,
    ) -> Result<Vec<Notification>, ValidationError> {
        report.validate_and_prepare()?;
        let entity_id = report.user_id.clone();

        // Serialize evaluation per entity so latest/second-latest see a
        // consistent history order
        let lock = {
            let entry = self.entity_locks.entry(entity_id.clone()).or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().unwrap();

        self.history.append(report);
        let emitted = self.evaluate_transitions(&entity_id);

        if !emitted.is_empty() {
            info!(
                entity_id = %entity_id,
                count = emitted.len(),
                "Geo-fence transitions detected"
            );
            self.sink.push_batch(emitted.clone());
            for notification in &emitted {
                let _ = self.notification_tx.send(notification.clone());
            }
        }

        Ok(emitted)
    }

    /// Re-derive containment transitions for the entity's two most
    /// recent reports against every applicable fence.
    fn evaluate_transitions(&self, entity_id: &str) -> Vec<Notification> {
        let current = match self.history.latest(entity_id) {
            Some(report) => report,
            None => return Vec::new(),
        };

        // A single data point cannot establish a transition: the very
        // first report for an entity never triggers a notification
        let previous = match self.history.second_latest(entity_id) {
            Some(report) => report,
            None => {
                debug!(entity_id = %entity_id, "No previous report, skipping evaluation");
                return Vec::new();
            }
        };

        let mut emitted = Vec::new();

        // Snapshot of active applicable fences; mutation mid-evaluation
        // cannot produce a partially evaluated fence
        for fence in self.catalog.applicable_to(entity_id) {
            let (center, radius) = match fence.shape {
                FenceShape::Circle {
                    center,
                    radius: Some(radius),
                } => (center, radius),
                // Circles without a radius and non-circle shapes are
                // valid entries awaiting configuration or future shape
                // support; they never contain
                _ => continue,
            };

            let currently_inside = haversine_distance(current.coordinate(), center) <= radius;
            let previously_inside = haversine_distance(previous.coordinate(), center) <= radius;

            if currently_inside && !previously_inside && fence.notify_on_enter {
                emitted.push(transition_notification(
                    NotificationKind::Info,
                    "entered",
                    &fence,
                    entity_id,
                ));
            } else if !currently_inside && previously_inside && fence.notify_on_exit {
                emitted.push(transition_notification(
                    NotificationKind::Alert,
                    "exited",
                    &fence,
                    entity_id,
                ));
            }
            // Remained inside, remained outside, or crossing with the
            // notification direction disabled: no event
        }

        emitted
    }
}

fn transition_notification(
    kind: NotificationKind,
    verb: &str,
    fence: &GeoFence,
    entity_id: &str,
) -> Notification {
    Notification::new(
        kind,
        format!("User {} geo-fence: {}", verb, fence.name),
        Some(entity_id.to_string()),
    )
}
