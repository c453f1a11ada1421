//! Camera-follow sequencing.
//!
//! After a cross-context teleport the controlling viewers should end up
//! looking at the traveller. Switching context and focusing in one go is
//! unreliable on hosts, so each sequence runs as three phases, each one
//! separated from the next by a settling delay:
//!
//! 1. associate the viewers with the destination context;
//! 2. focus them on the destination point;
//! 3. settle, after which the sequence is complete and dropped.
//!
//! The schedule only decides *which* steps are due; the application layer
//! performs them against the camera port.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use traveler_core::scene::{ContextId, EntityId, Point};
use uuid::Uuid;

/// Request to bring viewers to a relocated entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowRequest {
    /// The entity (post-relocation identity) being followed.
    pub entity_id: EntityId,
    /// Destination context.
    pub context_id: ContextId,
    /// Destination point.
    pub position: Point,
    /// Viewers to move.
    pub viewers: Vec<String>,
}

/// Where a sequence is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowPhase {
    /// Waiting to associate viewers with the context.
    Associate,
    /// Waiting to focus viewers on the point.
    Focus,
    /// Focused; waiting for the view to settle before completing.
    Settle,
}

/// A camera step that is due now.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowStep {
    /// Show the context to the viewers.
    Associate {
        /// Sequence this step belongs to.
        sequence_id: Uuid,
        /// Destination context.
        context_id: ContextId,
        /// Viewers to move.
        viewers: Vec<String>,
    },
    /// Centre the viewers on the point.
    Focus {
        /// Sequence this step belongs to.
        sequence_id: Uuid,
        /// Destination context.
        context_id: ContextId,
        /// Destination point.
        position: Point,
        /// Viewers to move.
        viewers: Vec<String>,
    },
    /// The sequence has settled and is finished.
    Complete {
        /// Sequence this step belongs to.
        sequence_id: Uuid,
        /// The entity that was followed.
        entity_id: EntityId,
    },
}

#[derive(Debug, Clone)]
struct FollowSequence {
    id: Uuid,
    request: FollowRequest,
    phase: FollowPhase,
    due_at: DateTime<Utc>,
}

/// Pending camera-follow sequences.
#[derive(Debug, Clone, Default)]
pub struct FollowSchedule {
    pending: Vec<FollowSequence>,
}

impl FollowSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sequence whose first step is due at `now`.
    pub fn schedule(&mut self, request: FollowRequest, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.pending.push(FollowSequence {
            id,
            request,
            phase: FollowPhase::Associate,
            due_at: now,
        });
        id
    }

    /// Takes every step due at `now`, advancing each sequence by at most one
    /// phase. A sequence's next step becomes due `delay` after this call;
    /// sequences whose `Complete` step was taken are dropped.
    pub fn take_due(&mut self, now: DateTime<Utc>, delay: TimeDelta) -> Vec<FollowStep> {
        let mut steps = Vec::new();
        self.pending.retain_mut(|sequence| {
            if sequence.due_at > now {
                return true;
            }
            let request = &sequence.request;
            match sequence.phase {
                FollowPhase::Associate => {
                    steps.push(FollowStep::Associate {
                        sequence_id: sequence.id,
                        context_id: request.context_id.clone(),
                        viewers: request.viewers.clone(),
                    });
                    sequence.phase = FollowPhase::Focus;
                    sequence.due_at = now + delay;
                    true
                }
                FollowPhase::Focus => {
                    steps.push(FollowStep::Focus {
                        sequence_id: sequence.id,
                        context_id: request.context_id.clone(),
                        position: request.position,
                        viewers: request.viewers.clone(),
                    });
                    sequence.phase = FollowPhase::Settle;
                    sequence.due_at = now + delay;
                    true
                }
                FollowPhase::Settle => {
                    steps.push(FollowStep::Complete {
                        sequence_id: sequence.id,
                        entity_id: request.entity_id.clone(),
                    });
                    false
                }
            }
        });
        steps
    }

    /// Phase of a pending sequence, if it is still pending.
    #[must_use]
    pub fn phase_of(&self, sequence_id: Uuid) -> Option<FollowPhase> {
        self.pending
            .iter()
            .find(|sequence| sequence.id == sequence_id)
            .map(|sequence| sequence.phase)
    }

    /// Number of pending sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn request() -> FollowRequest {
        FollowRequest {
            entity_id: EntityId::new("tok-2"),
            context_id: ContextId::new("page-b"),
            position: Point::new(350.0, 210.0),
            viewers: vec!["alice".to_owned()],
        }
    }

    #[test]
    fn test_sequence_runs_three_phases_separated_by_delay() {
        let mut schedule = FollowSchedule::new();
        let delay = TimeDelta::milliseconds(500);
        let id = schedule.schedule(request(), t0());

        let first = schedule.take_due(t0(), delay);
        assert_eq!(
            first,
            vec![FollowStep::Associate {
                sequence_id: id,
                context_id: ContextId::new("page-b"),
                viewers: vec!["alice".to_owned()],
            }]
        );
        assert_eq!(schedule.phase_of(id), Some(FollowPhase::Focus));

        assert!(schedule.take_due(t0() + TimeDelta::milliseconds(499), delay).is_empty());

        let second = schedule.take_due(t0() + delay, delay);
        assert_eq!(
            second,
            vec![FollowStep::Focus {
                sequence_id: id,
                context_id: ContextId::new("page-b"),
                position: Point::new(350.0, 210.0),
                viewers: vec!["alice".to_owned()],
            }]
        );
        assert_eq!(schedule.phase_of(id), Some(FollowPhase::Settle));

        assert!(schedule.take_due(t0() + delay, delay).is_empty());
        let third = schedule.take_due(t0() + delay * 2, delay);
        assert_eq!(
            third,
            vec![FollowStep::Complete {
                sequence_id: id,
                entity_id: EntityId::new("tok-2"),
            }]
        );
        assert!(schedule.is_empty());
        assert_eq!(schedule.phase_of(id), None);
    }

    #[test]
    fn test_late_tick_still_advances_one_phase_at_a_time() {
        let mut schedule = FollowSchedule::new();
        let delay = TimeDelta::milliseconds(500);
        schedule.schedule(request(), t0());

        let steps = schedule.take_due(t0() + TimeDelta::seconds(10), delay);

        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], FollowStep::Associate { .. }));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_future_sequences_are_left_alone() {
        let mut schedule = FollowSchedule::new();
        schedule.schedule(request(), t0() + TimeDelta::seconds(1));

        assert!(schedule.take_due(t0(), TimeDelta::milliseconds(500)).is_empty());
        assert_eq!(schedule.len(), 1);
    }
}
