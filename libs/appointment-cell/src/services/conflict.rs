// libs/appointment-cell/src/services/conflict.rs
use tracing::{debug, warn};

use crate::models::{Appointment, CandidateSlot, ConflictWarning, Timestamp};

/// Detects overlaps between a candidate slot and a practitioner's live bookings.
///
/// Conflicts are advisory: callers turn them into warnings and let an operator
/// confirm a deliberate double-booking.
pub struct ConflictDetectionService;

impl ConflictDetectionService {
    pub fn new() -> Self {
        Self
    }

    /// First live booking overlapping the candidate, if any.
    pub fn find_conflict<'a>(
        &self,
        candidate: &CandidateSlot,
        existing: &'a [Appointment],
    ) -> Option<&'a Appointment> {
        self.conflicting(candidate, existing).next()
    }

    /// Every live booking overlapping the candidate, in input order.
    pub fn find_conflicts<'a>(
        &self,
        candidate: &CandidateSlot,
        existing: &'a [Appointment],
    ) -> Vec<&'a Appointment> {
        let conflicts: Vec<&Appointment> = self.conflicting(candidate, existing).collect();

        if !conflicts.is_empty() {
            warn!(
                "Conflict detected for practitioner {:?} from {} to {} - {} overlapping appointments",
                candidate.practitioner_id,
                candidate.start,
                candidate.end,
                conflicts.len()
            );
        }

        conflicts
    }

    pub fn warnings(&self, candidate: &CandidateSlot, existing: &[Appointment]) -> Vec<ConflictWarning> {
        self.find_conflicts(candidate, existing)
            .into_iter()
            .map(ConflictWarning::from)
            .collect()
    }

    fn conflicting<'a, 'c>(
        &self,
        candidate: &'c CandidateSlot,
        existing: &'a [Appointment],
    ) -> impl Iterator<Item = &'a Appointment> + 'c
    where
        'a: 'c,
    {
        let practitioner_id = candidate.practitioner_id;
        if practitioner_id.is_none() {
            debug!("Candidate slot has no practitioner, nothing can collide");
        }

        existing.iter().filter(move |appointment| {
            practitioner_id == Some(appointment.practitioner_id)
                && Some(appointment.id) != candidate.exclude_appointment_id
                && Self::is_active_appointment(appointment)
                && Self::appointments_overlap(
                    candidate.start,
                    candidate.end,
                    appointment.start,
                    appointment.end,
                )
        })
    }

    /// Two half-open intervals overlap iff `start1 < end2 && start2 < end1`.
    /// Empty intervals never overlap anything.
    pub fn appointments_overlap(
        start1: Timestamp,
        end1: Timestamp,
        start2: Timestamp,
        end2: Timestamp,
    ) -> bool {
        if start1 >= end1 || start2 >= end2 {
            return false;
        }
        start1 < end2 && start2 < end1
    }

    pub fn is_active_appointment(appointment: &Appointment) -> bool {
        appointment.is_live()
    }
}

impl Default for ConflictDetectionService {
    fn default() -> Self {
        Self::new()
    }
}
