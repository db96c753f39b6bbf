//! Bounded waiting queue ordered by triage priority.
//!
//! Emergency entries always precede regular ones; within a priority class, entries leave in
//! arrival order. Insertion walks back from the tail past entries of strictly lower priority
//! and inserts behind the first entry whose priority is at least as high, which is a stable
//! insertion sort step (O(n) per enqueue, O(1) per dequeue).
//!
//! Entries hold only patient identifiers. A patient removed while waiting leaves its entry in
//! place; consumers must re-resolve the id when the entry is dequeued.

use crate::{ClinicError, ClinicResult};
use clinic_types::{PatientId, Priority};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub patient_id: PatientId,
    pub priority: Priority,
}

#[derive(Clone, Debug)]
pub struct TriageQueue {
    entries: VecDeque<QueueEntry>,
    capacity: usize,
}

impl TriageQueue {
    pub fn new(capacity: usize) -> ClinicResult<Self> {
        if capacity == 0 {
            return Err(ClinicError::InvalidInput(
                "queue capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn enqueue(&mut self, patient_id: PatientId, priority: Priority) -> ClinicResult<()> {
        if self.is_full() {
            return Err(ClinicError::QueueFull {
                capacity: self.capacity,
            });
        }

        let position = self
            .entries
            .iter()
            .rposition(|entry| entry.priority >= priority)
            .map_or(0, |index| index + 1);

        self.entries.insert(
            position,
            QueueEntry {
                patient_id,
                priority,
            },
        );
        Ok(())
    }

    pub fn dequeue(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn contains(&self, patient_id: PatientId) -> bool {
        self.entries.iter().any(|e| e.patient_id == patient_id)
    }

    /// Entries from head to tail.
    pub fn peek_all(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}
