//! Fixed-capacity, open-addressed patient table.
//!
//! Patients live in a table of `capacity` slots. A patient's home slot is
//! `id mod capacity`; collisions probe linearly, wrapping at the end of the table.
//!
//! Removal leaves a [`Slot::Tombstone`] rather than an empty slot. Lookups step over
//! tombstones so that patients inserted further down a probe chain stay reachable after an
//! earlier member of the chain is removed. Inserts reuse the first tombstone on the chain, but
//! only after probing on to the end of the chain to rule out a duplicate id.
//!
//! The slot layout is part of the snapshot format: [`PatientStore::slots`] and
//! [`PatientStore::from_slots`] expose it verbatim.

use crate::patient::Patient;
use crate::{ClinicError, ClinicResult};
use clinic_types::PatientId;
use serde::{Deserialize, Serialize};

/// One position of the patient table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// Never used. Terminates probe chains.
    Empty,
    /// Previously held a patient. Skipped by lookups, reusable by inserts.
    Tombstone,
    Occupied(Patient),
}

impl Slot {
    pub fn patient(&self) -> Option<&Patient> {
        match self {
            Slot::Occupied(patient) => Some(patient),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PatientStore {
    slots: Vec<Slot>,
    len: usize,
}

impl PatientStore {
    /// Creates an empty table with `capacity` slots.
    pub fn new(capacity: usize) -> ClinicResult<Self> {
        if capacity == 0 {
            return Err(ClinicError::InvalidInput(
                "patient table capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            slots: vec![Slot::Empty; capacity],
            len: 0,
        })
    }

    /// Rebuilds a table from a previously exported slot layout.
    ///
    /// Every occupied slot must be reachable from its patient's home slot, and ids must be
    /// unique; a layout that violates either would make records silently unreachable.
    pub fn from_slots(slots: Vec<Slot>) -> ClinicResult<Self> {
        if slots.is_empty() {
            return Err(ClinicError::InvalidInput(
                "patient table capacity must be at least 1".into(),
            ));
        }
        let len = slots.iter().filter(|s| s.patient().is_some()).count();
        let store = Self { slots, len };

        for (index, slot) in store.slots.iter().enumerate() {
            if let Slot::Occupied(patient) = slot {
                patient.check_invariants()?;
                if store.locate(patient.id) != Some(index) {
                    return Err(ClinicError::InvalidInput(format!(
                        "patient {} at slot {} is unreachable or duplicated",
                        patient.id, index
                    )));
                }
            }
        }

        Ok(store)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn home_slot(&self, id: PatientId) -> usize {
        id.get() as usize % self.capacity()
    }

    /// Slot indices in probe order for `id`, visiting every slot once.
    fn probe_sequence(&self, id: PatientId) -> impl Iterator<Item = usize> {
        let capacity = self.capacity();
        let start = self.home_slot(id);
        (0..capacity).map(move |step| (start + step) % capacity)
    }

    fn locate(&self, id: PatientId) -> Option<usize> {
        for index in self.probe_sequence(id) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(patient) if patient.id == id => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => continue,
            }
        }
        None
    }

    /// Inserts a patient under its own id.
    ///
    /// # Errors
    ///
    /// - `DuplicatePatientId` if the id is already stored.
    /// - `PatientStoreFull` if no empty or tombstone slot is left.
    ///
    /// The table is unchanged when an error is returned.
    pub fn insert(&mut self, patient: Patient) -> ClinicResult<()> {
        let id = patient.id;
        let mut target = None;

        for index in self.probe_sequence(id) {
            match &self.slots[index] {
                Slot::Occupied(existing) if existing.id == id => {
                    return Err(ClinicError::DuplicatePatientId(id));
                }
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    target.get_or_insert(index);
                }
                Slot::Empty => {
                    target.get_or_insert(index);
                    break;
                }
            }
        }

        let Some(index) = target else {
            return Err(ClinicError::PatientStoreFull {
                capacity: self.capacity(),
            });
        };

        tracing::debug!(
            "patient {} placed at slot {} (home {})",
            id,
            index,
            self.home_slot(id)
        );
        self.slots[index] = Slot::Occupied(patient);
        self.len += 1;
        Ok(())
    }

    pub fn find(&self, id: PatientId) -> Option<&Patient> {
        self.locate(id).and_then(|index| self.slots[index].patient())
    }

    pub fn find_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        let index = self.locate(id)?;
        match &mut self.slots[index] {
            Slot::Occupied(patient) => Some(patient),
            _ => None,
        }
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.locate(id).is_some()
    }

    /// Removes a patient, leaving a tombstone in its slot.
    pub fn remove(&mut self, id: PatientId) -> ClinicResult<Patient> {
        let index = self.locate(id).ok_or(ClinicError::PatientNotFound(id))?;
        match std::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(patient) => {
                self.len -= 1;
                Ok(patient)
            }
            other => {
                self.slots[index] = other;
                Err(ClinicError::PatientNotFound(id))
            }
        }
    }

    /// Occupied slots in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.slots.iter().filter_map(Slot::patient)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: u32) -> Patient {
        Patient::new(
            PatientId(id),
            &format!("Patient {id}"),
            40,
            "Fatigue",
            "General Medicine",
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_insert_then_find_round_trip() {
        let mut store = PatientStore::new(100).unwrap();
        let ids = [101, 102, 1, 201, 99, 0, 4242];
        for id in ids {
            store.insert(patient(id)).unwrap();
        }

        assert_eq!(store.len(), ids.len());
        for id in ids {
            assert_eq!(store.find(PatientId(id)), Some(&patient(id)));
        }
        assert!(store.find(PatientId(301)).is_none());
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut store = PatientStore::new(10).unwrap();
        store.insert(patient(3)).unwrap();
        let err = store.insert(patient(3)).expect_err("duplicate id");
        assert!(matches!(err, ClinicError::DuplicatePatientId(PatientId(3))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_beyond_capacity_leaves_store_unchanged() {
        let mut store = PatientStore::new(100).unwrap();
        for id in 0..100 {
            store.insert(patient(id * 7)).unwrap();
        }
        let before: Vec<Slot> = store.slots().to_vec();

        let err = store.insert(patient(5000)).expect_err("table is full");
        assert!(matches!(err, ClinicError::PatientStoreFull { capacity: 100 }));
        assert_eq!(store.slots(), before.as_slice());
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_colliding_ids_probe_linearly() {
        let mut store = PatientStore::new(100).unwrap();
        store.insert(patient(5)).unwrap();
        store.insert(patient(105)).unwrap();
        store.insert(patient(205)).unwrap();

        assert_eq!(store.slots()[5].patient().map(|p| p.id), Some(PatientId(5)));
        assert_eq!(store.slots()[6].patient().map(|p| p.id), Some(PatientId(105)));
        assert_eq!(store.slots()[7].patient().map(|p| p.id), Some(PatientId(205)));
    }

    #[test]
    fn test_probe_wraps_around_table_end() {
        let mut store = PatientStore::new(100).unwrap();
        store.insert(patient(99)).unwrap();
        store.insert(patient(199)).unwrap();

        assert_eq!(store.slots()[0].patient().map(|p| p.id), Some(PatientId(199)));
        assert!(store.find(PatientId(199)).is_some());
    }

    #[test]
    fn test_remove_keeps_probe_chain_reachable() {
        let mut store = PatientStore::new(100).unwrap();
        store.insert(patient(5)).unwrap();
        store.insert(patient(105)).unwrap();
        store.insert(patient(205)).unwrap();

        store.remove(PatientId(105)).unwrap();

        assert_eq!(store.slots()[6], Slot::Tombstone);
        assert!(store.find(PatientId(105)).is_none());
        assert!(store.find(PatientId(205)).is_some());
        assert_eq!(store.len(), 2);

        store.remove(PatientId(5)).unwrap();
        assert!(store.find(PatientId(205)).is_some());
    }

    #[test]
    fn test_insert_reuses_tombstone() {
        let mut store = PatientStore::new(100).unwrap();
        store.insert(patient(5)).unwrap();
        store.insert(patient(105)).unwrap();
        store.remove(PatientId(5)).unwrap();

        store.insert(patient(305)).unwrap();
        assert_eq!(store.slots()[5].patient().map(|p| p.id), Some(PatientId(305)));
    }

    #[test]
    fn test_insert_detects_duplicate_behind_tombstone() {
        let mut store = PatientStore::new(100).unwrap();
        store.insert(patient(5)).unwrap();
        store.insert(patient(105)).unwrap();
        store.remove(PatientId(5)).unwrap();

        let err = store.insert(patient(105)).expect_err("105 is still stored");
        assert!(matches!(err, ClinicError::DuplicatePatientId(PatientId(105))));
    }

    #[test]
    fn test_remove_missing_patient() {
        let mut store = PatientStore::new(10).unwrap();
        let err = store.remove(PatientId(1)).expect_err("nothing stored");
        assert!(matches!(err, ClinicError::PatientNotFound(PatientId(1))));
    }

    #[test]
    fn test_full_table_of_tombstones_accepts_insert() {
        let mut store = PatientStore::new(3).unwrap();
        for id in 0..3 {
            store.insert(patient(id)).unwrap();
        }
        for id in 0..3 {
            store.remove(PatientId(id)).unwrap();
        }
        assert!(store.find(PatientId(1)).is_none());
        store.insert(patient(4)).unwrap();
        assert!(store.find(PatientId(4)).is_some());
    }

    #[test]
    fn test_find_mut_updates_record() {
        let mut store = PatientStore::new(10).unwrap();
        store.insert(patient(3)).unwrap();
        store.find_mut(PatientId(3)).unwrap().emergency = true;
        assert!(store.find(PatientId(3)).unwrap().emergency);
    }

    #[test]
    fn test_from_slots_round_trip() {
        let mut store = PatientStore::new(10).unwrap();
        store.insert(patient(3)).unwrap();
        store.insert(patient(13)).unwrap();
        store.remove(PatientId(3)).unwrap();

        let rebuilt = PatientStore::from_slots(store.slots().to_vec()).unwrap();
        assert_eq!(rebuilt.slots(), store.slots());
        assert_eq!(rebuilt.len(), 1);
        assert!(rebuilt.find(PatientId(13)).is_some());
    }

    #[test]
    fn test_from_slots_rejects_unreachable_patient() {
        let mut slots = vec![Slot::Empty; 10];
        slots[5] = Slot::Occupied(patient(3));
        let err = PatientStore::from_slots(slots).expect_err("patient 3 belongs at slot 3");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("unreachable")));
    }
}
