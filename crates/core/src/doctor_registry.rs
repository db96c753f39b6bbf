//! Bounded, ordered list of doctors.
//!
//! Registration order is significant: the matcher breaks ties in favour of the
//! earliest-registered doctor, and removal compacts the list without reordering it.
//!
//! The registry does not enforce unique ids. Callers must keep them unique, otherwise lookups
//! by id only ever see the first doctor with that id; [`crate::Clinic::add_doctor`] does this.

use crate::doctor::{Attendance, Doctor};
use crate::{ClinicError, ClinicResult};
use clinic_types::{DoctorId, PatientId};

#[derive(Clone, Debug)]
pub struct DoctorRegistry {
    doctors: Vec<Doctor>,
    capacity: usize,
}

impl DoctorRegistry {
    pub fn new(capacity: usize) -> ClinicResult<Self> {
        if capacity == 0 {
            return Err(ClinicError::InvalidInput(
                "doctor registry capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            doctors: Vec::with_capacity(capacity),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    /// Appends a doctor at the end of the registration order.
    pub fn add(&mut self, doctor: Doctor) -> ClinicResult<()> {
        if self.doctors.len() >= self.capacity {
            return Err(ClinicError::DoctorRegistryFull {
                capacity: self.capacity,
            });
        }
        self.doctors.push(doctor);
        Ok(())
    }

    /// Removes the first doctor with `id`, shifting later doctors left.
    pub fn remove(&mut self, id: DoctorId) -> ClinicResult<Doctor> {
        let position = self
            .doctors
            .iter()
            .position(|d| d.id == id)
            .ok_or(ClinicError::DoctorNotFound(id))?;
        Ok(self.doctors.remove(position))
    }

    pub fn find(&self, id: DoctorId) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    fn find_mut(&mut self, id: DoctorId) -> ClinicResult<&mut Doctor> {
        self.doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ClinicError::DoctorNotFound(id))
    }

    /// Binds the doctor to `patient`.
    pub fn mark_busy(&mut self, id: DoctorId, patient: PatientId) -> ClinicResult<()> {
        let doctor = self.find_mut(id)?;
        if doctor.is_busy() {
            return Err(ClinicError::DoctorUnavailable(id));
        }
        doctor.set_attendance(Attendance::Seeing(patient));
        Ok(())
    }

    /// Releases the doctor, returning what it was attending before.
    pub fn mark_available(&mut self, id: DoctorId) -> ClinicResult<Attendance> {
        let doctor = self.find_mut(id)?;
        let attendance = doctor.attendance();
        if attendance == Attendance::Idle {
            return Err(ClinicError::DoctorNotBusy(id));
        }
        doctor.set_attendance(Attendance::Idle);
        Ok(attendance)
    }

    /// Detaches `patient` from the doctor seeing it, who stays busy until released.
    pub fn vacate(&mut self, patient: PatientId) -> Option<DoctorId> {
        let doctor = self
            .doctors
            .iter_mut()
            .find(|d| d.attending() == Some(patient))?;
        doctor.set_attendance(Attendance::Vacated(patient));
        Some(doctor.id)
    }

    /// Bumps the attended counter and returns its new value.
    pub fn increment_attended(&mut self, id: DoctorId) -> ClinicResult<u32> {
        Ok(self.find_mut(id)?.record_attendance())
    }

    /// The doctor currently attending `patient`, if any.
    pub fn attending(&self, patient: PatientId) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.attending() == Some(patient))
    }

    /// Doctors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.iter()
    }
}
