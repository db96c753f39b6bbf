//! Binary snapshot of a clinic.
//!
//! Layout:
//!
//! | Section  | Encoding                                                        |
//! |----------|-----------------------------------------------------------------|
//! | header   | `u32` stored patients, `u32` registered doctors (little-endian) |
//! | patients | one [`Slot`] per patient-table slot, table order                |
//! | doctors  | one `Option<Doctor>` per registry slot, occupied slots first    |
//! | queue    | `Vec<QueueEntry>` head to tail; absent in older snapshots       |
//!
//! Slots are encoded one after another with bincode's standard configuration. The table is
//! written at its full capacity so that every patient stays in the slot its id hashes to,
//! which means a snapshot must be read back with the capacities it was written with.
//!
//! Reading is lenient about truncation and strict about inconsistency. A file that ends early
//! keeps whatever was decoded and reports [`SnapshotWarning::Incomplete`]; a file whose
//! sections are complete but disagree with the header is rejected.

use crate::clinic::Clinic;
use crate::config::CoreConfig;
use crate::doctor::Doctor;
use crate::doctor_registry::DoctorRegistry;
use crate::patient_store::{PatientStore, Slot};
use crate::triage_queue::{QueueEntry, TriageQueue};
use crate::{ClinicError, ClinicResult};
use bincode::error::DecodeError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

const HEADER_LEN: usize = 8;

/// A non-fatal problem found while loading a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotWarning {
    /// No snapshot exists yet; the clinic starts empty.
    NotFound(PathBuf),
    /// The snapshot ended before all sections were read.
    Incomplete {
        patient_slots_read: usize,
        doctor_slots_read: usize,
        queue_restored: bool,
    },
}

impl std::fmt::Display for SnapshotWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotWarning::NotFound(path) => {
                write!(f, "no snapshot at {}, starting empty", path.display())
            }
            SnapshotWarning::Incomplete {
                patient_slots_read,
                doctor_slots_read,
                queue_restored,
            } => write!(
                f,
                "snapshot is truncated: read {} patient slots and {} doctor slots{}",
                patient_slots_read,
                doctor_slots_read,
                if *queue_restored { "" } else { ", queue not restored" }
            ),
        }
    }
}

/// A clinic restored from a snapshot.
#[derive(Debug)]
pub struct Imported {
    pub clinic: Clinic,
    pub warning: Option<SnapshotWarning>,
}

fn encode_into<T: Serialize>(buffer: &mut Vec<u8>, value: &T) -> ClinicResult<()> {
    let bytes = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(ClinicError::SnapshotEncode)?;
    buffer.extend_from_slice(&bytes);
    Ok(())
}

fn count(len: usize) -> ClinicResult<u32> {
    u32::try_from(len).map_err(|_| ClinicError::InvalidInput(format!("count {len} exceeds u32")))
}

/// Encodes the whole clinic.
pub fn export(clinic: &Clinic) -> ClinicResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .write_u32::<LittleEndian>(count(clinic.patients().len())?)
        .map_err(ClinicError::SnapshotWrite)?;
    buffer
        .write_u32::<LittleEndian>(count(clinic.doctors().len())?)
        .map_err(ClinicError::SnapshotWrite)?;

    for slot in clinic.patients().slots() {
        encode_into(&mut buffer, slot)?;
    }

    let mut doctors = clinic.doctors().iter();
    for _ in 0..clinic.doctors().capacity() {
        encode_into(&mut buffer, &doctors.next())?;
    }

    let queue: Vec<QueueEntry> = clinic.queue_entries().copied().collect();
    encode_into(&mut buffer, &queue)?;

    Ok(buffer)
}

/// Writes the clinic to `path`, replacing any previous snapshot.
pub fn save(clinic: &Clinic, path: &Path) -> ClinicResult<()> {
    let bytes = export(clinic)?;
    fs::write(path, &bytes).map_err(ClinicError::SnapshotWrite)?;
    tracing::info!(
        "saved {} patients and {} doctors to {}",
        clinic.patients().len(),
        clinic.doctors().len(),
        path.display()
    );
    Ok(())
}

/// Walks the encoded sections, tracking the read position.
struct Reader<'b> {
    bytes: &'b [u8],
    offset: usize,
}

impl<'b> Reader<'b> {
    /// `Ok(None)` when the input ends before a complete value.
    fn next<T: DeserializeOwned>(&mut self) -> ClinicResult<Option<T>> {
        let rest = &self.bytes[self.offset..];
        if rest.is_empty() {
            return Ok(None);
        }
        match bincode::serde::decode_from_slice::<T, _>(rest, bincode::config::standard()) {
            Ok((value, read)) => {
                self.offset += read;
                Ok(Some(value))
            }
            Err(DecodeError::UnexpectedEnd { .. }) => {
                self.offset = self.bytes.len();
                Ok(None)
            }
            Err(err) => Err(ClinicError::SnapshotDecode(err)),
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

/// Restores a clinic from snapshot bytes, sized by `config`.
pub fn import(bytes: &[u8], config: &CoreConfig) -> ClinicResult<Imported> {
    let mut header = Cursor::new(bytes);
    let declared_patients = header
        .read_u32::<LittleEndian>()
        .map_err(ClinicError::SnapshotRead)?;
    let declared_doctors = header
        .read_u32::<LittleEndian>()
        .map_err(ClinicError::SnapshotRead)?;

    let mut reader = Reader {
        bytes,
        offset: HEADER_LEN,
    };

    let mut slots = Vec::with_capacity(config.patient_capacity());
    while slots.len() < config.patient_capacity() {
        match reader.next::<Slot>()? {
            Some(slot) => slots.push(slot),
            None => break,
        }
    }
    let patient_slots_read = slots.len();
    // A slot that could not be read may have been part of a probe chain.
    slots.resize(config.patient_capacity(), Slot::Tombstone);

    let mut doctors = DoctorRegistry::new(config.doctor_capacity())?;
    let mut doctor_slots_read = 0;
    if patient_slots_read == config.patient_capacity() {
        while doctor_slots_read < config.doctor_capacity() {
            match reader.next::<Option<Doctor>>()? {
                Some(Some(doctor)) => {
                    doctor.check_invariants()?;
                    if doctors.find(doctor.id).is_some() {
                        return Err(ClinicError::DuplicateDoctorId(doctor.id));
                    }
                    doctors.add(doctor)?;
                }
                Some(None) => {}
                None => break,
            }
            doctor_slots_read += 1;
        }
    }

    let patients = PatientStore::from_slots(slots)?;
    let sections_complete = patient_slots_read == config.patient_capacity()
        && doctor_slots_read == config.doctor_capacity();

    if sections_complete
        && (patients.len() != declared_patients as usize
            || doctors.len() != declared_doctors as usize)
    {
        return Err(ClinicError::SnapshotCountMismatch {
            declared_patients,
            declared_doctors,
            found_patients: count(patients.len())?,
            found_doctors: count(doctors.len())?,
        });
    }

    let mut queue = TriageQueue::new(config.queue_capacity())?;
    let mut queue_restored = false;
    if sections_complete {
        if reader.remaining() == 0 {
            queue_restored = true;
        } else if let Some(entries) = reader.next::<Vec<QueueEntry>>()? {
            for entry in entries {
                queue.enqueue(entry.patient_id, entry.priority)?;
            }
            queue_restored = true;
            if reader.remaining() > 0 {
                tracing::warn!("ignoring {} trailing snapshot bytes", reader.remaining());
            }
        }
    }

    let warning = (!sections_complete || !queue_restored).then_some(SnapshotWarning::Incomplete {
        patient_slots_read,
        doctor_slots_read,
        queue_restored,
    });

    Ok(Imported {
        clinic: Clinic::from_parts(config.clone(), patients, doctors, queue),
        warning,
    })
}

/// Loads the snapshot at the configured data file.
///
/// A missing file is not an error: the clinic starts empty with a
/// [`SnapshotWarning::NotFound`] warning.
pub fn load(config: &CoreConfig) -> ClinicResult<Imported> {
    let path = config.data_file();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(Imported {
                clinic: Clinic::new(config.clone())?,
                warning: Some(SnapshotWarning::NotFound(path.to_path_buf())),
            });
        }
        Err(err) => return Err(ClinicError::SnapshotRead(err)),
    };

    let imported = import(&bytes, config)?;
    match &imported.warning {
        Some(warning) => tracing::warn!("{}: {}", path.display(), warning),
        None => tracing::info!(
            "loaded {} patients and {} doctors from {}",
            imported.clinic.patients().len(),
            imported.clinic.doctors().len(),
            path.display()
        ),
    }
    Ok(imported)
}

/// Renames an unreadable snapshot to `<name>.corrupt` so a later save cannot overwrite it.
///
/// Returns the new path. An existing `.corrupt` file is replaced.
pub fn set_aside(path: &Path) -> ClinicResult<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    let target = path.with_file_name(name);
    fs::rename(path, &target).map_err(ClinicError::SnapshotWrite)?;
    tracing::warn!("moved unreadable snapshot {} to {}", path.display(), target.display());
    Ok(target)
}
