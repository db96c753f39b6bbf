use clinic_types::{DoctorId, PatientId, TextError};

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),

    #[error("patient table is full (capacity {capacity})")]
    PatientStoreFull { capacity: usize },
    #[error("doctor registry is full (capacity {capacity})")]
    DoctorRegistryFull { capacity: usize },
    #[error("waiting queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("patient {0} already exists")]
    DuplicatePatientId(PatientId),
    #[error("doctor {0} already exists")]
    DuplicateDoctorId(DoctorId),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("doctor {0} not found")]
    DoctorNotFound(DoctorId),
    #[error("patient {0} is already waiting in the queue")]
    AlreadyQueued(PatientId),

    #[error("patient {patient} is currently being seen by doctor {doctor}")]
    PatientInConsultation { patient: PatientId, doctor: DoctorId },
    #[error("doctor {0} is currently busy")]
    DoctorUnavailable(DoctorId),
    #[error("doctor {0} is not busy")]
    DoctorNotBusy(DoctorId),
    #[error("visit history of patient {patient} is full ({capacity} visits)")]
    VisitHistoryFull { patient: PatientId, capacity: usize },

    #[error("failed to read snapshot: {0}")]
    SnapshotRead(std::io::Error),
    #[error("failed to write snapshot: {0}")]
    SnapshotWrite(std::io::Error),
    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(bincode::error::EncodeError),
    #[error("failed to decode snapshot: {0}")]
    SnapshotDecode(bincode::error::DecodeError),
    #[error(
        "snapshot header declares {declared_patients} patients and {declared_doctors} doctors, \
         data holds {found_patients} and {found_doctors}"
    )]
    SnapshotCountMismatch {
        declared_patients: u32,
        declared_doctors: u32,
        found_patients: u32,
        found_doctors: u32,
    },

    #[error("failed to read roster: {0}")]
    RosterRead(std::io::Error),
    #[error("failed to parse roster: {0}")]
    RosterParse(serde_json::Error),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
