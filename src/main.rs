use clap::Parser;
use clinic_core::snapshot;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod shell;

#[derive(Parser)]
#[command(name = "clinic-run")]
#[command(about = "Interactive clinic triage shell")]
struct Args {
    /// Snapshot file to load at start and save on exit (overrides CLINIC_DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

/// Main entry point for the interactive clinic shell
///
/// Loads the snapshot, runs the read-eval loop until `exit` or end of input, and saves the
/// snapshot if anything changed.
///
/// # Environment Variables
/// - `CLINIC_DATA_FILE`: snapshot path (default: "hospital_data.bin")
/// - `CLINIC_PATIENT_CAPACITY`: patient table slots (default: 100)
/// - `CLINIC_DOCTOR_CAPACITY`: doctor registry slots (default: 30)
/// - `CLINIC_ASSIGNMENT_ATTEMPTS`: doctor choices per assignment (default: 3)
/// - `RUST_LOG`: log filter, on top of the default `clinic=info`
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("clinic=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = clinic_cli::config_from_env(args.data_file)?;

    // Load failures are logged and the shell starts empty. The unreadable file is moved
    // aside first so saving on exit leaves it intact.
    let clinic = match snapshot::load(&config) {
        Ok(imported) => imported.clinic,
        Err(e) => {
            tracing::error!("failed to load {}: {}", config.data_file().display(), e);
            if config.data_file().exists() {
                snapshot::set_aside(config.data_file())?;
            }
            clinic_core::Clinic::new(config.clone())?
        }
    };

    tracing::info!(
        "++ Clinic shell ready: {} patients, {} doctors, {} waiting",
        clinic.patients().len(),
        clinic.doctors().len(),
        clinic.queue().len()
    );

    shell::Shell::new(config, clinic)?.run()
}
