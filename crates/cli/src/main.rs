use clap::Parser;
use clinic_cli::commands::Cli;
use clinic_cli::config_from_env;
use clinic_cli::handlers::{execute, Change};
use clinic_core::{snapshot, SnapshotWarning};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let config = config_from_env(cli.data_file)?;
    let imported = snapshot::load(&config)?;
    if let Some(SnapshotWarning::NotFound(path)) = &imported.warning {
        tracing::info!("no snapshot at {}, starting empty", path.display());
    }
    let mut clinic = imported.clinic;

    let mut stdout = std::io::stdout().lock();
    match execute(&mut clinic, command, None, &mut stdout) {
        Ok(Change::Modified) => snapshot::save(&clinic, config.data_file())?,
        Ok(Change::Unchanged) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
