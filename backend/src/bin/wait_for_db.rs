//! Block until the database accepts connections.
//!
//! Prints progress to stdout and exits with status 1 when the configured
//! attempt cap or timeout is exhausted. Policy values come from
//! `ACCOUNTS_WAIT_*` variables or the matching flags; the defaults retry
//! every second forever.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use accounts::domain::{WaitEvent, wait_for_database};
use accounts::outbound::persistence::PgConnectionProbe;
use accounts::settings::DatabaseWaitSettings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "database wait failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    let settings = DatabaseWaitSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("invalid configuration: {err}")))?;
    let database_url = settings.database_url().ok_or_else(|| {
        io::Error::other("no database configured; set ACCOUNTS_DATABASE_URL or DATABASE_URL")
    })?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;

    let probe = PgConnectionProbe::new(database_url);
    let mut stdout = io::stdout();
    let mut observer = |event: &WaitEvent| {
        if let Err(error) = writeln!(stdout, "{}", status_line(event)) {
            error!(%error, "failed to write status line");
        }
    };
    runtime
        .block_on(wait_for_database(&probe, &settings.policy(), &mut observer))
        .map(|_| ())
        .map_err(io::Error::other)
}

fn status_line(event: &WaitEvent) -> String {
    match event {
        WaitEvent::Waiting => "Waiting for database...".to_owned(),
        WaitEvent::Unavailable { retry_in, .. } => format!(
            "Database unavailable, waiting {} seconds...",
            format_seconds(*retry_in)
        ),
        WaitEvent::Available { .. } => "Database available!".to_owned(),
    }
}

fn format_seconds(delay: Duration) -> String {
    match delay.subsec_millis() {
        0 => delay.as_secs().to_string(),
        millis => format!("{}.{millis:03}", delay.as_secs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WaitEvent::Waiting, "Waiting for database...")]
    #[case(
        WaitEvent::Unavailable { attempt: 1, retry_in: Duration::from_secs(1), reason: "refused".to_owned() },
        "Database unavailable, waiting 1 seconds..."
    )]
    #[case(
        WaitEvent::Unavailable { attempt: 2, retry_in: Duration::from_millis(2500), reason: "refused".to_owned() },
        "Database unavailable, waiting 2.500 seconds..."
    )]
    #[case(WaitEvent::Available { attempts: 3 }, "Database available!")]
    fn status_lines_match_command_output(#[case] event: WaitEvent, #[case] expected: &str) {
        assert_eq!(status_line(&event), expected);
    }
}
