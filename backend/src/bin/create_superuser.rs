//! Create a privileged (staff and superuser) account.
//!
//! The password is read from `ACCOUNTS_SUPERUSER_PASSWORD` when set, otherwise
//! from the first line of standard input.

use std::env;
use std::io::{self, BufRead};
use std::sync::Arc;

use accounts::domain::{AccountManager, Password};
use accounts::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
use accounts::settings::DATABASE_URL_FALLBACK;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

/// Environment variable holding the new account's password.
const PASSWORD_ENV: &str = "ACCOUNTS_SUPERUSER_PASSWORD";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff and superuser account",
    version
)]
struct CliArgs {
    /// Email address of the new account.
    #[arg(long, value_name = "email")]
    email: String,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let database_url = args
        .database_url
        .clone()
        .or_else(|| env::var(DATABASE_URL_FALLBACK).ok())
        .ok_or_else(|| eyre!("missing --database-url and {DATABASE_URL_FALLBACK} is unset"))?;
    let password = read_password(io::stdin().lock())?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async move {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("connect to database")?;
        let manager = AccountManager::new(
            Arc::new(DieselAccountRepository::new(pool)),
            Arc::new(DefaultClock),
        );
        let account = manager
            .create_superuser(args.email, password)
            .await
            .map_err(|err| eyre!("{}", err.message()))?;
        println!("Superuser created: {}", account.email());
        Ok::<(), color_eyre::Report>(())
    })
}

fn read_password(input: impl BufRead) -> Result<Password> {
    let raw = match env::var(PASSWORD_ENV) {
        Ok(value) => Zeroizing::new(value),
        Err(_) => read_first_line(input)?,
    };
    Password::new(raw.as_str()).map_err(|err| eyre!("{err}"))
}

fn read_first_line(mut input: impl BufRead) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    input
        .read_line(&mut line)
        .wrap_err("read password from stdin")?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("s3cret!\n", "s3cret!")]
    #[case("s3cret!\r\n", "s3cret!")]
    #[case(" spaced \n", " spaced ")]
    fn first_line_drops_only_the_line_ending(#[case] input: &str, #[case] expected: &str) {
        let line = read_first_line(input.as_bytes()).expect("readable input");
        assert_eq!(line.as_str(), expected);
    }
}
