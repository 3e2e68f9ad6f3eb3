// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod api;
mod bus;
mod classify;
mod command;
mod error;
mod favorites;
mod gateway;
mod metadata;
mod password;
mod session;
mod storage;
mod view;

use std::{path::PathBuf, process, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use command::{App, AuthMode, Command as _};
use error::Result;
use log::{debug, error, warn};
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::account::Login),
    Logout(command::account::Logout),
    Register(command::account::Register),
    Whoami(command::account::Whoami),
    Watch(command::watch::Watch),
    #[command(subcommand)]
    Restaurants(command::restaurants::Command),
    #[command(subcommand)]
    Bookings(command::bookings::Command),
    #[command(subcommand)]
    Favorites(command::favorites::Command),
    #[command(subcommand)]
    Reviews(command::reviews::Command),
}

#[async_trait]
impl command::Command for Command {
    fn context(&self) -> classify::Context {
        match *self {
            Self::Login(ref cmd) => cmd.context(),
            Self::Logout(ref cmd) => cmd.context(),
            Self::Register(ref cmd) => cmd.context(),
            Self::Whoami(ref cmd) => cmd.context(),
            Self::Watch(ref cmd) => cmd.context(),
            Self::Restaurants(ref cmd) => cmd.context(),
            Self::Bookings(ref cmd) => cmd.context(),
            Self::Favorites(ref cmd) => cmd.context(),
            Self::Reviews(ref cmd) => cmd.context(),
        }
    }

    async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(app).await,
            Self::Logout(cmd) => cmd.execute(app).await,
            Self::Register(cmd) => cmd.execute(app).await,
            Self::Whoami(cmd) => cmd.execute(app).await,
            Self::Watch(cmd) => cmd.execute(app).await,
            Self::Restaurants(cmd) => cmd.execute(app).await,
            Self::Bookings(cmd) => cmd.execute(app).await,
            Self::Favorites(cmd) => cmd.execute(app).await,
            Self::Reviews(cmd) => cmd.execute(app).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the restaurant booking API.
    #[arg(long, env = "TABLETOP_API_URL", default_value = "http://localhost:8080/api", value_parser = Url::parse)]
    base_url: Url,

    /// Seconds to wait for the API before giving up on a request.
    #[arg(long, env = "TABLETOP_TIMEOUT", default_value_t = gateway::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Keep the session in memory only, so it ends with this process.
    #[arg(long)]
    no_persist_session: bool,

    /// Where to keep the session. Defaults to a file in the platform data
    /// directory.
    #[arg(long, env = "TABLETOP_SESSION_FILE", value_hint = clap::ValueHint::FilePath)]
    session_file: Option<PathBuf>,

    /// How `login` checks credentials.
    #[arg(long, env = "TABLETOP_AUTH", value_enum, default_value_t)]
    auth: AuthMode,

    /// How often `watch` re-reads the stored session, in milliseconds.
    /// Defaults to once a second.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage> {
    if args.no_persist_session {
        return Box::new(storage::Memory::new());
    }

    let file = match args.session_file {
        Some(ref path) => Some(storage::File::at(path)),
        None => storage::File::new("session.json"),
    };
    if let Some(file) = file {
        debug!("Keeping the session in {}", file.path().display());
        return Box::new(file);
    }

    warn!(
        "We need to fall back to keeping the session in memory: {}",
        error::Storage::NoDataDirectory
    );
    Box::new(storage::Memory::new())
}

async fn run(args: Args) -> Result<()> {
    let store = session::Store::new(get_session_storage(&args));
    let bus = bus::Bus::new();
    let gateway = gateway::Gateway::new(
        &gateway::Config {
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout),
        },
        store,
        bus,
    )?;

    let app = App {
        gateway,
        auth: args.auth,
        prompt: Box::new(password::RpasswordPrompt),
        poll_interval: args
            .poll_interval_ms
            .map_or(view::DEFAULT_POLL_INTERVAL, Duration::from_millis),
    };

    command::Command::execute(args.command, &app).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("TABLETOP_LOG", "warn")
        .write_style("TABLETOP_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    let args = Args::parse();
    let context = command::Command::context(&args.command);
    if let Err(e) = run(args).await {
        error!("We encountered an error: {}", e);
        eprintln!("{}", classify::message(&e, context));
        process::exit(1);
    };
}
