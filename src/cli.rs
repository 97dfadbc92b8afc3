// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::debug;
use ntpsync_client::clock::{OsClock, SystemClockSetter};
use ntpsync_client::error::NtpError;
use ntpsync_client::sync::{SyncOptions, synchronize};
use ntpsync_client::{AddressPolicy, DEFAULT_TIMEOUT, NtpTransport};
use ntpsync_proto::UtcInstant;

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_SERVER};

/// Exit code when the time could not be fetched.
pub const EXIT_FETCH_FAILED: u8 = 1;

/// Exit code when the time was fetched but the clock could not be set.
pub const EXIT_CLOCK_SET_FAILED: u8 = 2;

/// Fetch the current time from an NTP server and optionally set the system clock
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ntpsync", version)]
pub struct Args {
    /// NTP server host name or address [default: from the config file, else time.windows.com]
    pub server: Option<String>,

    /// Set the system clock to the fetched time (requires root/administrator)
    #[arg(long)]
    pub set_clock: bool,

    /// Reply timeout in milliseconds [default: from the config file, else 3000]
    #[arg(long, value_name = "N")]
    pub timeout_ms: Option<u64>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Prefer the server's IPv6 address (IPv4 is used when it has none)
    #[arg(long)]
    pub ipv6: bool,
}

/// What one run does, after the command line and configuration file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Server to query.
    pub server: String,
    /// Reply timeout.
    pub timeout: Duration,
    /// Address family selection.
    pub policy: AddressPolicy,
    /// Whether to write the system clock.
    pub set_clock: bool,
}

impl Settings {
    /// Merge `args` over `config`; anything neither names takes the built-in default.
    pub fn resolve(args: &Args, config: Option<&AppConfig>) -> Settings {
        let server = args
            .server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| config.and_then(AppConfig::server))
            .unwrap_or(DEFAULT_SERVER)
            .to_owned();
        let timeout = args
            .timeout_ms
            .map(Duration::from_millis)
            .or_else(|| config.and_then(AppConfig::timeout))
            .unwrap_or(DEFAULT_TIMEOUT);
        let policy = if args.ipv6 {
            AddressPolicy::PreferIpv6
        } else {
            AddressPolicy::Ipv4Only
        };

        Settings {
            server,
            timeout,
            policy,
            set_clock: args.set_clock,
        }
    }

    /// Transport configured with this run's timeout and address policy.
    pub fn transport(&self) -> NtpTransport {
        NtpTransport::new()
            .with_timeout(self.timeout)
            .with_address_policy(self.policy)
    }
}

/// Run one query with already parsed arguments.
pub fn run(args: Args) -> ExitCode {
    let config = AppConfig::load(&args.config);
    let settings = Settings::resolve(&args, config.as_ref());
    debug!("{:?}", settings);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = execute(
        &settings.transport(),
        &settings.server,
        settings.set_clock,
        &OsClock,
        &mut stdout.lock(),
        &mut stderr.lock(),
    );
    ExitCode::from(code)
}

/// Query `server`, optionally apply the result to `clock`, report to `out`/`err`, and return
/// the process exit code.
pub fn execute<C, O, E>(
    transport: &NtpTransport,
    server: &str,
    set_clock: bool,
    clock: &C,
    out: &mut O,
    err: &mut E,
) -> u8
where
    C: SystemClockSetter + ?Sized,
    O: Write,
    E: Write,
{
    let options = SyncOptions {
        timeout: None,
        set_clock,
    };

    // Console write failures (closed pipe) do not change the outcome.
    match synchronize(transport, server, &options, clock) {
        Ok(outcome) => {
            let _ = report_time(out, &outcome.server, outcome.instant);
            if outcome.clock_set {
                let _ = writeln!(out, "System time synchronized successfully!");
            }
            0
        }
        Err(NtpError::ClockSetFailed(e)) => {
            let _ = report_time(out, server, e.instant);
            let _ = writeln!(
                err,
                "Failed to set system time ({}). Make sure ntpsync is running with administrator/root privileges.",
                e.cause
            );
            EXIT_CLOCK_SET_FAILED
        }
        Err(e) => {
            let _ = writeln!(err, "Error getting network time: {}", e);
            EXIT_FETCH_FAILED
        }
    }
}

fn report_time<W: Write>(out: &mut W, server: &str, instant: UtcInstant) -> io::Result<()> {
    writeln!(out, "Get time successfully on {}!", server)?;
    writeln!(
        out,
        "New time: {}",
        instant.to_local().format("%Y-%m-%d %H:%M:%S%.3f %:z")
    )
}
