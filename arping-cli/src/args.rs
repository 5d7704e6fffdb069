use crate::duration::parse_duration;
use clap::{App, AppSettings, Arg, ArgMatches};
use std::ffi::OsString;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

pub const EXIT_CODES: &str = "EXIT CODES:
    0    target online
    1    target offline
    2    error occurred";

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub ip: Ipv4Addr,
    pub verbose: bool,
    pub gratuitous: bool,
    pub interface: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Run(Options),
}

#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("{}", .0.message)]
    Usage(#[from] clap::Error),
    #[error("Parameter <IP> missing!")]
    MissingIp,
    #[error(transparent)]
    Ip(#[from] arping::Error),
}

pub fn app() -> App<'static, 'static> {
    App::new("arping")
        .about("Ping a host on the local network by ARP")
        .setting(AppSettings::DisableHelpFlags)
        .setting(AppSettings::DisableVersion)
        .after_help(EXIT_CODES)
        .arg(
            Arg::with_name("print-help")
                .short("h")
                .help("print this help"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .help("verbose output"),
        )
        .arg(
            Arg::with_name("gratuitous")
                .short("U")
                .help("send an unsolicited (gratuitous) ARP announcement"),
        )
        .arg(
            Arg::with_name("interface")
                .short("i")
                .value_name("IFACE")
                .takes_value(true)
                .help("interface to use, autodetected if omitted"),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .value_name("DURATION")
                .takes_value(true)
                .default_value("500ms")
                .help("how long to wait for replies, e.g. 100ms, 1.5s, 1m30s")
                .validator(|t| parse_duration(&t).map(|_| ()).map_err(|e| e.to_string())),
        )
        .arg(
            Arg::with_name("IP")
                .index(1)
                .help("IPv4 address to ping"),
        )
}

pub fn parse<I, T>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = app().get_matches_from_safe(args)?;
    if matches.is_present("print-help") {
        return Ok(Command::Help);
    }
    options(&matches).map(Command::Run)
}

fn options(matches: &ArgMatches) -> Result<Options, ArgsError> {
    let ip = matches.value_of("IP").ok_or(ArgsError::MissingIp)?;
    let timeout = match matches.value_of("timeout") {
        // already checked by the validator
        Some(t) => parse_duration(t).map_err(|e| {
            clap::Error::with_description(&e.to_string(), clap::ErrorKind::InvalidValue)
        })?,
        None => arping::DEFAULT_TIMEOUT,
    };

    Ok(Options {
        ip: arping::parse_ipv4(ip)?,
        verbose: matches.is_present("verbose"),
        gratuitous: matches.is_present("gratuitous"),
        interface: matches.value_of("interface").map(str::to_string),
        timeout,
    })
}
