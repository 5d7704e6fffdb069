use arping::{Arping, Config, Error, PingResult};
use std::net::Ipv4Addr;
use std::process;
use tokio::runtime;
use tracing::Level;

mod args;
mod duration;

use args::{ArgsError, Command, Options};

fn main() {
    let code = match args::parse(std::env::args_os()) {
        Ok(Command::Help) => {
            print_help();
            2
        }
        Ok(Command::Run(options)) => run(options),
        Err(ArgsError::MissingIp) => {
            println!("{}", ArgsError::MissingIp);
            print_help();
            2
        }
        Err(e) => {
            println!("{}", e);
            2
        }
    };
    process::exit(code);
}

fn print_help() {
    if args::app().print_help().is_ok() {
        println!();
    }
}

fn run(options: Options) -> i32 {
    init_logging(options.verbose);

    let rt = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            println!("{}", e);
            return 2;
        }
    };
    let outcome = rt.block_on(execute(&options));
    report(options.ip, outcome)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout)
        .init();
}

#[cfg(target_os = "linux")]
async fn execute(options: &Options) -> arping::Result<Vec<PingResult>> {
    let config = Config::new()
        .with_timeout(options.timeout)
        .with_verbose(options.verbose);
    let arping = Arping::new(config);

    match (&options.interface, options.gratuitous) {
        (Some(iface), true) => arping
            .gratuitous_arp_over_interface_by_name(options.ip, iface)
            .await
            .map(|()| Vec::new()),
        (None, true) => arping.gratuitous_arp(options.ip).await.map(|()| Vec::new()),
        (Some(iface), false) => arping.ping_over_interface_by_name(options.ip, iface).await,
        (None, false) => arping.ping(options.ip).await,
    }
}

#[cfg(not(target_os = "linux"))]
async fn execute(_options: &Options) -> arping::Result<Vec<PingResult>> {
    Err(Error::Transport(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "raw ARP sockets are only available on linux",
    )))
}

/// Prints the outcome and maps it to the process exit code.
fn report(ip: Ipv4Addr, outcome: arping::Result<Vec<PingResult>>) -> i32 {
    match outcome {
        Ok(results) => {
            for result in results {
                println!("{}", format_result(ip, &result));
            }
            0
        }
        Err(e) => {
            println!("{}", e);
            exit_code(&e)
        }
    }
}

fn exit_code(e: &Error) -> i32 {
    if e.is_timeout() {
        1
    } else {
        2
    }
}

fn format_result(ip: Ipv4Addr, result: &PingResult) -> String {
    format!(
        "{} ({}) {} usec",
        ip,
        result.hw_addr,
        result.duration.as_micros()
    )
}
