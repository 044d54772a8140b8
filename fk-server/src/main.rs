mod config;
mod correlator;
mod error;
mod generate;
mod handlers;
mod mail;
mod middleware;
mod opts;
mod server;
mod store;
mod util;

pub use crate::error::*;

use crate::opts::{Opts, Subcommand};
use clap::Parser;

fn main() -> Result<(), ServerError> {
    let opts = Opts::parse();

    match opts.subcmd {
        Subcommand::Gen(o) => crate::generate::exec(&o),
        Subcommand::Form(o) => crate::generate::form(&o),
        Subcommand::Server(o) => crate::server::exec(o),
    }
}
