//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use pet_admin_core::config::CONFIG_ENV;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("TEXT").help(help)
}

#[must_use]
pub fn command() -> Command {
    Command::new("pet-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pet listing administration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .env(CONFIG_ENV)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Override api.base_url"),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the guarded admin surface")
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .default_value(DEFAULT_BIND)
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Load a record, apply edits and submit the update")
                .arg(Arg::new("id").required(true).help("Record id"))
                .arg(text_arg("name", "New name"))
                .arg(text_arg("age", "New age in years"))
                .arg(text_arg("description", "New description (max 255 characters)"))
                .arg(text_arg("breed", "Breed option id, e.g. hound/afghan"))
                .arg(text_arg("sex", "Fêmea or Macho"))
                .arg(text_arg("weight", "Pequeno, Médio or Grande"))
                .arg(
                    Arg::new("image")
                        .long("image")
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Replace the image with a local file"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Validate and print the payload without sending it"),
                ),
        )
        .subcommand(Command::new("breeds").about("List breed options from the taxonomy"))
}
