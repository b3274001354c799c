use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use generate_snippet_docs::{run, ExtractorConfig};

fn build_cli() -> Command {
    Command::new("generate_snippet_docs")
        .version("0.1.0")
        .about("Extracts tagged code snippets into per-module HOW-TO pages and builds their tables of contents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("source")
                .long("source")
                .value_name("DIR")
                .required(true)
                .help("Directory scanned for source files"),
        )
        .arg(
            Arg::new("source_files_regex")
                .long("source-files-regex")
                .value_name("REGEX")
                .default_value(r"\.js$")
                .help("Regular expression selecting the source files to scan"),
        )
        .arg(
            Arg::new("destination")
                .long("destination")
                .value_name("DIR")
                .default_value("snippets")
                .help("Directory receiving the generated pages"),
        )
        .arg(
            Arg::new("destination_files_extension")
                .long("destination-files-extension")
                .value_name("EXT")
                .default_value("md")
                .help("File extension of the generated pages"),
        )
        .arg(
            Arg::new("noclean")
                .long("noclean")
                .action(ArgAction::SetTrue)
                .help("Keep existing files in the destination directory"),
        )
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("ERROR: {:#}", err);
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            // Help output is not an error.
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let config = ExtractorConfig {
        source: PathBuf::from(matches.get_one::<String>("source").unwrap()),
        source_files_regex: matches
            .get_one::<String>("source_files_regex")
            .unwrap()
            .clone(),
        destination: PathBuf::from(matches.get_one::<String>("destination").unwrap()),
        destination_files_extension: matches
            .get_one::<String>("destination_files_extension")
            .unwrap()
            .clone(),
        noclean: *matches.get_one::<bool>("noclean").unwrap(),
    };

    run(config)?;
    println!("Success.");
    Ok(())
}
