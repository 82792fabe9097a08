use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use modisqa::config::MaskConfig;
use modisqa::utils::logger::Logger;
use modisqa::commands::{CommandFactory, ModisqaCommandFactory};

fn main() {
    let matches = ClapCommand::new("modisqa")
        .version("0.1.0")
        .about("Decode MODIS QA bands into quality masks")
        .arg(
            Arg::new("band")
                .short('b')
                .long("band")
                .help("QA or data band file as NAME=PATH (repeatable)")
                .value_name("NAME=PATH")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("product")
                .short('p')
                .long("product")
                .help("MODIS product name or alias (e.g. MOD09A1, modisEVI, land_surface_temperature)")
                .value_name("PRODUCT")
                .required(false),
        )
        .arg(
            Arg::new("night")
                .long("night")
                .help("Use the night QC band of land surface temperature (true/false)")
                .value_name("BOOL")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format (csv, json, npy, png); defaults to the output extension")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("apply")
                .long("apply")
                .help("Write this band with the quality mask applied instead of the mask")
                .value_name("BAND")
                .required(false),
        )
        .arg(
            Arg::new("bits")
                .long("bits")
                .help("Extract a bit field of a single band (e.g. '2-5' or '15')")
                .value_name("START-END")
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Decode scalar QA values, one per QA band of the product (e.g. '0x4,0')")
                .value_name("VALUES")
                .required(false),
        )
        .arg(
            Arg::new("list-products")
                .long("list-products")
                .help("List supported products and their QA rules")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .help("Grid size of raw binary bands")
                .value_name("WxH")
                .required(false),
        )
        .arg(
            Arg::new("byte-order")
                .long("byte-order")
                .help("Byte order of raw binary bands (little, big)")
                .value_name("ORDER")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML file with default settings")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log and operation records to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => match MaskConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => MaskConfig::default(),
    };

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level.unwrap_or(LevelFilter::Info)
    };

    let log_file = matches.get_one::<String>("log-file").or(config.log_file.as_ref());
    let disabled = Logger::disabled();
    let logger: &Logger = match log_file {
        Some(path) => match Logger::init_global_logger(path, level) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Error initializing logger: {}", e);
                process::exit(1);
            }
        },
        None => {
            Logger::init_console_logger(level);
            &disabled
        }
    };

    let factory = ModisqaCommandFactory::new();

    let command_result = factory.create_command(&matches, &config, logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
