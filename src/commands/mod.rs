//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
mod args;
pub mod mask_command;
pub mod bits_command;
pub mod inspect_command;
pub mod products_command;

pub use command_traits::{Command, CommandFactory};
pub use mask_command::MaskCommand;
pub use bits_command::BitsCommand;
pub use inspect_command::InspectCommand;
pub use products_command::ProductsCommand;

use clap::ArgMatches;
use crate::config::MaskConfig;
use crate::utils::logger::Logger;
use crate::qa::errors::QaResult;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct ModisqaCommandFactory;

impl ModisqaCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ModisqaCommandFactory
    }
}

impl<'a> CommandFactory<'a> for ModisqaCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &MaskConfig, logger: &'a Logger)
        -> QaResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.get_flag("list-products") {
            Ok(Box::new(ProductsCommand::new()))
        } else if args.contains_id("inspect") {
            Ok(Box::new(InspectCommand::new(args, config, logger)?))
        } else if args.contains_id("bits") {
            Ok(Box::new(BitsCommand::new(args, config, logger)?))
        } else {
            // Default to mask command
            Ok(Box::new(MaskCommand::new(args, config, logger)?))
        }
    }
}
