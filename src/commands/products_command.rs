//! Product listing command
//!
//! Prints every supported product with its aliases and QA rule table.

use crate::commands::command_traits::Command;
use crate::qa::errors::QaResult;
use crate::qa::product::ProductKind;
use crate::qa::rules::RuleSet;

/// Command for listing supported products
pub struct ProductsCommand;

impl ProductsCommand {
    pub fn new() -> Self {
        ProductsCommand
    }

    /// Describe one product and its rules
    pub fn describe(product: ProductKind) -> QaResult<String> {
        let mut text = format!("{}", product);
        if let Some(info) = product.info() {
            text.push_str(&format!(" ({}): {}\n", info.collection, info.description));
            text.push_str(&format!("  aliases: {}\n", info.aliases.join(", ")));
        } else {
            text.push('\n');
        }

        // Day QC band stands in for both temperature rule sets
        let night = if product.requires_night_flag() { Some(false) } else { None };
        let rule_set = RuleSet::for_product(product, night)?;
        for rule in rule_set.rules {
            text.push_str(&format!("  {}\n", rule));
        }
        if product.requires_night_flag() {
            text.push_str("  (QC_Night replaces QC_Day with --night true)\n");
        }
        Ok(text)
    }
}

impl Command for ProductsCommand {
    fn execute(&self) -> QaResult<()> {
        for product in ProductKind::ALL {
            print!("{}", Self::describe(product)?);
        }
        Ok(())
    }
}
