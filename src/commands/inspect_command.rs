//! QA value inspection command
//!
//! Decodes scalar QA values field by field and reports which rules of
//! the product pass, which is handy when checking a suspicious pixel.

use clap::ArgMatches;

use crate::api::ModisQa;
use crate::commands::args;
use crate::commands::command_traits::Command;
use crate::config::MaskConfig;
use crate::qa::errors::{QaError, QaResult};
use crate::qa::product::ProductKind;
use crate::qa::rules::Inspection;
use crate::utils::logger::Logger;
use crate::utils::parse_utils;

/// Command for decoding scalar QA values
pub struct InspectCommand<'a> {
    product: ProductKind,
    night: Option<bool>,
    /// One value per QA band of the product
    values: Vec<u32>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    /// Create a new inspect command
    pub fn new(args: &ArgMatches, config: &MaskConfig, logger: &'a Logger) -> QaResult<Self> {
        let values = args.get_one::<String>("inspect")
            .ok_or_else(|| QaError::invalid_argument("value", "missing QA value"))
            .and_then(|text| parse_utils::parse_value_list(text))?;

        Ok(InspectCommand {
            product: args::product(args, config)?,
            night: args::night(args, config)?,
            values,
            logger,
        })
    }

    /// Render the per-field report
    pub fn format_report(inspection: &Inspection, values: &[u32]) -> String {
        let mut report = format!("{} QA value(s) {:?}:\n", inspection.product, values);
        for verdict in &inspection.fields {
            report.push_str(&format!(
                "  {:<10} bits {:<5} {:<18} = {:<3} ({}) {}\n",
                verdict.rule.band,
                verdict.rule.bits.to_string(),
                verdict.rule.field,
                verdict.decoded,
                verdict.rule.predicate,
                if verdict.passed { "ok" } else { "FAIL" },
            ));
        }
        report.push_str(if inspection.is_good() { "  => good quality\n" } else { "  => bad quality\n" });
        report
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> QaResult<()> {
        let inspection = ModisQa::new().inspect(self.product, self.night, &self.values)?;
        let report = Self::format_report(&inspection, &self.values);
        print!("{}", report);
        self.logger.log(report.trim_end())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_marks_failures() {
        let inspection = ModisQa::new().inspect(ProductKind::Fpar, None, &[0b1000]).unwrap();
        let report = InspectCommand::format_report(&inspection, &[0b1000]);
        assert!(report.contains("Cloud State"));
        assert!(report.contains("FAIL"));
        assert!(report.ends_with("=> bad quality\n"));
    }
}
