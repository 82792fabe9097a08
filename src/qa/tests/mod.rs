mod test_utils;
mod rules_tests;
mod decoder_tests;
mod masking_tests;
