#[cfg(test)]
mod domain_error_tests;
