#[cfg(test)]
mod connection_tests;
