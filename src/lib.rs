pub mod app;
pub mod capture;
pub mod commands;
pub mod config;
pub mod logging;
pub mod transcription;

#[cfg(test)]
pub mod test_support;
