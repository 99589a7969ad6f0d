#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use lambda::LambdaConfig;
pub use toml_config::TomlConfig;

/// Glue crawler started after each successful conversion.
pub const DEFAULT_CRAWLER_NAME: &str = "bank-cutomers-crwlr";
