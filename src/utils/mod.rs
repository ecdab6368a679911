/// TOML configuration (server, auth, database).
pub mod toml_config;
