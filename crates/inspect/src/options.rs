//! Options contracts of the inspect binary

use cfgbind::{config_enum, contract};

config_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LogFormat {
        Json = "json",
        Pretty = "pretty",
    }
}

contract! {
    /// Logging options
    pub struct LoggingOptions {
        /// Filter directive, overridden by RUST_LOG
        fn level("logLevel", rename = "log.level") -> String = String::from("info");
        fn format("logFormat", rename = "log.format") -> LogFormat = LogFormat::Pretty;
    }
}

contract! {
    /// Options read from the command line before any other source
    pub struct InspectOptions {
        /// YAML file merged below the command line
        fn config_file("config") -> String = String::new();
        /// Prefix of environment variables merged below the command line
        fn env_prefix("envPrefix") -> String = String::new();
        /// Merge the whole process environment as properties
        fn system_properties("systemProperties") -> bool = false;
        /// Only dump these keys
        fn keys("keys") -> Vec<String> = Vec::new();
        nested fn logging("logging") -> LoggingOptions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgbind::Configuration;

    #[test]
    fn test_defaults() {
        let config = Configuration::new();
        let options: InspectOptions = config.bind();

        assert_eq!(options.config_file().unwrap(), "");
        assert!(!options.system_properties().unwrap());
        assert!(options.keys().unwrap().is_empty());
        assert_eq!(options.logging().level().unwrap(), "info");
        assert_eq!(options.logging().format().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_from_arguments() {
        let mut config = Configuration::new();
        config
            .add_tokens([
                "--config=app.yaml",
                "--systemProperties",
                "--keys=server.port, server.host",
                "--log.level=debug",
                "--log.format=json",
            ])
            .unwrap();

        let options: InspectOptions = config.bind();
        assert_eq!(options.config_file().unwrap(), "app.yaml");
        assert!(options.system_properties().unwrap());
        assert_eq!(options.keys().unwrap(), vec!["server.port", "server.host"]);
        assert_eq!(options.logging().level().unwrap(), "debug");
        assert_eq!(options.logging().format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn test_unknown_format() {
        let mut config = Configuration::new();
        config.add_tokens(["--log.format=xml"]).unwrap();

        let options: InspectOptions = config.bind();
        assert!(options.logging().format().is_err());
    }
}
