//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded by `main`), and
//! positional arguments `[input] [output]` override them.

use crate::output::OutputFormat;
use std::error::Error;

pub const DEFAULT_INPUT: &str = "ranges.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Range file to read, `CIDR_INPUT`.
    pub input: String,
    /// Result file to write, `CIDR_OUTPUT`.
    pub output: String,
    /// Result file format, `CIDR_OUTPUT_FORMAT`.
    pub format: OutputFormat,
}

/// Default output file name, dated so runs on different days do not collide.
pub fn default_output() -> String {
    let now = chrono::Utc::now();
    format!("aggregated_{}.txt", now.format("%Y-%m-%d"))
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Config, Box<dyn Error>>
    where
        L: Fn(&str) -> Option<String>,
    {
        let format = match lookup("CIDR_OUTPUT_FORMAT") {
            Some(f) => f.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };
        let config = Config {
            input: lookup("CIDR_INPUT").unwrap_or_else(|| DEFAULT_INPUT.to_string()),
            output: lookup("CIDR_OUTPUT").unwrap_or_else(default_output),
            format,
        };
        log::debug!("config from environment: {config:?}");
        Ok(config)
    }

    /// Override input and output with positional arguments, program name excluded.
    pub fn with_args<I>(mut self, args: I) -> Result<Config, Box<dyn Error>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(input) = args.next() {
            self.input = input;
        }
        if let Some(output) = args.next() {
            self.output = output;
        }
        if let Some(extra) = args.next() {
            return Err(format!("Unexpected argument: {extra}").into());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.input, DEFAULT_INPUT);
        assert!(config.output.starts_with("aggregated_"));
        assert!(config.output.ends_with(".txt"));
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("CIDR_INPUT", "czsk.csv"),
            ("CIDR_OUTPUT", "czsk_aggregated.json"),
            ("CIDR_OUTPUT_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.input, "czsk.csv");
        assert_eq!(config.output, "czsk_aggregated.json");
        assert_eq!(config.format, OutputFormat::Json);

        assert!(Config::from_lookup(lookup(&[("CIDR_OUTPUT_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_with_args() {
        let config = Config::from_lookup(lookup(&[("CIDR_OUTPUT", "out.txt")])).unwrap();
        let config = config.with_args(vec!["in.txt".to_string()]).unwrap();
        assert_eq!(config.input, "in.txt");
        assert_eq!(config.output, "out.txt");

        let config = config
            .with_args(vec!["a.txt".to_string(), "b.txt".to_string()])
            .unwrap();
        assert_eq!((config.input.as_str(), config.output.as_str()), ("a.txt", "b.txt"));

        assert!(config
            .with_args(vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .is_err());
    }
}
