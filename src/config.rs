//! Runtime configuration - CLI flags with environment fallbacks

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::controller::POLL_INTERVAL;

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Pose backend base URL
    #[arg(long, env = "POSEDASH_SERVER", default_value = "http://localhost:3000", global = true)]
    pub server: String,

    /// Metrics poll period in milliseconds
    #[arg(long, env = "POSEDASH_POLL_MS", default_value_t = POLL_INTERVAL.as_millis() as u64, global = true,
          value_parser = clap::value_parser!(u64).range(50..))]
    pub poll_ms: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "POSEDASH_TIMEOUT_SECS", default_value = "5", global = true,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Log file used while the dashboard owns the terminal
    #[arg(long, env = "POSEDASH_LOG", default_value = "posedash.log", global = true)]
    pub log_file: PathBuf,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_explicit_flags() {
        let cli = TestCli::try_parse_from([
            "posedash",
            "--server", "http://10.0.0.5:3000",
            "--poll-ms", "250",
            "--timeout-secs", "2",
            "--log-file", "/tmp/dash.log",
        ])
        .unwrap();
        assert_eq!(cli.config.server, "http://10.0.0.5:3000");
        assert_eq!(cli.config.poll_interval(), Duration::from_millis(250));
        assert_eq!(cli.config.timeout(), Duration::from_secs(2));
        assert_eq!(cli.config.log_file, PathBuf::from("/tmp/dash.log"));
    }

    #[test]
    fn test_poll_period_floor() {
        assert!(TestCli::try_parse_from(["posedash", "--poll-ms", "10"]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(TestCli::try_parse_from(["posedash", "--timeout-secs", "0"]).is_err());
        let cli = TestCli::try_parse_from(["posedash", "--timeout-secs", "1"]).unwrap();
        assert_eq!(cli.config.timeout(), Duration::from_secs(1));
    }
}
