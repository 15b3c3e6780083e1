use clap::Parser;

use crate::data::loader::{DataSource, DEFAULT_SOURCE_URL};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(version, about = "SpaceX launch records dashboard")]
pub struct Cli {
    /// CSV to load at startup: an http(s) URL or a local path.
    #[arg(long, env = "LAUNCH_DASH_SOURCE", default_value = DEFAULT_SOURCE_URL)]
    pub source: String,
}

impl Cli {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_to_published_dataset() {
        let cli = Cli::try_parse_from(["launch-dash"]).unwrap();
        // The env var may be set in a developer shell; only check when absent.
        if std::env::var_os("LAUNCH_DASH_SOURCE").is_none() {
            assert_eq!(cli.data_source(), DataSource::default());
        }
    }

    #[test]
    fn local_path_source() {
        let cli = Cli::try_parse_from(["launch-dash", "--source", "launches.csv"]).unwrap();
        assert_eq!(cli.data_source(), DataSource::Path(PathBuf::from("launches.csv")));
    }
}
