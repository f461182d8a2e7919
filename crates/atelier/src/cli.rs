#![forbid(unsafe_code)]

//! Command-line arguments. Everything here overrides the config file
//! and the environment.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal admin client for atelier operations")]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to the config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows per table page.
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Log file path.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold CLI flags over an already loaded config.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(size) = self.page_size
            && size > 0
        {
            config.page_size = size;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}
