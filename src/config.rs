// src/config.rs
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::cloud_handler::CloudHandler;
use crate::data_types::SpreadsheetId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Command line for the viewer. Every flag can also come from the environment
/// (or a `.env` file loaded before parsing).
#[derive(Parser, Debug, Clone)]
#[command(name = "sheet_viewer", version, about = "Read-only grid viewer for spreadsheet data")]
pub struct Args {
    /// Base URL of the spreadsheet service
    #[arg(long, env = "SHEET_VIEWER_BASE_URL", default_value = DEFAULT_BASE_URL, value_parser = parse_base_url)]
    pub base_url: Url,

    /// Spreadsheet to open on start
    #[arg(long, env = "SHEET_VIEWER_SPREADSHEET")]
    pub spreadsheet: Option<String>,

    /// Only show rows of this tab
    #[arg(long, env = "SHEET_VIEWER_TAB_ID")]
    pub tab_id: Option<u32>,

    /// Give up on a fetch after this many seconds (0 waits forever)
    #[arg(long, env = "SHEET_VIEWER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Re-fetch the open spreadsheet every this many seconds
    #[arg(long, env = "SHEET_VIEWER_REFRESH_SECS")]
    pub refresh_secs: Option<u64>,

    /// Start with the light theme
    #[arg(long)]
    pub light: bool,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub base_url: Url,
    pub spreadsheet: Option<SpreadsheetId>,
    pub tab_id: Option<u32>,
    pub timeout: Option<Duration>,
    pub refresh_interval: Option<Duration>,
    pub dark_mode: bool,
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        ViewerConfig {
            base_url: args.base_url,
            spreadsheet: args
                .spreadsheet
                .filter(|id| !id.is_empty())
                .map(SpreadsheetId::from),
            tab_id: args.tab_id,
            timeout: non_zero_secs(args.timeout_secs),
            refresh_interval: args.refresh_secs.and_then(non_zero_secs),
            dark_mode: !args.light,
        }
    }
}

impl ViewerConfig {
    pub fn cloud_handler(&self) -> CloudHandler {
        CloudHandler::new(self.base_url.clone())
            .with_timeout(self.timeout)
            .with_tab(self.tab_id)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewerConfig, clap::Error> {
        let argv = std::iter::once("sheet_viewer").chain(args.iter().copied());
        Args::try_parse_from(argv).map(ViewerConfig::from)
    }

    #[test]
    fn flags_resolve_into_config() {
        let config = parse(&[
            "--base-url",
            "https://sheets.example.com/api",
            "--spreadsheet",
            "12",
            "--tab-id",
            "2",
            "--timeout-secs",
            "3",
            "--refresh-secs",
            "30",
            "--light",
        ])
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://sheets.example.com/api");
        assert_eq!(config.spreadsheet, Some(SpreadsheetId::from("12")));
        assert_eq!(config.tab_id, Some(2));
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(30)));
        assert!(!config.dark_mode);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = parse(&["--timeout-secs", "0", "--refresh-secs", "0"]).unwrap();
        assert_eq!(config.timeout, None);
        assert_eq!(config.refresh_interval, None);
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        assert!(parse(&["--base-url", "ftp://example.com"]).is_err());
        assert!(parse(&["--base-url", "not a url"]).is_err());
    }

    #[test]
    fn handler_uses_configured_base() {
        let config = parse(&["--base-url", "http://127.0.0.1:9000"]).unwrap();
        let url = config.cloud_handler().data_url(&"s".into()).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/spreadsheets/s/data");
    }
}
