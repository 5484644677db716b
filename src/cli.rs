//! Command-line interface definitions for the press release board.
//!
//! Every option can also be supplied through an environment variable.

use clap::Parser;

/// Command-line arguments for the press release board.
///
/// # Examples
///
/// ```sh
/// # Built-in brands, feeds under ./docs/data, page written to ./docs/index.html
/// press_release_board --base ./docs -o ./docs/index.html
///
/// # Custom registry, feeds served over HTTP, fetched concurrently
/// press_release_board --registry brands.yaml --base https://feeds.example.com/ --concurrent
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML brand registry; the built-in brands are used when omitted
    #[arg(long, env = "PRB_REGISTRY")]
    pub registry: Option<String>,

    /// Directory or URL that relative feed locations resolve against
    #[arg(short, long, env = "PRB_BASE", default_value = ".")]
    pub base: String,

    /// Path of the HTML page to write
    #[arg(short, long, env = "PRB_OUTPUT", default_value = "index.html")]
    pub output: String,

    /// Fetch all feeds concurrently instead of one after another
    #[arg(long)]
    pub concurrent: bool,

    /// Show dates in UTC rather than the local timezone
    #[arg(long)]
    pub utc: bool,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, env = "PRB_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["press_release_board"]);

        assert_eq!(cli.registry, None);
        assert_eq!(cli.base, ".");
        assert_eq!(cli.output, "index.html");
        assert!(!cli.concurrent);
        assert!(!cli.utc);
        assert_eq!(cli.timeout_secs, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "press_release_board",
            "-b",
            "https://feeds.example.com/",
            "-o",
            "/tmp/board/index.html",
        ]);

        assert_eq!(cli.base, "https://feeds.example.com/");
        assert_eq!(cli.output, "/tmp/board/index.html");
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "press_release_board",
            "--registry",
            "brands.yaml",
            "--concurrent",
            "--utc",
            "--timeout-secs",
            "15",
        ]);

        assert_eq!(cli.registry.as_deref(), Some("brands.yaml"));
        assert!(cli.concurrent);
        assert!(cli.utc);
        assert_eq!(cli.timeout_secs, Some(15));
    }
}
