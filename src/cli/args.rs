//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Publish that directory instead of the current one
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::Parser;
use std::path::PathBuf;

/// Publish a directory to a remote git repository
#[derive(Parser, Debug)]
#[command(name = "publish")]
#[command(author, version, about)]
#[command(
    long_about = "Publish a directory to a remote git repository.\n\n\
        Makes the directory a git repository if it is not one already, stages and \
        commits everything (an unchanged tree is not an error), renames the current \
        branch to the primary branch name, points the remote at the given URL and \
        pushes with upstream tracking.\n\n\
        The remote repository must already exist. Push credentials come from your \
        usual git setup (credential helper, SSH agent).",
    after_help = "\
WORKFLOW EXAMPLES:
    # Publish the current directory
    publish https://example.com/owner/project.git

    # Preview without changing anything
    publish --dry-run git@example.com:owner/project.git

    # Publish another directory on a custom branch
    publish --cwd ./site --branch pages https://example.com/owner/site.git

    # Commit as an explicit identity
    publish --author-name 'Jane Doe' --author-email jane@example.com <URL>

CONFIGURATION:
    Defaults for --remote, --branch, --message and the identity can be set in
    $REPO_PUBLISHER_CONFIG, ~/.repo-publisher/config.toml or
    .git/repo-publisher/config.toml. Flags always win."
)]
pub struct Cli {
    /// Remote repository URL to publish to
    #[arg(value_name = "REMOTE_URL", required_unless_present = "completions")]
    pub remote_url: Option<String>,

    /// Name of the remote to (re)configure [default: origin]
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Primary branch name to publish [default: main]
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Commit message for the publish commit
    #[arg(short, long, value_name = "MSG")]
    pub message: Option<String>,

    /// Author and committer name (requires --author-email)
    #[arg(long, value_name = "NAME", requires = "author_email")]
    pub author_name: Option<String>,

    /// Author and committer email (requires --author-name)
    #[arg(long, value_name = "EMAIL", requires = "author_name")]
    pub author_email: Option<String>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", conflicts_with = "remote_url")]
    pub completions: Option<Shell>,

    /// Run as if publish was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
