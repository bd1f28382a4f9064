//! publish command - Publish the working directory to a remote

use crate::cli::args::Cli;
use crate::core::config::Config;
use crate::core::types::{BranchName, Identity, RemoteName, RemoteUrl};
use crate::engine::{self, status_line, Context, PublishOptions, Publisher};
use crate::git::GitCliPusher;
use crate::ui::output::{self, Verbosity};
use anyhow::{bail, Context as _, Result};
use std::path::PathBuf;

/// Publish the working directory to the remote named on the command line.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `cli` - Parsed arguments (URL, overrides, dry-run)
pub fn publish(ctx: &Context, cli: &Cli) -> Result<()> {
    let verbosity = ctx.verbosity();

    // The URL is checked before anything touches the disk.
    let remote_url = RemoteUrl::new(cli.remote_url.as_deref().unwrap_or_default())?;

    let work_dir = ctx
        .work_dir()
        .context("Failed to determine working directory")?;
    if !work_dir.is_dir() {
        bail!("'{}' is not a directory", work_dir.display());
    }

    let config = Config::load(Some(&work_dir)).context("Failed to load configuration")?;
    match config.global_config_loaded_from() {
        Some(path) => output::debug(format!("global config: {}", path.display()), verbosity),
        None => output::debug("global config: none", verbosity),
    }
    if let Some(path) = config.repo_config_loaded_from() {
        output::debug(format!("repo config: {}", path.display()), verbosity);
    }

    let opts = resolve_options(cli, &config, work_dir, remote_url)?;
    output::debug(format!("resolved options: {:?}", opts), verbosity);

    if opts.remote_url.as_str().starts_with("http://") {
        output::warn(
            format!(
                "remote url {} is not encrypted; credentials may be sent in clear text",
                opts.remote_url
            ),
            verbosity,
        );
    }

    if cli.dry_run {
        return dry_run(&opts, verbosity);
    }

    let publisher = Publisher::new(GitCliPusher::new(), verbosity);
    let report = publisher.run(&opts)?;

    if report.nothing_to_commit() {
        output::print(
            "Working tree unchanged since the last publish; pushed existing history.",
            verbosity,
        );
    }
    output::success(
        format!(
            "Published {} to {} ({}/{}).",
            opts.work_dir.display(),
            opts.remote_url,
            opts.remote,
            opts.branch
        ),
        verbosity,
    );

    Ok(())
}

fn dry_run(opts: &PublishOptions, verbosity: Verbosity) -> Result<()> {
    let report = engine::plan(opts)?;

    output::print("Dry run: no changes will be made.", verbosity);
    for (step, outcome) in &report.steps {
        output::print(status_line(*step, outcome), verbosity);
    }
    output::print(format!("Commit message: \"{}\"", opts.message), verbosity);

    Ok(())
}

/// Merge command-line overrides over configuration.
///
/// Flags win over the repo config file, which wins over the global one.
pub fn resolve_options(
    cli: &Cli,
    config: &Config,
    work_dir: PathBuf,
    remote_url: RemoteUrl,
) -> Result<PublishOptions> {
    let remote = match &cli.remote {
        Some(name) => RemoteName::new(name.as_str())?,
        None => config.remote(),
    };

    let branch = match &cli.branch {
        Some(name) => BranchName::new(name.as_str())?,
        None => config.branch(),
    };

    let message = cli.message.clone().unwrap_or_else(|| config.message());
    if message.trim().is_empty() {
        bail!("commit message cannot be empty");
    }

    let identity = match (&cli.author_name, &cli.author_email) {
        (Some(name), Some(email)) => Some(Identity::new(name.as_str(), email.as_str())?),
        (None, None) => config.identity(),
        _ => bail!("--author-name and --author-email must be given together"),
    };

    Ok(PublishOptions {
        work_dir,
        remote_url,
        remote,
        branch,
        message,
        identity,
    })
}
