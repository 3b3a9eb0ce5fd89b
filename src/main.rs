use anyhow::Result;
use clap::Parser;
use relsync::config::ConfigOverrides;
use relsync::sync::SyncReport;
use std::path::PathBuf;

/// relsync - publish the latest GitHub release to update servers
///
/// Resolves the version code of the latest release, downloads the build for
/// the given platform and uploads it to every distribution server.
///
/// ADMIN_SECRET (upload credential) and GITHUB_TOKEN (release access) must be
/// set in the environment.
///
/// Release notes may pin the version code with `vc: 12` and mark a mandatory
/// update with `force: true`.
///
/// Examples:
///   relsync             # Publish the Android build
///   relsync windows     # Publish the Windows installer
#[derive(Parser, Debug)]
#[command(author, version = env!("RELSYNC_VERSION"), about)]
struct Cli {
    /// Target platform: android, windows or ios
    #[arg(value_name = "PLATFORM")]
    platform: Option<String>,

    /// GitHub repository in the format "owner/repo"
    #[arg(long, env = "RELSYNC_REPO", value_name = "OWNER/REPO")]
    repo: Option<String>,

    /// Distribution server base URL (repeatable; primary first)
    #[arg(
        long = "server",
        env = "RELSYNC_SERVERS",
        value_delimiter = ',',
        value_name = "URL"
    )]
    servers: Vec<String>,

    /// Server queried for the deployed version (defaults to the first server)
    #[arg(long, value_name = "URL")]
    status_server: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Directory for the temporary download (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    work_dir: Option<PathBuf>,

    /// Do not send the forceUpdate field to the servers
    #[arg(long)]
    no_force_flag: bool,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            platform: cli.platform,
            repo: cli.repo,
            api_url: cli.api_url,
            servers: cli.servers,
            status_server: cli.status_server,
            work_dir: cli.work_dir,
            no_force_flag: cli.no_force_flag,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let runtime = relsync::runtime::RealRuntime;

    let report = relsync::run(&runtime, cli.into()).await?;
    if let SyncReport::Published { outcomes, .. } = &report {
        for outcome in outcomes {
            match &outcome.result {
                Ok(()) => println!("✓ {}", outcome.endpoint),
                Err(e) => println!("✗ {}", e),
            }
        }
    }
    Ok(())
}
