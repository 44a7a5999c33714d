use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use supercop_table::{Config, generate_report};

/// Render the best SUPERCOP cycle counts per implementation and machine as a LaTeX table
#[derive(Parser)]
#[command(about)]
pub struct Cli {
    /// Directory holding one `<host>/data` log per benchmarking machine
    #[arg(required_unless_present = "list_hosts")]
    root_dir: Option<PathBuf>,
    /// Print the configured hosts and exit
    #[arg(long)]
    list_hosts: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::builtin();

    if cli.list_hosts {
        for host in &config.hosts {
            println!("{}\t{}", host.id, host.name);
        }
        return Ok(());
    }

    let root_dir = cli
        .root_dir
        .ok_or_else(|| anyhow::anyhow!("missing root directory"))?;
    let report = generate_report(&root_dir, &config)
        .with_context(|| format!("cannot generate report from {}", root_dir.display()))?;

    io::stdout()
        .lock()
        .write_all(report.as_bytes())
        .context("cannot write report to stdout")?;
    Ok(())
}
