use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chess_cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，输出到 stderr 以免混入 JSON
    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("chess_cli=info".parse()?);
    if cli.debug {
        filter = filter.add_directive("chess_core=debug".parse()?);
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let stdout = io::stdout();
    chess_cli::run(&cli, &mut stdout.lock())
}
