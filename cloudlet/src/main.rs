use std::process;

use anyhow::Result;
use clap::Parser;
use cloudlet::Cli;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let subscriber = FmtSubscriber::builder()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .without_time()
    .with_ansi(!cli.no_color)
    .with_writer(std::io::stderr)
    .finish();
  tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("Interrupted, cancelling");
      on_interrupt.cancel();
    }
  });

  match cli.run(cancel).await {
    Ok(outcome) => {
      debug!("{:?}", outcome);
      if outcome.failed > 0 {
        process::exit(1);
      }
    }
    Err(err) => {
      eprintln!("{err:#}");
      process::exit(2);
    }
  }

  Ok(())
}
