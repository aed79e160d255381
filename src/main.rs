use clap::Parser;
use fincalc::api::{Cli, run};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("fincalc: {e}");
        std::process::exit(1);
    }
}
