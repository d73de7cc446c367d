#[tokio::main]
async fn main() {
    if let Err(err) = rulekit::cli::run().await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
