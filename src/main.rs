#[tokio::main]
async fn main() {
    if let Err(e) = storage_network_stats::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
