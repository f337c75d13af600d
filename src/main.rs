#[tokio::main]
async fn main() {
    if let Err(err) = proofreader_lib::run().await {
        eprintln!("proofreader failed to start: {err}");
        std::process::exit(1);
    }
}
