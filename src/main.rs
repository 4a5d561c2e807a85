#[tokio::main]
async fn main() {
    if let Err(e) = clinic_backend::run().await {
        eprintln!("clinic-backend failed to start: {}", e);
        std::process::exit(1);
    }
}
