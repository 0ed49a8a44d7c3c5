#[tokio::main]
async fn main() -> std::io::Result<()> {
    platform_brawl::frameworks::server::run_with_config().await
}
