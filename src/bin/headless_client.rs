use platform_brawl::frameworks::{client, config, server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    server::init_runtime();

    let intents = client::spawn_stdin_intents();
    client::run_client(config::game_config(), client::connection_settings(), intents).await
}
