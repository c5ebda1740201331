#[tokio::main]
async fn main() -> anyhow::Result<()> {
    realty_mortgage_rs::server::start_server().await
}
