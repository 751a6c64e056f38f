#[tokio::main]
async fn main() -> anyhow::Result<()> {
    seedgenie_lib::run().await
}
