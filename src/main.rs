use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    murmur::app::run().await
}
