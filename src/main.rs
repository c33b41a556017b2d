use std::io::Result;

#[tokio::main]
async fn main() -> Result<()> {
    arena_sync::run_demo().await
}
