use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    goinject_cli::main_entry().await
}
