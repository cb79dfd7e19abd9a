#[tokio::main]
async fn main() -> eyre::Result<()> {
    tasks_lsp::run().await
}
