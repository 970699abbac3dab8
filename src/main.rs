#[tokio::main]
async fn main() -> anyhow::Result<()> {
    open_day_kiosk_lib::run().await
}
