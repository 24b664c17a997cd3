use idsweep::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_or_exit();
    idsweep::init_tracing();

    let report = idsweep::run(&cli).await?;

    println!("\nFinal report:");
    println!("{}", report.summary());
    Ok(())
}
