use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = semnote_api::Args::parse();

	semnote_api::run(args).await
}
