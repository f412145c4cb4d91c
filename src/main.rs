use cidr_aggregate::{run, Config};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let config = Config::from_env()?.with_args(std::env::args().skip(1))?;
    run(&config).await?;

    log::info!("DONE.");
    Ok(())
}
