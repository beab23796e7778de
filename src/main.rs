use std::process::ExitCode;
use suite_runner::infra::logging;
use suite_runner::{Arguments, entry_point};

mod demo;

#[tokio::main]
async fn main() -> ExitCode {
    // Locale first so help text and console output are localized.
    suite_runner::init();
    logging::init();

    let engine = demo::engine();
    entry_point(&engine, Arguments::from_env(), None).await.into()
}
