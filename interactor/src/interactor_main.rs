use std::process::ExitCode;

use borrow_interact::{borrow_cli, exit_code};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    exit_code(borrow_cli().await)
}
