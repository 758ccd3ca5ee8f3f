mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use wlz_evidence::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
