mod cli;
mod infra;
mod normalize;
mod routes;
mod server;

use talent_rubric::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
