mod cli;
mod demo;

use pet_adoption::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
