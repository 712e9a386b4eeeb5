use crate::demo::{run_demo, run_form_show, DemoArgs, FormShowArgs};
use clap::{Parser, Subcommand};
use pet_adoption::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pet Adoption",
    about = "Walk through pet adoption applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an end-to-end adoption walkthrough (default command)
    Demo(DemoArgs),
    /// Inspect adoption form templates
    Form {
        #[command(subcommand)]
        command: FormCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FormCommand {
    /// Print the default template, or one imported from CSV, as JSON
    Show(FormShowArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(args),
        Command::Form {
            command: FormCommand::Show(args),
        } => run_form_show(args),
    }
}
