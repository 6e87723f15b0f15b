use clap::Parser;
use std::process::ExitCode;
use tasks_cli::{Cli, Commands, TaskError, TaskList};

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<(), TaskError> {
    // Load tasks from file into memory
    let mut tasks = TaskList::load()?;

    match args.command {
        Commands::Add { name } => {
            let id = tasks.add(name);
            tasks.save()?;
            println!("Task added successfully with ID: {id}");
        }
        Commands::List => {
            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                for task in tasks.iter() {
                    println!("{task}");
                }
            }
        }
        Commands::Done { id } => {
            tasks.complete(id)?;
            tasks.save()?;
            println!("Task {id} marked as completed");
        }
    }
    Ok(())
}
