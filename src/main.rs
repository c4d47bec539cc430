//! School Admin - interactive menu
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  stdin   │───▶│  parse   │───▶│  School  │───▶│  stdout  │
//! │  (line)  │    │ (Command)│    │ (execute)│    │ (Display)│
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Flags: `--env/-e <name>` selects `config/<name>.yaml` (default `dev`),
//! `--demo` runs the scripted walkthrough and exits.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use school_admin::command::{Command, CommandOutput};
use school_admin::config::AppConfig;
use school_admin::school::School;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn use_demo_mode() -> bool {
    std::env::args().any(|a| a == "--demo")
}

fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config =
        AppConfig::load(&env).with_context(|| format!("loading config for env '{}'", env))?;
    let _log_guard = school_admin::logging::init_logging(&app_config);

    tracing::info!("Starting School Admin in {} mode", env);

    let mut school = School::new(&app_config.school);

    if use_demo_mode() {
        let output = school.execute(Command::Demo)?;
        println!("{}", output);
        return Ok(());
    }

    run_menu(&mut school)
}

fn run_menu(school: &mut School) -> anyhow::Result<()> {
    println!("Welcome to School Management System! Type 'help' for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match school.execute(command) {
            Ok(CommandOutput::Quit) => {
                println!("Thank you for using School Management System!");
                break;
            }
            Ok(output) => println!("{}", output),
            Err(err) => println!("Error: {}", err),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
