use std::io;
use std::process;

use clap::{Arg, Command};

mod gradient;
mod manifest;
mod prompt;
mod wizard;

use gradient::GradientText;
use prompt::Prompter;

const KINDS: [&str; 3] = ["deployment", "service", "ingress"];

fn main() {
    let matches = Command::new("kubegen")
        .version("0.1.0")
        .author("Harshit Duggal")
        .about("⚙️ Interactive Kubernetes manifest wizard")
        .subcommand(
            Command::new("generate")
                .about("Generate a kubernetes yaml file")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_name("KIND")
                        .help("The kind of yaml")
                        .takes_value(true)
                        .possible_values(KINDS),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("generate", sub)) => {
            let kind = match sub.value_of("kind") {
                Some(kind) => kind.to_string(),
                None => match ask_kind() {
                    Ok(kind) => kind,
                    Err(e) => fail(&e),
                },
            };
            if let Err(e) = wizard::generate(&kind) {
                fail(&e);
            }
        }
        _ => {
            println!(
                "{}",
                GradientText::cyber("⚙️ kubegen - Kubernetes manifest wizard")
            );
            println!("Usage:");
            println!("  kubegen generate [--kind <deployment|service|ingress>]");
        }
    }
}

fn ask_kind() -> io::Result<String> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock());
    prompter.ask_choice(
        "? Please enter the kind of yaml (deployment, service, ingress): ",
        &KINDS,
    )
}

fn fail(error: &io::Error) -> ! {
    eprintln!("{}", GradientText::error(&format!("! {}", error)));
    process::exit(1);
}
