//! Gridcalc - a terminal grid editor with coordinate-addressed formulas.

mod cli;
mod tui;

use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet file to open");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --eval <FORMULA>      Evaluate a formula, print the result, and exit");
    eprintln!("  --keymap-file <path>      Load keybindings from a TOML file");
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut eval_expr: Option<String> = None;
    let mut keymap_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--eval" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --eval requires a formula");
                    std::process::exit(1);
                }
                eval_expr = Some(args[i].clone());
            }
            "--keymap-file" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --keymap-file requires a file path");
                    std::process::exit(1);
                }
                keymap_file = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    if let Some(expr) = eval_expr {
        std::process::exit(cli::eval_once(&expr));
    }

    let (keymap, warnings) = tui::load_keymap(keymap_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut app = match tui::App::with_file(file_path, keymap) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tui::run(&mut app) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
