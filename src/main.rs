//! CLI entry point for hotkey-router
//!
//! Provides a command-line interface for checking keymaps for
//! conflicting bindings, listing bindings, and replaying simulated
//! keystroke scripts against a keymap.

use clap::{Parser, Subcommand};
use colored::*;
use hotkey_router::config::{check_bindings, load_keymap};
use hotkey_router::engine::HotkeyEngine;
use hotkey_router::simulator::{EventBus, KeyboardSimulator};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hotkey-router")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a keymap for conflicting bindings
    Check {
        /// Path to the keymap file
        #[arg(short, long, default_value = "~/.config/hotkey-router/keymap.conf")]
        keymap: PathBuf,
    },

    /// List all bindings in a keymap
    List {
        /// Path to the keymap file
        #[arg(short, long, default_value = "~/.config/hotkey-router/keymap.conf")]
        keymap: PathBuf,

        /// Emit entries as pretty-printed JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a keystroke script against a keymap
    Replay {
        /// Path to the keystroke script
        script: PathBuf,

        /// Path to the keymap file
        #[arg(short, long, default_value = "~/.config/hotkey-router/keymap.conf")]
        keymap: PathBuf,

        /// Trace every keydown the engine receives
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --debug raises the default so engine traces show
    let default_filter = match &cli.command {
        Commands::Replay { debug: true, .. } => "debug",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check { keymap } => check_keymap(&keymap)?,
        Commands::List { keymap, json } => list_bindings(&keymap, json)?,
        Commands::Replay {
            script,
            keymap,
            debug,
        } => replay_script(&keymap, &script, debug)?,
    }

    Ok(())
}

/// Expand a leading tilde in a user-supplied path
fn expand_path(path: &PathBuf) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );

    Ok(PathBuf::from(expanded.as_ref()))
}

/// Check a keymap for bindings that collide
fn check_keymap(keymap_path: &PathBuf) -> anyhow::Result<()> {
    let path = expand_path(keymap_path)?;

    println!("{} Parsing keymap: {}", "→".cyan(), path.display());

    let entries = load_keymap(&path)?;

    println!("{} Found {} bindings\n", "✓".green(), entries.len());

    let problems = check_bindings(&entries);

    if problems.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        println!("\nYour keymap is clean! ✓");
    } else {
        println!(
            "{} Found {} conflict{}:\n",
            "✗".red().bold(),
            problems.len(),
            if problems.len() == 1 { "" } else { "s" }
        );

        for (line, err) in &problems {
            println!(
                "  {} {}",
                format!("line {}:", line).dimmed(),
                format!("{}", err).cyan()
            );
        }

        println!("\n{}", "⚠ These bindings will collide at runtime!".yellow());
        std::process::exit(1);
    }

    Ok(())
}

/// List all bindings in the keymap
fn list_bindings(keymap_path: &PathBuf, json: bool) -> anyhow::Result<()> {
    let path = expand_path(keymap_path)?;
    let entries = load_keymap(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", format!("Bindings from: {}\n", path.display()).bold());

    let total = entries.len();

    // Display each binding
    for entry in entries {
        let hotkey = entry.hotkey.cyan().bold();
        let action = entry.action.green();
        let line = format!("(line {})", entry.line).dimmed();

        println!("{} → {} {}", hotkey, action, line);
    }

    println!("\n{} Total: {} bindings", "✓".green(), total);

    Ok(())
}

/// Bind the keymap to an engine and feed it a keystroke script
fn replay_script(keymap_path: &PathBuf, script_path: &PathBuf, debug: bool) -> anyhow::Result<()> {
    let keymap_file = expand_path(keymap_path)?;
    let script_file = expand_path(script_path)?;

    let entries = load_keymap(&keymap_file)?;

    println!(
        "{} Loaded {} bindings from {}",
        "✓".green(),
        entries.len(),
        keymap_file.display()
    );

    let bus = Rc::new(EventBus::new());
    let engine = HotkeyEngine::new(bus.clone());
    engine.set_debug_mode(debug);

    let hits = Rc::new(Cell::new(0usize));

    for entry in &entries {
        let action = entry.action.clone();
        let hotkey = entry.hotkey.clone();
        let counter = Rc::clone(&hits);

        engine
            .bind(&entry.hotkey, move |_| {
                counter.set(counter.get() + 1);
                println!(
                    "  {} {} {}",
                    "→".cyan(),
                    action.green(),
                    format!("({})", hotkey).dimmed()
                );
            })
            .map_err(|e| anyhow::anyhow!("Line {}: {}", entry.line, e))?;
    }

    engine.mount();

    let keyboard = KeyboardSimulator::new(Rc::clone(&bus));
    let content = fs::read_to_string(&script_file)
        .map_err(|e| anyhow::anyhow!("Failed to read script: {}", e))?;

    println!("{} Replaying {}\n", "→".cyan(), script_file.display());

    let steps = run_script(&keyboard, &content)?;

    println!(
        "\n{} {} keystrokes, {} actions triggered",
        "✓".green(),
        steps,
        hits.get()
    );

    Ok(())
}

/// Execute a keystroke script line by line
///
/// Directives: `down <key>`, `up <key>`, `press <key>`,
/// `chord <key> <key> ...`, `release-all`. Blank lines and `#` comments
/// are skipped.
fn run_script(keyboard: &KeyboardSimulator, content: &str) -> anyhow::Result<usize> {
    let mut steps = 0;

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        let result = match (verb, args.as_slice()) {
            ("down", [key]) => keyboard.key_down(key),
            ("up", [key]) => keyboard.key_up(key),
            ("press", [key]) => keyboard.key_press(key),
            ("chord", keys) if !keys.is_empty() => keyboard.chord(keys),
            ("release-all", []) => {
                keyboard.release_all();
                Ok(())
            }
            _ => anyhow::bail!("Invalid script line {}: {:?}", line_num, line),
        };

        result.map_err(|e| anyhow::anyhow!("Script line {}: {}", line_num, e))?;
        steps += 1;
    }

    Ok(steps)
}
