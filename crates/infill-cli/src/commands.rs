use anyhow::Context;
use colored::Colorize;
use infill_config::{apply, load_document, render, Format};
use infill_env::{EnvMapper, MissPolicy, ProcessEnv};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let strategy = args.strategy();
    let output = match args.output {
        Some(f) => f.into(),
        None => Format::from_path(&args.file)?,
    };

    let document = load_document(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;
    let callbacks = EnvMapper::new(&args.env.config(args.miss_policy()), ProcessEnv)?.callbacks();
    debug!(?strategy, %output, "rendering");
    let filled = apply(&callbacks, document, strategy)?;
    print!("{}", render(&filled, output)?);
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let document = load_document(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;
    let mapper = EnvMapper::new(&args.env.config(MissPolicy::Empty), ProcessEnv)?;
    let found = mapper.placeholders(&document);

    if found.is_empty() {
        println!("No placeholders in {}.", args.file.display().to_string().bold());
        return Ok(());
    }

    let missing = found.iter().filter(|p| !p.resolved).count();
    for p in &found {
        let status = if p.resolved { "set".green() } else { "unset".red() };
        println!("  {} {} → {} ({})", p.path.to_string().cyan(), p.raw, p.key.bold(), status);
    }
    if missing == 0 {
        println!("{} {} placeholders, all set.", "✓".green().bold(), found.len());
    } else {
        println!("{} {} of {} placeholders unset.", "✗".red().bold(), missing, found.len());
    }
    Ok(())
}
