use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use dxf_bom::naming::punctuate_list;
use dxf_flat::{bends_from_view, dominant_orientation, BendOrientation, Bounds, Confirm, FlipPolicy};
use serde::Serialize;

use crate::config::ExportConfig;
use crate::prompt::{FixedAnswer, TerminalConfirm};
use crate::snapshot::{self, ViewSnapshot};
use crate::OutputFormat;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

#[derive(Args, Debug)]
pub struct FlipArgs {
    /// Flat pattern view snapshots (JSON)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub views: Vec<PathBuf>,

    /// Flip policy (automatic, ask, prefer-up); overrides the config file
    #[arg(short, long)]
    pub policy: Option<FlipPolicy>,

    /// Answer every flip question without prompting
    #[arg(long, value_enum)]
    pub answer: Option<Answer>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct FlipDecision {
    pub view: String,
    pub up: usize,
    pub down: usize,
    pub orientation: BendOrientation,
    pub flip: bool,
}

pub fn execute(args: FlipArgs, config: &ExportConfig, cancel: &AtomicBool) -> Result<()> {
    let policy = args.policy.unwrap_or(config.flip.policy);
    log::info!("Flip policy: {}", policy.name());

    let mut decisions = Vec::with_capacity(args.views.len());

    for path in &args.views {
        if cancel.load(Ordering::SeqCst) {
            log::warn!(
                "Cancelled, {} view(s) left undecided",
                args.views.len() - decisions.len()
            );
            break;
        }

        let view: ViewSnapshot = snapshot::load(path)?;
        let name = view.display_name(path);

        let bends = bends_from_view(&view);
        let bounds = Bounds::of_view(&view);

        let confirm: Box<dyn Confirm> = match args.answer {
            Some(answer) => Box::new(FixedAnswer(answer == Answer::Yes)),
            None => Box::new(TerminalConfirm::for_view(&name)),
        };

        let flip = policy
            .decide(&bends, &bounds, confirm.as_ref())
            .with_context(|| format!("Failed to decide whether to flip {name}"))?;

        log::debug!("{name}: flip = {flip}");

        decisions.push(FlipDecision {
            view: name,
            up: bends.iter().filter(|b| b.is_up()).count(),
            down: bends.iter().filter(|b| b.is_down()).count(),
            orientation: dominant_orientation(&bends),
            flip,
        });
    }

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(&decisions)?)?;
        }
        OutputFormat::Table => {
            write_decisions_table(&decisions, &mut writer)?;
            writeln!(writer, "{}", summary(&decisions))?;
        }
    }

    Ok(())
}

fn write_decisions_table<W: Write>(decisions: &[FlipDecision], mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["View", "Up", "Down", "Orientation", "Flip"]);

    for d in decisions {
        table.add_row(vec![
            d.view.clone(),
            d.up.to_string(),
            d.down.to_string(),
            d.orientation.to_string(),
            if d.flip { "yes" } else { "no" }.to_string(),
        ]);
    }

    writeln!(writer, "{table}")
}

fn summary(decisions: &[FlipDecision]) -> String {
    let flipped: Vec<&str> = decisions
        .iter()
        .filter(|d| d.flip)
        .map(|d| d.view.as_str())
        .collect();

    if flipped.is_empty() {
        "No views flipped".dimmed().to_string()
    } else {
        format!("Flip {}", punctuate_list(&flipped)).green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(view: &str, flip: bool) -> FlipDecision {
        FlipDecision {
            view: view.to_string(),
            up: 1,
            down: 1,
            orientation: BendOrientation::Horizontal,
            flip,
        }
    }

    #[test]
    fn test_summary_lists_flipped_views() {
        colored::control::set_override(false);

        let decisions = [
            decision("A", true),
            decision("B", false),
            decision("C", true),
            decision("D", true),
        ];
        assert_eq!(summary(&decisions), "Flip A, C, and D");
        assert_eq!(summary(&decisions[1..2]), "No views flipped");
    }
}
