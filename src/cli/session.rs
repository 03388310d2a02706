use super::ui;
use crate::core::{Converter, RateProvider};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  <amount>   set the amount to convert (e.g. 10 or 12,50)
  add        save the current conversion to history
  swap       switch between EUR -> PLN and PLN -> EUR
  refresh    fetch the latest NBP rate again
  clear      clear the amount
  history    show recent conversions
  help       show this message
  quit       leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Amount(String),
    Add,
    Swap,
    Refresh,
    Clear,
    History,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => SessionCommand::Empty,
            "add" | "a" | "+" => SessionCommand::Add,
            "swap" | "s" => SessionCommand::Swap,
            "refresh" | "r" => SessionCommand::Refresh,
            "clear" | "c" => SessionCommand::Clear,
            "history" | "h" => SessionCommand::History,
            "help" | "?" => SessionCommand::Help,
            "quit" | "q" | "exit" => SessionCommand::Quit,
            _ if line.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | ',' | '-')) => {
                SessionCommand::Amount(line.to_string())
            }
            _ => SessionCommand::Unknown(line.to_string()),
        }
    }
}

async fn render<P: RateProvider + 'static, W: Write>(
    converter: &Converter<P>,
    out: &mut W,
) -> Result<()> {
    let view = converter.view().await;
    writeln!(out, "{}", ui::separator())?;
    writeln!(out, "{}", ui::render_rate_card(&view))?;
    writeln!(out)?;
    writeln!(out, "{}", ui::render_calculator(&view))?;
    if !view.history.is_empty() {
        writeln!(out, "{}", ui::render_history(&view.history))?;
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Runs an interactive session reading commands from `input` until it ends
/// or the user quits. History lives only as long as the session.
pub async fn run<P, R, W>(converter: &mut Converter<P>, input: R, out: &mut W) -> Result<()>
where
    P: RateProvider + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let pb = ui::new_spinner("Fetching NBP rate...");
    converter.mount().await;
    pb.finish_and_clear();

    writeln!(out, "Type 'help' for commands.")?;
    render(converter, out).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = SessionCommand::parse(&line);
        debug!(?command, "Session command");

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Empty => {}
            SessionCommand::Amount(text) => converter.set_amount(&text),
            SessionCommand::Add => {
                if converter.commit_conversion().await.is_none() {
                    writeln!(out, "Nothing to add: enter a valid amount first")?;
                }
            }
            SessionCommand::Swap => {
                if !converter.toggle_direction().await {
                    writeln!(out, "Rate not loaded yet")?;
                }
            }
            SessionCommand::Refresh => {
                let pb = ui::new_spinner("Refreshing NBP rate...");
                converter.refetch().await;
                pb.finish_and_clear();
            }
            SessionCommand::Clear => converter.clear_amount(),
            SessionCommand::History => {
                let view = converter.view().await;
                writeln!(out, "{}", ui::render_history(&view.history))?;
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Unknown(text) => {
                writeln!(out, "Unknown command: {text}. Type 'help' for commands.")?
            }
        }

        render(converter, out).await?;
    }

    writeln!(out)?;
    Ok(())
}
