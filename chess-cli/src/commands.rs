//! 子命令执行

use std::io::Write;

use anyhow::{Context, Result};
use chess_core::{Move, MoveList, Notation, Position};
use tracing::info;

use crate::config::{Cli, Command};

/// 执行命令，结果写入 `out`
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let mut position = cli.source.load_position()?;

    match &cli.command {
        Command::Moves { verbose, json } => {
            let list = position.list_moves(*verbose);
            info!(count = list.len(), "listed moves");
            write_moves(&list, *json, out)?;
        }
        Command::Render => {
            writeln!(out, "{}", position.render())?;
        }
        Command::Play { moves } => {
            for notation in moves {
                let mv = position
                    .play(notation)
                    .with_context(|| format!("Failed to play {:?}", notation))?;
                info!(notation = notation.as_str(), %mv, "played move");
            }
            write_play_result(&position, out)?;
        }
    }

    Ok(())
}

fn write_moves(list: &MoveList, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(list).context("Failed to encode moves")?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    match list {
        MoveList::Notation(moves) => {
            for notation in moves {
                writeln!(out, "{}", notation)?;
            }
        }
        MoveList::Verbose(moves) => {
            for mv in moves {
                writeln!(out, "{}", describe(mv))?;
            }
        }
    }
    Ok(())
}

/// 单行描述：记谱、坐标、标记
fn describe(mv: &Move) -> String {
    let mut line = format!("{:<8}{}", Notation::to_algebraic(mv), mv);
    if let Some(captured) = mv.captured {
        line.push_str(&format!(" captures {}", captured.to_fen_char()));
    }
    if mv.is_castling {
        line.push_str(" castling");
    }
    if mv.is_en_passant {
        line.push_str(" en-passant");
    }
    line
}

fn write_play_result(position: &Position, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", position.render())?;
    writeln!(out)?;
    writeln!(out, "{}", position.moves().join(" "))?;
    Ok(())
}
