//! CSV writer for self-play records.
//!
//! Format: game_id,ply,player,cell_0-41,policy_0-6,outcome
//! Cells are row-major from the top row: 0 empty, 1 Player1, 2 Player2.

use crate::game::player::{Cell, Player};
use crate::game::state::{State, COLS, ROWS};
use crate::training::self_play::{GameRecord, TrainingExample};
use crate::{Connect4Error, Result};
use chrono::Utc;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const CELLS: usize = ROWS * COLS;

/// Appends self-play games to one timestamped CSV file.
pub struct CsvWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows_written: usize,
}

impl CsvWriter {
    /// Create a new CSV writer in `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;

        let file_name = format!("selfplay_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = base_dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(Self::header())?;

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn header() -> Vec<String> {
        let mut header = vec!["game_id".to_string(), "ply".to_string(), "player".to_string()];
        header.extend((0..CELLS).map(|i| format!("cell_{}", i)));
        header.extend((0..COLS).map(|i| format!("policy_{}", i)));
        header.push("outcome".to_string());
        header
    }

    /// Write a complete game record
    pub fn write_game(&mut self, record: &GameRecord) -> Result<()> {
        for (ply, example) in record.examples.iter().enumerate() {
            let mut row = vec![
                record.game_id.to_string(),
                ply.to_string(),
                example.player.to_string(),
            ];
            row.extend(example.state.iter_cells().map(|cell| encode_cell(cell).to_string()));
            row.extend(example.policy.iter().map(|p| p.to_string()));
            row.push(example.outcome.to_string());
            self.writer.write_record(&row)?;
            self.rows_written += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn encode_cell(cell: Cell) -> u8 {
    match cell {
        None => 0,
        Some(Player::Player1) => 1,
        Some(Player::Player2) => 2,
    }
}

fn decode_cell(raw: &str) -> Result<Cell> {
    match raw {
        "0" => Ok(None),
        "1" => Ok(Some(Player::Player1)),
        "2" => Ok(Some(Player::Player2)),
        other => Err(Connect4Error::InvalidRecord(format!("bad cell value '{}'", other))),
    }
}

fn parse_f32(raw: &str) -> Result<f32> {
    raw.parse::<f32>()
        .map_err(|e| Connect4Error::InvalidRecord(format!("bad number '{}': {}", raw, e)))
}

/// Loads every example from a file produced by [`CsvWriter`].
pub fn load_examples_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingExample>> {
    let mut reader = csv::Reader::from_path(path)?;
    let expected = 3 + CELLS + COLS + 1;
    let mut examples = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.len() != expected {
            return Err(Connect4Error::InvalidRecord(format!(
                "expected {} fields, got {}",
                expected,
                record.len()
            )));
        }

        let player: Player = record[2].parse().map_err(Connect4Error::InvalidRecord)?;
        let cells = (3..3 + CELLS)
            .map(|i| decode_cell(&record[i]))
            .collect::<Result<Vec<_>>>()?;
        let state = State::from_cells(&cells)
            .ok_or_else(|| Connect4Error::InvalidRecord("wrong cell count".to_string()))?;

        let mut policy = [0.0f32; COLS];
        for (col, p) in policy.iter_mut().enumerate() {
            *p = parse_f32(&record[3 + CELLS + col])?;
        }
        let outcome = parse_f32(&record[expected - 1])?;

        examples.push(TrainingExample {
            state,
            player,
            policy,
            outcome,
        });
    }

    Ok(examples)
}
