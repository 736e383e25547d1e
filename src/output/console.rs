//! Console rendering of output rows.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use std::io::{self, Write};

use super::{OutputError, OutputRow, RecordSink, COLUMNS, NO_RECORDS_MESSAGE};
use crate::models::PublicationRecord;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Sink that renders records to a writer (stdout by default)
pub struct ConsoleSink<W: Write = io::Stdout> {
    format: OutputFormat,
    writer: W,
}

impl ConsoleSink {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self { format, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_table(&mut self, rows: &[OutputRow]) -> Result<(), OutputError> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(COLUMNS.to_vec());

        for row in rows {
            let [id, rest @ ..] = row.fields();
            let mut cells = vec![Cell::new(id).add_attribute(Attribute::Bold)];
            cells.extend(rest.iter().map(Cell::new));
            table.add_row(cells);
        }

        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_plain(&mut self, rows: &[OutputRow]) -> Result<(), OutputError> {
        for row in rows {
            writeln!(self.writer, "{} - {}", row.pubmed_id, row.title)?;
            for (column, value) in COLUMNS.iter().zip(row.fields()).skip(2) {
                writeln!(self.writer, "  {}: {}", column, value)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

impl<W: Write> RecordSink for ConsoleSink<W> {
    fn write(&mut self, records: &[PublicationRecord]) -> Result<(), OutputError> {
        // JSON output stays an array when empty
        if records.is_empty() && self.format != OutputFormat::Json {
            writeln!(self.writer, "{}", NO_RECORDS_MESSAGE)?;
            return Ok(());
        }

        let rows: Vec<OutputRow> = records.iter().map(OutputRow::from).collect();

        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, &rows)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Plain => self.write_plain(&rows)?,
            OutputFormat::Table => self.write_table(&rows)?,
        }

        self.writer.flush()?;
        Ok(())
    }
}
