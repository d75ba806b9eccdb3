//! CSV export and import of the raw price table.
//!
//! The layout is `Date` followed by every column present in the table, in
//! the order Open, High, Low, Close, Adj Close, Volume. Missing values are
//! empty cells.

use std::io::{Read, Write};

use thiserror::Error;

use crate::{parse_date, Column, PriceRow, RawPriceTable, TickerSymbol};

const DATE_HEADER: &str = "Date";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("first column must be '{DATE_HEADER}'")]
    MissingDateColumn,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidValue {
        line: u64,
        field: String,
        value: String,
    },
}

/// Download name for the CSV of `ticker`.
pub fn csv_filename(ticker: &TickerSymbol) -> String {
    format!("{ticker}_historical_data.csv")
}

/// Download name for the forecast chart of `ticker`.
pub fn png_filename(ticker: &TickerSymbol) -> String {
    format!("{ticker}_stock_forecast.png")
}

/// Serialize `table` into UTF-8 CSV bytes.
pub fn write_csv(table: &RawPriceTable) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    write_csv_to(table, &mut out)?;
    Ok(out)
}

pub fn write_csv_to<W: Write>(table: &RawPriceTable, sink: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push(DATE_HEADER);
    header.extend(table.columns().iter().map(|column| column.header()));
    writer.write_record(&header)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.date.to_string());
        for column in table.columns() {
            record.push(format_cell(row, *column));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Parse CSV in the export layout back into a table for `ticker`.
pub fn read_csv<R: Read>(ticker: TickerSymbol, source: R) -> Result<RawPriceTable, ExportError> {
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader.headers()?.clone();
    let mut fields = headers.iter();
    match fields.next() {
        Some(first) if first.trim().eq_ignore_ascii_case(DATE_HEADER) => {}
        _ => return Err(ExportError::MissingDateColumn),
    }
    let columns = fields
        .map(|name| Column::from_header(name).ok_or_else(|| ExportError::UnknownColumn(name.to_owned())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());

        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date).map_err(|_| ExportError::InvalidValue {
            line,
            field: DATE_HEADER.to_owned(),
            value: raw_date.to_owned(),
        })?;

        let mut row = PriceRow::empty(date);
        for (column, cell) in columns.iter().zip(record.iter().skip(1)) {
            set_cell(&mut row, *column, cell.trim()).map_err(|()| ExportError::InvalidValue {
                line,
                field: column.header().to_owned(),
                value: cell.to_owned(),
            })?;
        }
        rows.push(row);
    }

    Ok(RawPriceTable::new(ticker, columns, rows))
}

fn format_cell(row: &PriceRow, column: Column) -> String {
    match column {
        Column::Volume => row.volume.map(|volume| volume.to_string()),
        other => row.value(other).map(|value| value.to_string()),
    }
    .unwrap_or_default()
}

fn set_cell(row: &mut PriceRow, column: Column, cell: &str) -> Result<(), ()> {
    if cell.is_empty() {
        return Ok(());
    }

    if column == Column::Volume {
        let volume = cell
            .parse::<u64>()
            .or_else(|_| match cell.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.round() as u64),
                _ => Err(()),
            })?;
        row.volume = Some(volume);
        return Ok(());
    }

    let value = cell.parse::<f64>().map_err(|_| ())?;
    let slot = match column {
        Column::Open => &mut row.open,
        Column::High => &mut row.high,
        Column::Low => &mut row.low,
        Column::Close => &mut row.close,
        Column::AdjClose => &mut row.adj_close,
        Column::Volume => return Ok(()),
    };
    *slot = Some(value);
    Ok(())
}
