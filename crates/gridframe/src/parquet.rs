#![forbid(unsafe_code)]

//! Parquet persistence over the Arrow interop of [`crate::arrow`].
//!
//! Reads concatenate every record batch in file order; writes go through a
//! sibling temporary file and a rename, so a failed export never leaves a
//! partially written file behind.

use crate::arrow::{frame_to_record_batch, record_batch_to_frame};
use crate::error::FrameError;
use crate::frame::DataFrame;
use crate::rows::temp_sibling;
use bytes::Bytes;
// Leading `::` keeps the external crate distinct from this module's own path.
use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::errors::ParquetError;
use ::parquet::file::reader::ChunkReader;
use std::fs;
use std::io;
use std::path::Path;

/// Serialize the frame to in-memory parquet bytes.
pub fn write_frame_to_parquet_bytes(frame: &DataFrame) -> Result<Vec<u8>, FrameError> {
    let mut buf = Vec::new();
    write_to(frame, &mut buf)?;
    Ok(buf)
}

/// Deserialize parquet bytes into a frame.
pub fn read_parquet_bytes_to_frame(bytes: &[u8]) -> Result<DataFrame, FrameError> {
    read_from(Bytes::copy_from_slice(bytes))
}

/// Write the frame to a parquet file (atomically, via temp file + rename).
pub fn write_frame_to_parquet(frame: &DataFrame, path: impl AsRef<Path>) -> Result<(), FrameError> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);
    let written = fs::File::create(&tmp)
        .map_err(FrameError::from)
        .and_then(|file| write_to(frame, file));
    match written {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

/// Read a parquet file into a frame.
pub fn read_parquet_to_frame(path: impl AsRef<Path>) -> Result<DataFrame, FrameError> {
    read_from(fs::File::open(path)?)
}

fn write_to<W: io::Write + Send>(frame: &DataFrame, writer: W) -> Result<(), FrameError> {
    let batch = frame_to_record_batch(frame)?;
    let mut writer = ArrowWriter::try_new(writer, batch.schema(), None).map_err(parquet_err)?;
    writer.write(&batch).map_err(parquet_err)?;
    writer.close().map_err(parquet_err)?;
    Ok(())
}

fn read_from<T: ChunkReader + 'static>(input: T) -> Result<DataFrame, FrameError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input).map_err(parquet_err)?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(parquet_err)?;

    let mut frame: Option<DataFrame> = None;
    for batch in reader {
        let batch = batch.map_err(|e| FrameError::malformed(e.to_string()))?;
        let piece = record_batch_to_frame(&batch)?;
        match frame.as_mut() {
            None => frame = Some(piece),
            Some(acc) => acc.append_rows(piece)?,
        }
    }
    match frame {
        Some(frame) => Ok(frame),
        // A file with no row groups still carries a schema; rebuild the
        // zero-row frame from it.
        None => DataFrame::from_columns(
            schema
                .fields()
                .iter()
                .map(|field| (field.name().clone(), Vec::new())),
        ),
    }
}

fn parquet_err(err: ParquetError) -> FrameError {
    FrameError::Malformed {
        reason: err.to_string(),
    }
}
