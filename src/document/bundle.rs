use std::io::{Cursor, Write};

use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::core::errors::{AppError, AppResult};

pub fn revised_name(filename: &str) -> String {
    format!("revised_{filename}")
}

pub fn highlighted_name(filename: &str) -> String {
    format!("highlighted_{filename}")
}

/// `proofread_<stem>.zip`, where the stem stops at the first `.`.
pub fn bundle_name(filename: &str) -> String {
    let stem = filename.split('.').next().unwrap_or(filename);
    format!("proofread_{stem}.zip")
}

/// Packs the revised and highlighted documents into one zip archive.
pub fn bundle_revisions(revised: &[u8], highlighted: &[u8], filename: &str) -> AppResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in [
        (revised_name(filename), revised),
        (highlighted_name(filename), highlighted),
    ] {
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| AppError::Document(format!("cannot add {name} to archive: {err}")))?;
        writer.write_all(data)?;
    }

    let cursor = writer
        .finish()
        .map_err(|err| AppError::Document(format!("cannot finish archive: {err}")))?;
    Ok(cursor.into_inner())
}
