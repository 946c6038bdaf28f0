// src/manifest.rs

use crate::{constants, error::*, models::ExtractionRecord};
use log::debug;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// 把全部记录序列化为行式清单写入目标路径，覆盖已有文件。
/// 先写入同目录下的临时文件，成功后整体替换，存储故障不会留下残缺清单
pub fn write_manifest(records: &[ExtractionRecord], path: &Path) -> AppResult<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    for record in records {
        writeln!(tmp, "{}", record.format_line())?;
    }
    tmp.write_all(constants::MANIFEST_FOOTER.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)?;

    debug!("清单写入完成: {:?} ({} 行记录)", path, records.len());
    Ok(path.to_path_buf())
}
