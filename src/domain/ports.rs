use crate::utils::error::Result;
use std::path::Path;

/// 讀取待檢查文件的來源，回傳原始位元組，解碼交給檢查器
pub trait DocumentSource {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
}

/// 產出檔案的寫入端
pub trait ArtifactSink {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}
