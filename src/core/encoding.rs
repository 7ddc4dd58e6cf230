use regex::bytes::Regex;
use std::sync::LazyLock;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// XML 宣告中的 `encoding="..."`
static ENCODING_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
        .expect("encoding declaration pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin-1" | "latin1" | "l1" => {
                Some(Encoding::Latin1)
            }
            "us-ascii" | "ascii" => Some(Encoding::Ascii),
            _ => None,
        }
    }
}

/// 讀取 XML 宣告的編碼名稱，沒有宣告時回傳 `None`
pub fn declared_encoding(data: &[u8]) -> Option<String> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    ENCODING_DECL
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// 依宣告的編碼把位元組轉成字串；未宣告時視為 UTF-8。
///
/// 失敗時回傳的訊息會直接當作該檔案的診斷內容。
pub fn decode_document(data: &[u8]) -> Result<String, String> {
    let encoding = match declared_encoding(data) {
        Some(label) => Encoding::from_label(&label)
            .ok_or_else(|| format!("unsupported encoding '{}'", label))?,
        None => Encoding::Utf8,
    };

    match encoding {
        Encoding::Utf8 => String::from_utf8(data.to_vec()).map_err(|e| {
            format!(
                "not well-formed (invalid UTF-8 at byte {})",
                e.utf8_error().valid_up_to()
            )
        }),
        Encoding::Latin1 => Ok(data.iter().map(|&b| char::from(b)).collect()),
        Encoding::Ascii => match data.iter().position(|b| !b.is_ascii()) {
            Some(offset) => Err(format!("not well-formed (non-ASCII byte at {})", offset)),
            None => Ok(data.iter().map(|&b| char::from(b)).collect()),
        },
    }
}
