//! 單頁 PDF 1.4 輸出：只用內建的 Helvetica，不嵌入字型。

use crate::utils::error::Result;
use std::fmt::Write as FmtWrite;
use std::io::Write;

/// Bézier 近似圓弧的控制點係數
const KAPPA: f64 = 0.552_284_75;

const FONT_RESOURCE: &str = "F1";

/// Helvetica 在 ASCII 32..=126 的字寬 (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

/// 估算字串以 Helvetica 排版時的寬度 (pt)
pub fn text_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                u32::from(DEFAULT_WIDTH)
            }
        })
        .sum();
    f64::from(units) * font_size / 1000.0
}

/// 數字輸出到小數三位，去掉多餘的零
fn num(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// 轉成 WinAnsiEncoding 的 PDF 字串內容
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            '€' => out.push_str("\\200"),
            '…' => out.push_str("\\205"),
            '‘' => out.push_str("\\221"),
            '’' => out.push_str("\\222"),
            '“' => out.push_str("\\223"),
            '”' => out.push_str("\\224"),
            '•' => out.push_str("\\225"),
            '–' => out.push_str("\\226"),
            '—' => out.push_str("\\227"),
            '−' => out.push('-'),
            _ => out.push('?'),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f64::from((hex >> shift) & 0xff) / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// 頁面內容串流的運算子序列
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    ops: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, line: String) -> &mut Self {
        self.ops.push_str(&line);
        self.ops.push('\n');
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.op("q".to_string())
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op("Q".to_string())
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(format!("{} w", num(width)))
    }

    /// 1 = 圓頭
    pub fn set_line_cap(&mut self, cap: u8) -> &mut Self {
        self.op(format!("{} J", cap))
    }

    pub fn set_line_join(&mut self, join: u8) -> &mut Self {
        self.op(format!("{} j", join))
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(format!("{} {} {} RG", num(color.r), num(color.g), num(color.b)))
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.op(format!("{} {} {} rg", num(color.r), num(color.g), num(color.b)))
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format!("{} {} m", num(x), num(y)))
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format!("{} {} l", num(x), num(y)))
    }

    pub fn curve_to(&mut self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> &mut Self {
        self.op(format!(
            "{} {} {} {} {} {} c",
            num(c1.0),
            num(c1.1),
            num(c2.0),
            num(c2.1),
            num(end.0),
            num(end.1)
        ))
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.op("h".to_string())
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op("S".to_string())
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(format!("{} {} {} {} re", num(x), num(y), num(width), num(height)))
    }

    /// 之後的繪圖只在矩形內可見，需搭配 save/restore
    pub fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.rect(x, y, width, height);
        self.op("W n".to_string())
    }

    /// 以四段三次 Bézier 曲線組成的圓
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        let k = radius * KAPPA;
        self.move_to(cx + radius, cy)
            .curve_to((cx + radius, cy + k), (cx + k, cy + radius), (cx, cy + radius))
            .curve_to((cx - k, cy + radius), (cx - radius, cy + k), (cx - radius, cy))
            .curve_to((cx - radius, cy - k), (cx - k, cy - radius), (cx, cy - radius))
            .curve_to((cx + k, cy - radius), (cx + radius, cy - k), (cx + radius, cy))
            .close_path()
    }

    /// 在 (x, y) 放一行文字，`anchor` 決定 x 對齊文字的起點、中心或終點
    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        font_size: f64,
        anchor: TextAnchor,
        text: &str,
    ) -> &mut Self {
        let width = text_width(text, font_size);
        let x = match anchor {
            TextAnchor::Start => x,
            TextAnchor::Middle => x - width / 2.0,
            TextAnchor::End => x - width,
        };
        self.op(format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            FONT_RESOURCE,
            num(font_size),
            num(x),
            num(y),
            encode_text(text)
        ))
    }

    /// 逆時針旋轉 90 度的文字，以 y 方向置中
    pub fn text_vertical(&mut self, x: f64, y_center: f64, font_size: f64, text: &str) -> &mut Self {
        let y = y_center - text_width(text, font_size) / 2.0;
        self.op(format!(
            "BT /{} {} Tf 0 1 -1 0 {} {} Tm ({}) Tj ET",
            FONT_RESOURCE,
            num(font_size),
            num(x),
            num(y),
            encode_text(text)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.ops
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}

/// 只有一頁的 PDF 文件
#[derive(Debug, Clone)]
pub struct PdfDocument {
    width: f64,
    height: f64,
    title: Option<String>,
    content: ContentStream,
}

impl PdfDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: None,
            content: ContentStream::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content_mut(&mut self) -> &mut ContentStream {
        &mut self.content
    }

    /// 序列化成 PDF 位元組，含 xref 表與 trailer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut info = format!("<< /Producer (doc-tools {})", env!("CARGO_PKG_VERSION"));
        if let Some(title) = &self.title {
            info.push_str(&format!(" /Title ({})", encode_text(title)));
        }
        info.push_str(" >>");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /{} 4 0 R >> >> /Contents 5 0 R >>",
                num(self.width),
                num(self.height),
                FONT_RESOURCE
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                self.content.len(),
                self.content.as_str()
            ),
            info,
        ];

        let mut out: Vec<u8> = Vec::new();
        out.write_all(b"%PDF-1.4\n")?;

        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            write!(out, "{} 0 obj\n{}\nendobj\n", index + 1, body)?;
        }

        let xref_offset = out.len();
        write!(out, "xref\n0 {}\n", objects.len() + 1)?;
        out.write_all(b"0000000000 65535 f \n")?;
        for offset in &offsets {
            write!(out, "{:010} 00000 n \n", offset)?;
        }
        write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            objects.len(),
            xref_offset
        )?;

        Ok(out)
    }
}
