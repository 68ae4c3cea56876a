// ==========================================
// 仓库变更导入系统 - 文件解析器实现
// ==========================================
// 职责: 文件内容 → 原始行记录（RawLine）
// 支持: Excel (.xlsx/.xls/.xlsb，仅第一个工作表) / JSON 数组 / 分隔符文本
// ==========================================

use crate::domain::order_line::RawLine;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::io::Cursor;

/// 分隔符文本的最少列数（少于此数视为非表格文本）
pub const MIN_DELIMITED_COLUMNS: usize = 5;

/// 工作簿扩展名
const WORKBOOK_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".xlsb"];

/// 按文件名判断是否为二进制工作簿
pub fn is_workbook_name(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    WORKBOOK_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

// ==========================================
// RecordParser Trait
// ==========================================
// 实现者: ExcelParser, JsonArrayParser, DelimitedParser
pub trait RecordParser: Send + Sync {
    /// 解析文件内容为原始行记录
    fn parse_records(&self, content: &[u8]) -> ImportResult<Vec<RawLine>>;
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl RecordParser for ExcelParser {
    fn parse_records(&self, content: &[u8]) -> ImportResult<Vec<RawLine>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::EmptyWorkbook)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行（空单元格默认为空串）
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = RawLine::new();
            for (col_idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let value = data_row
                    .get(col_idx)
                    .map(|cell| cell.to_string().trim().to_string())
                    .unwrap_or_default();
                row_map.insert(header.clone(), value);
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// JSON 数组 Parser 实现
// ==========================================
pub struct JsonArrayParser;

impl RecordParser for JsonArrayParser {
    fn parse_records(&self, content: &[u8]) -> ImportResult<Vec<RawLine>> {
        let value: Value = serde_json::from_slice(content)?;
        let Value::Array(items) = value else {
            return Err(ImportError::JsonParseError("顶层不是数组".to_string()));
        };

        Ok(items.iter().map(json_object_to_row).collect())
    }
}

/// 扁平 JSON 对象 → RawLine（null 视为缺失；非对象元素 → 空行）
fn json_object_to_row(item: &Value) -> RawLine {
    let Value::Object(map) = item else {
        return RawLine::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => json_number_text(n),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// 数字转文本；整数值的浮点数不带 `.0`（保持物料号精确）
fn json_number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

// ==========================================
// 分隔符文本 Parser 实现
// ==========================================
// 分隔符: `,` / `;` / 制表符，按表头行出现次数最多者识别
pub struct DelimitedParser;

impl DelimitedParser {
    /// 从表头行识别分隔符（并列时优先级 `,` > `;` > `\t`）
    pub fn sniff_delimiter(text: &str) -> u8 {
        let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        let mut best = (b',', 0usize);
        for candidate in [b',', b';', b'\t'] {
            let count = header.bytes().filter(|b| *b == candidate).count();
            if count > best.1 {
                best = (candidate, count);
            }
        }
        best.0
    }
}

impl RecordParser for DelimitedParser {
    fn parse_records(&self, content: &[u8]) -> ImportResult<Vec<RawLine>> {
        let text = String::from_utf8_lossy(content);
        let delimiter = Self::sniff_delimiter(&text);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.len() < MIN_DELIMITED_COLUMNS {
            return Ok(Vec::new());
        }

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = RawLine::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if !header.is_empty() {
                        row_map.insert(header.clone(), value.trim().to_string());
                    }
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(records)
    }
}
