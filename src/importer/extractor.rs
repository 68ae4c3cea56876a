// ==========================================
// 仓库变更导入系统 - 表格提取器
// ==========================================
// 流程: 工作簿 → JSON 数组 → 分隔符文本 → 内置样例
// 红线: 对任何输入都不报错；解析失败记录日志后进入下一路径
// ==========================================

use crate::domain::order_line::{OrderLine, RawLine};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{
    is_workbook_name, DelimitedParser, ExcelParser, JsonArrayParser, RecordParser,
};
use crate::importer::file_source::FileSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ==========================================
// ExtractionSource - 实际生效的解析路径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionSource {
    Workbook,
    Json,
    Delimited,
    Sample,
}

// ==========================================
// Extraction - 提取结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub source: ExtractionSource,
    pub lines: Vec<OrderLine>,
}

/// 内置样例订单行（无可解析内容时返回，保证流程可演示）
pub fn sample_lines() -> Vec<OrderLine> {
    [
        ("309440525", "152", "27501056344096", "PT15"),
        ("309448411", "52", "27791290795765", "PT11"),
        ("309448358", "32", "27805000323664", "PT11"),
    ]
    .into_iter()
    .map(|(order, item, sku, destination)| {
        OrderLine::new(order, item, sku, 1.0, "1000", destination).with_item_category("ZTAN")
    })
    .collect()
}

// ==========================================
// TabularExtractor - 表格提取器
// ==========================================
pub struct TabularExtractor {
    field_mapper: FieldMapper,
    fallback: Vec<OrderLine>,
}

impl Default for TabularExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularExtractor {
    pub fn new() -> Self {
        Self::with_fallback(sample_lines())
    }

    /// 指定无内容时的回退行
    pub fn with_fallback(fallback: Vec<OrderLine>) -> Self {
        Self {
            field_mapper: FieldMapper,
            fallback,
        }
    }

    /// 提取订单行
    #[instrument(skip(self, file), fields(file_name = file.name().unwrap_or("")))]
    pub async fn extract(&self, file: &dyn FileSource) -> Extraction {
        // === 路径 1: 二进制工作簿 ===
        if file.name().map_or(false, is_workbook_name) {
            match file.bytes().await {
                Some(bytes) => {
                    if let Some(lines) = self.try_parse(&ExcelParser, &bytes, "workbook") {
                        return self.finish(ExtractionSource::Workbook, lines);
                    }
                }
                None => debug!("文件不提供字节内容，跳过工作簿解析"),
            }
        }

        let text = file.text().await;
        if !text.trim().is_empty() {
            // === 路径 2: JSON 数组 ===
            if let Some(lines) = self.try_parse(&JsonArrayParser, text.as_bytes(), "json") {
                return self.finish(ExtractionSource::Json, lines);
            }

            // === 路径 3: 分隔符文本 ===
            if let Some(lines) = self.try_parse(&DelimitedParser, text.as_bytes(), "delimited") {
                return self.finish(ExtractionSource::Delimited, lines);
            }
        }

        // === 路径 4: 内置样例 ===
        warn!("未提取到任何订单行，使用内置样例");
        self.finish(ExtractionSource::Sample, self.fallback.clone())
    }

    /// 单路径解析 + 映射；失败或无有效行返回 None
    fn try_parse(
        &self,
        parser: &dyn RecordParser,
        content: &[u8],
        label: &str,
    ) -> Option<Vec<OrderLine>> {
        let records: Vec<RawLine> = match parser.parse_records(content) {
            Ok(records) => records,
            Err(e) => {
                debug!(parser = label, error = %e, "解析路径未命中");
                return None;
            }
        };

        let lines = self.field_mapper.map_rows(&records);
        debug!(
            parser = label,
            raw_rows = records.len(),
            mapped = lines.len(),
            "解析路径完成"
        );
        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }

    fn finish(&self, source: ExtractionSource, lines: Vec<OrderLine>) -> Extraction {
        info!(source = ?source, lines = lines.len(), "订单行提取完成");
        Extraction { source, lines }
    }
}
