// ==========================================
// 仓库变更导入系统 - 导入层
// ==========================================
// 职责: 上传文件 → 标准订单行（OrderLine）
// 支持: Excel, JSON 数组, CSV/分号/制表符文本
// ==========================================

// 模块声明
pub mod error;
pub mod extractor;
pub mod field_mapper;
pub mod file_parser;
pub mod file_source;
pub mod normalizer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use extractor::{sample_lines, Extraction, ExtractionSource, TabularExtractor};
pub use field_mapper::{normalize_header, resolve_field, FieldMapper, LineField};
pub use file_parser::{DelimitedParser, ExcelParser, JsonArrayParser, RecordParser};
pub use file_source::{FileSource, InMemoryFile, LocalFile};
pub use normalizer::{expand_scientific_code, parse_ambiguous_number};
