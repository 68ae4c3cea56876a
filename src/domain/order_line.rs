// ==========================================
// 仓库变更导入系统 - 订单行领域模型
// ==========================================
// 依据: 数据模型 RawLine / OrderLine / ValidatedLine
// 生命周期: 文件解析 → 字段映射 → 准入过滤 → 行校验
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RawLine - 原始行记录
// ==========================================
// 用途: 文件解析产物（列名 → 单元格文本），未做任何语义转换
// 说明: 使用 BTreeMap 保证同一文件多次解析的遍历顺序一致
pub type RawLine = BTreeMap<String, String>;

// ==========================================
// BlockFlags - 阻断标记（5 个 ERP 列）
// ==========================================
// 任一非空 → 该行不进入本流程
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFlags {
    pub order_item_block: Option<String>,
    pub reason_for_rejection: Option<String>,
    pub delivery_note: Option<String>,
    pub shipping_block: Option<String>,
    pub shipment_number: Option<String>,
}

impl BlockFlags {
    /// 所有阻断标记均为空白
    pub fn is_clear(&self) -> bool {
        [
            &self.order_item_block,
            &self.reason_for_rejection,
            &self.delivery_note,
            &self.shipping_block,
            &self.shipment_number,
        ]
        .iter()
        .all(|flag| is_blank(flag.as_deref()))
    }
}

// ==========================================
// OrderLine - 标准订单行
// ==========================================
// 红线: 只能由字段映射器从 RawLine 构造，构造后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub order_number: String,         // 销售订单号（VBELN）
    pub line_item: String,            // 行项目（POSNR）
    pub sku: String,                  // 物料号（MATNR / UCC14）
    pub quantity: f64,                // 订单数量（KWMENG）
    pub origin_location: String,      // 当前库位（LGORT）
    pub destination_location: String, // 期望新库位

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category: Option<String>, // 行项目类别（PSTYV）

    #[serde(flatten)]
    pub block_flags: BlockFlags,
}

impl OrderLine {
    pub fn new(
        order_number: impl Into<String>,
        line_item: impl Into<String>,
        sku: impl Into<String>,
        quantity: f64,
        origin_location: impl Into<String>,
        destination_location: impl Into<String>,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            line_item: line_item.into(),
            sku: sku.into(),
            quantity,
            origin_location: origin_location.into(),
            destination_location: destination_location.into(),
            item_category: None,
            block_flags: BlockFlags::default(),
        }
    }

    pub fn with_item_category(mut self, item_category: impl Into<String>) -> Self {
        self.item_category = Some(item_category.into());
        self
    }

    pub fn with_block_flags(mut self, block_flags: BlockFlags) -> Self {
        self.block_flags = block_flags;
        self
    }

    /// 是否请求变更仓库（目标库位非空且与当前库位不同）
    pub fn requests_warehouse_change(&self) -> bool {
        let destination = self.destination_location.trim();
        !destination.is_empty() && destination != self.origin_location.trim()
    }
}

// ==========================================
// ValidatedLine - 校验后的订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedLine {
    #[serde(flatten)]
    pub line: OrderLine,
    pub is_valid: bool,
    pub observations: Vec<String>,
    pub recommendation: String,
}

impl ValidatedLine {
    /// 用于全局观察信息的行标识（缺失时使用占位符）
    pub fn display_id(&self) -> String {
        let order = non_blank_or(&self.line.order_number, "NO_ORDER");
        let item = non_blank_or(&self.line.line_item, "NO_LINE");
        format!("{} / {}", order, item)
    }
}

/// 空值或纯空白
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn non_blank_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_flags_clear() {
        let mut flags = BlockFlags::default();
        assert!(flags.is_clear());

        flags.delivery_note = Some("   ".to_string());
        assert!(flags.is_clear());

        flags.shipping_block = Some("01".to_string());
        assert!(!flags.is_clear());
    }

    #[test]
    fn test_requests_warehouse_change() {
        assert!(OrderLine::new("1", "10", "SKU", 1.0, "1000", "PT15").requests_warehouse_change());
        assert!(!OrderLine::new("1", "10", "SKU", 1.0, "1000", " ").requests_warehouse_change());
        assert!(!OrderLine::new("1", "10", "SKU", 1.0, "1000", "1000 ").requests_warehouse_change());
    }

    #[test]
    fn test_order_line_serializes_camel_case_with_flat_flags() {
        let line = OrderLine::new("4500", "10", "SKU1", 2.0, "1000", "PT11").with_item_category("ZTAN");
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["orderNumber"], "4500");
        assert_eq!(value["destinationLocation"], "PT11");
        assert_eq!(value["itemCategory"], "ZTAN");
        assert!(value.get("blockFlags").is_none());
        assert!(value.get("orderItemBlock").is_some());
    }

    #[test]
    fn test_display_id_placeholders() {
        let validated = ValidatedLine {
            line: OrderLine::new("", "", "SKU", 1.0, "1000", ""),
            is_valid: false,
            observations: vec![],
            recommendation: String::new(),
        };
        assert_eq!(validated.display_id(), "NO_ORDER / NO_LINE");
    }

    #[test]
    fn test_display_id_whitespace_only_ids() {
        let validated = ValidatedLine {
            line: OrderLine::new("   ", " 10 ", "SKU", 1.0, "1000", ""),
            is_valid: false,
            observations: vec![],
            recommendation: String::new(),
        };
        assert_eq!(validated.display_id(), "NO_ORDER / 10");
    }
}
