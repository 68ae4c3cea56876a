// ==========================================
// 仓库变更导入系统 - 字段映射器实现
// ==========================================
// 依据: 表头别名表（标准名 / 业务名 / snake_case / ERP 短码）
// 职责: RawLine → OrderLine 映射 + 数值/编码标准化
// ==========================================

use crate::domain::order_line::{BlockFlags, OrderLine, RawLine};
use crate::importer::normalizer::{expand_scientific_code, parse_ambiguous_number};
use std::collections::HashMap;

// ==========================================
// LineField - 逻辑字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineField {
    OrderNumber,
    LineItem,
    Sku,
    Quantity,
    OriginLocation,
    DestinationLocation,
    ItemCategory,
    OrderItemBlock,
    ReasonForRejection,
    DeliveryNote,
    ShippingBlock,
    ShipmentNumber,
}

impl LineField {
    pub const ALL: [LineField; 12] = [
        LineField::OrderNumber,
        LineField::LineItem,
        LineField::Sku,
        LineField::Quantity,
        LineField::OriginLocation,
        LineField::DestinationLocation,
        LineField::ItemCategory,
        LineField::OrderItemBlock,
        LineField::ReasonForRejection,
        LineField::DeliveryNote,
        LineField::ShippingBlock,
        LineField::ShipmentNumber,
    ];

    /// 可接受的表头别名（按优先级，先匹配者胜出）
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LineField::OrderNumber => &[
                "pedidoSAP",
                "orderNumber",
                "Sales Order Number",
                "sales_order",
                "SalesOrderNumber",
                "Sales Order",
                "VBELN",
            ],
            LineField::LineItem => &[
                "posicion",
                "lineItem",
                "Line Item",
                "line_item",
                "Order Item",
                "OrderItem",
                "POSNR",
            ],
            LineField::Sku => &["sku", "Material UCC14", "material", "Material", "SKU", "MATNR"],
            LineField::Quantity => &[
                "cantidad",
                "quantity",
                "qty",
                "Quantity",
                "Order Quantity",
                "order_qty",
                "KWMENG",
            ],
            LineField::OriginLocation => &[
                "almacenOrigen",
                "originLocation",
                "Storage Location",
                "storage_location",
                "StorageLocation",
                "LGORT",
            ],
            LineField::DestinationLocation => &[
                "almacenDestinoDeseado",
                "destinationLocation",
                "New storage Location",
                "new_storage_location",
                "New Storage Location",
            ],
            LineField::ItemCategory => &["itemCategory", "Item Category", "item_category", "PSTYV"],
            LineField::OrderItemBlock => &[
                "orderItemBlock",
                "Order Item block",
                "Order Item Block",
                "order_item_block",
            ],
            LineField::ReasonForRejection => &[
                "reasonForRejection",
                "Reason for Rejection",
                "reason_for_rejection",
                "ABGRU",
            ],
            LineField::DeliveryNote => &["deliveryNote", "Delivery Note", "delivery_note"],
            LineField::ShippingBlock => &[
                "shippingBlock",
                "Shipping Block",
                "shipping_block",
                "LIFSK",
            ],
            LineField::ShipmentNumber => &["shipmentNumber", "Shipment Number", "shipment_number"],
        }
    }
}

/// 表头标准化
///
/// # 规则
/// - 小写 + 去首尾空白
/// - 连续空白 / `-` / `/` → `_`
/// - 其他非 `[a-z0-9_]` 字符删除
pub fn normalize_header(header: &str) -> String {
    let lowered = header.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_separator = false;

    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' || c == '/' {
            if !in_separator {
                out.push('_');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
        }
    }
    out
}

/// 在标准化表头上解析逻辑字段（纯函数，与行容器无关）
///
/// # 参数
/// - field: 逻辑字段
/// - lookup: 任意"标准化表头 → 值"的查询函数
pub fn resolve_field<'a, F>(field: LineField, lookup: F) -> Option<&'a str>
where
    F: Fn(&str) -> Option<&'a str>,
{
    field
        .aliases()
        .iter()
        .find_map(|alias| lookup(&normalize_header(alias)))
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    /// 将原始行记录映射为 OrderLine
    ///
    /// 说明: 缺失字段映射为空串；数量经 `parse_ambiguous_number`，
    /// SKU 经 `expand_scientific_code`
    pub fn map_to_order_line(&self, row: &RawLine) -> OrderLine {
        // 标准化表头 → 原值（同名冲突时后者覆盖，BTreeMap 保证顺序稳定）
        let normalized: HashMap<String, &str> = row
            .iter()
            .map(|(header, value)| (normalize_header(header), value.as_str()))
            .collect();
        let get = |field: LineField| -> Option<String> {
            resolve_field(field, |key| normalized.get(key).copied()).map(|v| v.trim().to_string())
        };
        let text = |field: LineField| get(field).unwrap_or_default();

        OrderLine {
            order_number: text(LineField::OrderNumber),
            line_item: text(LineField::LineItem),
            sku: expand_scientific_code(&text(LineField::Sku)),
            quantity: parse_ambiguous_number(&text(LineField::Quantity)),
            origin_location: text(LineField::OriginLocation),
            destination_location: text(LineField::DestinationLocation),
            item_category: get(LineField::ItemCategory),
            block_flags: BlockFlags {
                order_item_block: get(LineField::OrderItemBlock),
                reason_for_rejection: get(LineField::ReasonForRejection),
                delivery_note: get(LineField::DeliveryNote),
                shipping_block: get(LineField::ShippingBlock),
                shipment_number: get(LineField::ShipmentNumber),
            },
        }
    }

    /// 批量映射，丢弃既无订单号又无 SKU 的行（空白/噪声行）
    pub fn map_rows(&self, rows: &[RawLine]) -> Vec<OrderLine> {
        rows.iter()
            .map(|row| self.map_to_order_line(row))
            .filter(|line| !line.order_number.is_empty() || !line.sku.is_empty())
            .collect()
    }
}
