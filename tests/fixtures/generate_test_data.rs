// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成订单行演示数据集（CSV / 分号分隔）
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::{Writer, WriterBuilder};
use std::error::Error;
use std::fs::{self, File};

// 表头（ERP 导出列名）
const CSV_HEADER: &[&str] = &[
    "Sales Order Number",
    "Line Item",
    "Material UCC14",
    "Order Quantity",
    "Storage Location",
    "New storage Location",
    "Item Category",
    "Order Item Block",
    "Reason for Rejection",
    "Delivery Note",
    "Shipping Block",
    "Shipment Number",
];

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 订单行记录
#[derive(Clone)]
struct LineRecord {
    order_number: String,
    line_item: String,
    sku: String,
    quantity: String,
    origin: String,
    destination: String,
    item_category: String,
    order_item_block: String,
    reason_for_rejection: String,
    delivery_note: String,
    shipping_block: String,
    shipment_number: String,
}

impl LineRecord {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.line_item.clone(),
            self.sku.clone(),
            self.quantity.clone(),
            self.origin.clone(),
            self.destination.clone(),
            self.item_category.clone(),
            self.order_item_block.clone(),
            self.reason_for_rejection.clone(),
            self.delivery_note.clone(),
            self.shipping_block.clone(),
            self.shipment_number.clone(),
        ]
    }
}

// 生成正常订单行
fn generate_normal_record(index: usize) -> LineRecord {
    LineRecord {
        order_number: format!("{}", 309_440_000 + index / 4),
        line_item: format!("{}", 10 * (index % 4 + 1)),
        sku: format!("{}", 27_501_056_344_096u64 + index as u64),
        quantity: format!("{}", 1 + index % 12),
        origin: ["1000", "PT11", "PT15"][index % 3].to_string(),
        destination: ["PT15", "PT11", "", "1000"][index % 4].to_string(),
        item_category: "ZTAN".to_string(),
        order_item_block: String::new(),
        reason_for_rejection: String::new(),
        delivery_note: String::new(),
        shipping_block: String::new(),
        shipment_number: String::new(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常数据 (40条)
    generate_normal_data()?;

    // 2. 过滤场景（类别 / 库位 / 阻断标记）
    generate_filtered_rows()?;

    // 3. 校验失败场景
    generate_invalid_lines()?;

    // 4. ERP 导出格式（分号 + 欧式数字 + 科学计数法）
    generate_erp_export()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn write_dataset(
    name: &str,
    delimiter: u8,
    records: &[LineRecord],
) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/{}", OUTPUT_DIR, name);
    let file = File::create(&path)?;
    let mut wtr: Writer<File> = WriterBuilder::new().delimiter(delimiter).from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.write_record(&record.to_row())?;
    }
    wtr.flush()?;

    println!("✓ 生成 {} ({}条)", name, records.len());
    Ok(())
}

fn generate_normal_data() -> Result<(), Box<dyn Error>> {
    let records: Vec<LineRecord> = (0..40).map(generate_normal_record).collect();
    write_dataset("01_normal_lines.csv", b',', &records)
}

fn generate_filtered_rows() -> Result<(), Box<dyn Error>> {
    let mut records = Vec::new();

    // 类别不符
    let mut record = generate_normal_record(100);
    record.item_category = "ZTAK".to_string();
    records.push(record);

    // 来源库位不在允许列表
    let mut record = generate_normal_record(101);
    record.origin = "PT99".to_string();
    records.push(record);

    // 各阻断标记
    for (i, flag) in ["order_item_block", "reason_for_rejection", "delivery_note", "shipping_block", "shipment_number"]
        .iter()
        .enumerate()
    {
        let mut record = generate_normal_record(102 + i);
        match *flag {
            "order_item_block" => record.order_item_block = "Z1".to_string(),
            "reason_for_rejection" => record.reason_for_rejection = "Z5".to_string(),
            "delivery_note" => record.delivery_note = "80001234".to_string(),
            "shipping_block" => record.shipping_block = "01".to_string(),
            _ => record.shipment_number = "SH-1".to_string(),
        }
        records.push(record);
    }

    // 一条正常行
    records.push(generate_normal_record(110));
    write_dataset("02_filtered_rows.csv", b',', &records)
}

fn generate_invalid_lines() -> Result<(), Box<dyn Error>> {
    let mut records = Vec::new();

    let mut record = generate_normal_record(200);
    record.quantity = "0".to_string();
    records.push(record);

    let mut record = generate_normal_record(201);
    record.sku = String::new();
    records.push(record);

    let mut record = generate_normal_record(202);
    record.line_item = String::new();
    records.push(record);

    let mut record = generate_normal_record(203);
    record.quantity = "abc".to_string();
    records.push(record);

    let mut record = generate_normal_record(204);
    record.quantity = "-3".to_string();
    records.push(record);

    records.push(generate_normal_record(205));
    write_dataset("03_invalid_lines.csv", b',', &records)
}

fn generate_erp_export() -> Result<(), Box<dyn Error>> {
    let records: Vec<LineRecord> = (0..10)
        .map(|i| {
            let mut record = generate_normal_record(300 + i);
            record.sku = format!("2.7805{:02}E+13", i);
            record.quantity = format!("1.{:03},5", i);
            record
        })
        .collect();
    write_dataset("04_erp_export.csv", b';', &records)
}
