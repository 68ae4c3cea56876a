// ==========================================
// 仓库变更导入系统 - 上传处理流水线
// ==========================================
// 流程: 提取 → 准入过滤 → 行校验 → 请求构建
// 说明: 仅文件读取处有一次异步等待，其余步骤为同步纯计算
// ==========================================

use crate::config::IntakeRules;
use crate::domain::order_line::OrderLine;
use crate::engine::intake_filter::IntakeFilter;
use crate::engine::line_validator::LineValidator;
use crate::engine::request_builder::{RequestBuilder, RequestContext, RuleOutcome};
use crate::importer::{ExtractionSource, FileSource, TabularExtractor};
use tracing::{info, instrument};

pub struct IntakePipeline {
    rules: IntakeRules,
    extractor: TabularExtractor,
}

impl Default for IntakePipeline {
    fn default() -> Self {
        Self::new(IntakeRules::default())
    }
}

impl IntakePipeline {
    pub fn new(rules: IntakeRules) -> Self {
        Self {
            rules,
            extractor: TabularExtractor::new(),
        }
    }

    pub fn with_extractor(rules: IntakeRules, extractor: TabularExtractor) -> Self {
        Self { rules, extractor }
    }

    pub fn rules(&self) -> &IntakeRules {
        &self.rules
    }

    /// 处理上传文件，返回结果及实际解析路径
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        file: &dyn FileSource,
        context: &RequestContext,
    ) -> (ExtractionSource, RuleOutcome) {
        let extraction = self.extractor.extract(file).await;
        info!(source = ?extraction.source, rows = extraction.lines.len(), "提取完成");
        (extraction.source, self.evaluate(extraction.lines, context))
    }

    /// 对已提取的订单行执行规则
    pub fn evaluate(&self, lines: Vec<OrderLine>, context: &RequestContext) -> RuleOutcome {
        let filter = IntakeFilter::new(&self.rules);
        let eligible = filter.apply(lines);
        if eligible.is_empty() {
            info!("准入过滤后无订单行");
            return RuleOutcome::observations_only(vec![filter.empty_observation()]);
        }

        let validated = LineValidator::new(&self.rules).validate(eligible);
        RequestBuilder::new(&self.rules).build(validated, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_line::BlockFlags;
    use crate::importer::InMemoryFile;

    fn context() -> RequestContext {
        RequestContext {
            customer: "Cliente Demo".to_string(),
            requester: "Ana".to_string(),
            local_time: "10:30".to_string(),
        }
    }

    #[test]
    fn test_filtered_out_everything() {
        let pipeline = IntakePipeline::default();
        let blocked = OrderLine::new("1", "1", "S", 1.0, "1000", "PT15")
            .with_item_category("ZTAN")
            .with_block_flags(BlockFlags {
                shipping_block: Some("01".to_string()),
                ..BlockFlags::default()
            });

        let outcome = pipeline.evaluate(vec![blocked], &context());
        assert!(outcome.request.is_none());
        assert!(outcome.validated_lines.is_empty());
        assert_eq!(outcome.global_observations.len(), 1);
        assert!(outcome.global_observations[0].starts_with("No rows matched the upload filter"));
    }

    #[test]
    fn test_order_only_row_reaches_validation() {
        let pipeline = IntakePipeline::default();
        let line = OrderLine::new("4500", "10", "", 0.0, "PT15", "").with_item_category("ZTAN");

        let outcome = pipeline.evaluate(vec![line], &context());
        assert_eq!(outcome.validated_lines.len(), 1);
        assert!(!outcome.validated_lines[0].is_valid);
        assert!(outcome.request.is_none());
    }

    #[tokio::test]
    async fn test_empty_upload_runs_sample() {
        let pipeline = IntakePipeline::default();
        let file = InMemoryFile::from_text(Some("empty.csv"), "");

        let (source, outcome) = pipeline.run(&file, &context()).await;
        assert_eq!(source, ExtractionSource::Sample);
        let request = outcome.request.expect("sample produces a request");
        assert_eq!(request.lines.len(), 3);
        assert!(request.is_daily_emergency);
    }
}
