use async_trait::async_trait;
use tracing::debug;

use super::capability::{self, Capability, Intent};
use super::manifest::{ToolManifest, ToolPort};
use super::{Tool, ToolInvocation};
use crate::agent::AgentMessage;
use crate::error::Result;
use crate::state::FlowContext;

pub struct RecognizeIntentTool;

#[async_trait]
impl Tool for RecognizeIntentTool {
    fn capability(&self) -> Capability {
        Capability::RecognizeIntent
    }

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder(self.capability().name())
            .description("识别用户查询的意图，例如“销售额查询”、“用户增长分析”等。")
            .input(ToolPort::string("user_query").with_description("用户的原始问题"))
            .build()
    }

    async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage> {
        let intent = capability::recognize_intent(invocation.arg_str("user_query")?);
        debug!(%intent, "intent recognized");
        ctx.update_state(|state| state.current_intent = Some(intent));
        Ok(invocation.result(intent.as_str()))
    }
}

pub struct GenerateSqlTool;

#[async_trait]
impl Tool for GenerateSqlTool {
    fn capability(&self) -> Capability {
        Capability::GenerateSql
    }

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder(self.capability().name())
            .description("根据用户意图和查询生成 SQL 语句。")
            .input(ToolPort::string("intent").with_description("recognize_intent 返回的意图标签"))
            .input(ToolPort::string("user_query").with_description("用户的原始问题"))
            .build()
    }

    async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage> {
        let intent = Intent::from_label(invocation.arg_str("intent")?);
        let sql = capability::generate_sql(intent, invocation.arg_str("user_query")?);
        ctx.update_state(|state| state.generated_sql = Some(sql.to_string()));
        Ok(invocation.result(sql))
    }
}

pub struct SqlCheckerTool;

#[async_trait]
impl Tool for SqlCheckerTool {
    fn capability(&self) -> Capability {
        Capability::SqlChecker
    }

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder(self.capability().name())
            .description("检查生成的 SQL 语句的语法和有效性.")
            .input(ToolPort::string("sql_query").with_description("待检查的 SQL"))
            .build()
    }

    async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage> {
        let verdict = capability::check_sql(invocation.arg_str("sql_query")?);
        ctx.update_state(|state| state.sql_check_result = Some(verdict));
        Ok(invocation.result(verdict.as_str()))
    }
}

pub struct DataAnalyzerTool;

#[async_trait]
impl Tool for DataAnalyzerTool {
    fn capability(&self) -> Capability {
        Capability::DataAnalyzer
    }

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder(self.capability().name())
            .description("执行 SQL 查询并对结果进行数据分析，返回自然语言摘要.")
            .input(ToolPort::string("sql_query").with_description("已通过检查的 SQL"))
            .build()
    }

    async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage> {
        let summary = capability::analyze_data(invocation.arg_str("sql_query")?);
        ctx.update_state(|state| state.analysis_result = Some(summary.to_string()));
        Ok(invocation.result(summary))
    }
}
