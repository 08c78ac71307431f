use serde::Serialize;

use crate::tools::{Intent, SqlVerdict};

/// 与 transcript 同生命周期的标量字段，由对应能力的结果写入
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub current_intent: Option<Intent>,
    pub generated_sql: Option<String>,
    pub sql_check_result: Option<SqlVerdict>,
    pub analysis_result: Option<String>,
}
