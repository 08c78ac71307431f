//! 四个模拟的 BI 能力：意图识别、SQL 生成、SQL 检查、数据分析。
//!
//! 全部是纯函数，分类失败时返回哨兵值而不是错误。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const SALES_KEYWORD: &str = "销售额";
pub const USER_GROWTH_KEYWORD: &str = "用户增长";

pub const SALES_SQL: &str = "SELECT SUM(amount) FROM sales WHERE date >= 'last_week';";
pub const USER_GROWTH_SQL: &str = "SELECT region, COUNT(user_id) FROM users GROUP BY region;";
pub const UNKNOWN_INTENT_SQL: &str = "SELECT 'Error: Could not generate SQL for unknown intent.'";

pub const SQL_ERROR_MARKER: &str = "Error";
pub const DANGEROUS_KEYWORD: &str = "DROP TABLE";

pub const SALES_SUMMARY: &str = "上周销售额为 100 万美元，同比增长 10%。";
pub const USER_GROWTH_SUMMARY: &str =
    "所有区域的用户增长都呈现稳定上升趋势，尤其是在亚太地区增长显著。";
pub const FALLBACK_SUMMARY: &str = "无法提供详细分析，请检查查询。";

/// 能力标签，固定四种
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    RecognizeIntent,
    GenerateSql,
    SqlChecker,
    DataAnalyzer,
}

static BY_NAME: Lazy<HashMap<&'static str, Capability>> = Lazy::new(|| {
    Capability::ALL
        .iter()
        .map(|capability| (capability.name(), *capability))
        .collect()
});

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::RecognizeIntent,
        Capability::GenerateSql,
        Capability::SqlChecker,
        Capability::DataAnalyzer,
    ];

    /// 暴露给模型的工具名
    pub fn name(&self) -> &'static str {
        match self {
            Capability::RecognizeIntent => "recognize_intent",
            Capability::GenerateSql => "generate_sql",
            Capability::SqlChecker => "sql_checker",
            Capability::DataAnalyzer => "data_analyzer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 用户问题的粗粒度意图
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SalesQuery,
    UserGrowthAnalysis,
    #[serde(rename = "unknown_intent")]
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SalesQuery => "sales_query",
            Intent::UserGrowthAnalysis => "user_growth_analysis",
            Intent::Unknown => "unknown_intent",
        }
    }

    /// 任意标签都能解析，未知标签归为 `unknown_intent`
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "sales_query" => Intent::SalesQuery,
            "user_growth_analysis" => Intent::UserGrowthAnalysis,
            _ => Intent::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Intent::Unknown
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlIssue {
    ContainsErrors,
    Dangerous,
}

/// SQL 检查结论
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict", content = "issue")]
pub enum SqlVerdict {
    Valid,
    Error(SqlIssue),
}

impl SqlVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlVerdict::Valid => "SQL_VALID",
            SqlVerdict::Error(SqlIssue::ContainsErrors) => {
                "SQL_ERROR: Generated SQL contains errors."
            }
            SqlVerdict::Error(SqlIssue::Dangerous) => {
                "SQL_ERROR: Potentially dangerous SQL command."
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SqlVerdict::Valid)
    }
}

impl fmt::Display for SqlVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SqlVerdict::Valid,
            SqlVerdict::Error(SqlIssue::ContainsErrors),
            SqlVerdict::Error(SqlIssue::Dangerous),
        ]
        .into_iter()
        .find(|verdict| verdict.as_str() == s.trim())
        .ok_or_else(|| format!("unrecognized sql verdict `{s}`"))
    }
}

pub fn recognize_intent(user_query: &str) -> Intent {
    if user_query.contains(SALES_KEYWORD) {
        Intent::SalesQuery
    } else if user_query.contains(USER_GROWTH_KEYWORD) {
        Intent::UserGrowthAnalysis
    } else {
        Intent::Unknown
    }
}

pub fn generate_sql(intent: Intent, _user_query: &str) -> &'static str {
    match intent {
        Intent::SalesQuery => SALES_SQL,
        Intent::UserGrowthAnalysis => USER_GROWTH_SQL,
        Intent::Unknown => UNKNOWN_INTENT_SQL,
    }
}

pub fn check_sql(sql_query: &str) -> SqlVerdict {
    if sql_query.contains(SQL_ERROR_MARKER) {
        SqlVerdict::Error(SqlIssue::ContainsErrors)
    } else if sql_query.to_uppercase().contains(DANGEROUS_KEYWORD) {
        SqlVerdict::Error(SqlIssue::Dangerous)
    } else {
        SqlVerdict::Valid
    }
}

pub fn analyze_data(sql_query: &str) -> &'static str {
    if sql_query.contains("SUM(amount)") {
        SALES_SUMMARY
    } else if sql_query.contains("COUNT(user_id)") {
        USER_GROWTH_SUMMARY
    } else {
        FALLBACK_SUMMARY
    }
}
