//! Company profile and financial statements from Yahoo `quoteSummary`

use std::collections::BTreeMap;

use findata_core::{AdapterError, HttpRequest, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules merged into [`CompanyInfo`]
const INFO_MODULES: &[&str] = &[
    "assetProfile",
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
];

/// Flat key/value company profile
pub type CompanyInfo = BTreeMap<String, Value>;

/// Which financial statement to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Income,
    BalanceSheet,
    Cashflow,
}

impl StatementKind {
    fn module(self) -> &'static str {
        match self {
            Self::Income => "incomeStatementHistory",
            Self::BalanceSheet => "balanceSheetHistory",
            Self::Cashflow => "cashflowStatementHistory",
        }
    }

    fn list_field(self) -> &'static str {
        match self {
            Self::Income => "incomeStatementHistory",
            Self::BalanceSheet => "balanceSheetStatements",
            Self::Cashflow => "cashflowStatements",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Income => "financials",
            Self::BalanceSheet => "balance_sheet",
            Self::Cashflow => "cashflow",
        })
    }
}

/// Financial statement: line items by reporting period.
///
/// Every row has exactly one entry per period, `None` where the period did
/// not report the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub periods: Vec<String>,
    pub rows: BTreeMap<String, Vec<Option<f64>>>,
}

impl StatementTable {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }

    /// Values of one line item, aligned with `periods`
    pub fn row(&self, item: &str) -> Option<&[Option<f64>]> {
        self.rows.get(item).map(Vec::as_slice)
    }
}

pub(crate) fn info_request(ticker: &str) -> HttpRequest {
    HttpRequest::get(format!("{QUOTE_SUMMARY_URL}/{ticker}"))
        .with_query("modules", INFO_MODULES.join(","))
}

pub(crate) fn statement_request(ticker: &str, kind: StatementKind) -> HttpRequest {
    HttpRequest::get(format!("{QUOTE_SUMMARY_URL}/{ticker}")).with_query("modules", kind.module())
}

/// First entry of `quoteSummary.result`
fn summary_result(body: &Value) -> Result<&Value> {
    body.pointer("/quoteSummary/result/0").ok_or_else(|| {
        let reason = body
            .pointer("/quoteSummary/error/description")
            .and_then(Value::as_str)
            .unwrap_or("missing quoteSummary.result");
        AdapterError::MalformedResponse(reason.to_string())
    })
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; keep the raw value
fn unwrap_formatted(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.contains_key("raw") => map["raw"].clone(),
        Value::Object(map) if map.is_empty() => Value::Null,
        other => other.clone(),
    }
}

pub(crate) fn parse_company_info(body: &Value) -> Result<CompanyInfo> {
    let result = summary_result(body)?;
    let mut info = CompanyInfo::new();

    for module in INFO_MODULES {
        let Some(Value::Object(fields)) = result.get(*module) else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            let value = unwrap_formatted(value);
            if !value.is_null() {
                // earlier modules win on key clashes
                info.entry(key.clone()).or_insert(value);
            }
        }
    }

    if info.is_empty() {
        return Err(AdapterError::EmptyResult("no company info fields".to_string()));
    }
    Ok(info)
}

pub(crate) fn parse_statement(body: &Value, kind: StatementKind) -> Result<StatementTable> {
    let result = summary_result(body)?;
    let statements = result
        .get(kind.module())
        .and_then(|module| module.get(kind.list_field()))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AdapterError::MalformedResponse(format!("missing {} module", kind.module()))
        })?;

    let mut table = StatementTable::default();
    let width = statements.len();

    for (column, statement) in statements.iter().enumerate() {
        let period = statement
            .pointer("/endDate/fmt")
            .and_then(Value::as_str)
            .map_or_else(|| format!("period_{column}"), str::to_string);
        table.periods.push(period);

        let Some(fields) = statement.as_object() else {
            continue;
        };
        for (item, value) in fields {
            if item == "endDate" || item == "maxAge" {
                continue;
            }
            let number = unwrap_formatted(value).as_f64();
            table
                .rows
                .entry(item.clone())
                .or_insert_with(|| vec![None; width])[column] = number;
        }
    }

    if table.is_empty() {
        return Err(AdapterError::EmptyResult(format!("no {kind} rows")));
    }
    Ok(table)
}
