/*
[INPUT]:  Table names, equality filters, and JSON records
[OUTPUT]: Matching rows and insert acknowledgements
[POS]:    HTTP layer - PostgREST table endpoints
[UPDATE]: When adding new table operations or changing query syntax
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{AdapterError, Result, SupabaseClient};
use crate::types::Filters;

impl SupabaseClient {
    /// Select `columns` of the rows matching every filter; no columns means all
    ///
    /// GET /rest/v1/{table}?select={columns}&{column}=eq.{value}
    pub async fn select_rows(
        &self,
        table: &str,
        columns: &[&str],
        filters: &Filters,
    ) -> Result<Vec<Value>> {
        let url = self.endpoint(["rest", "v1", table])?;
        let mut query = vec![("select".to_string(), select_list(columns))];
        query.extend(filters.to_query_pairs());

        let builder = self
            .request(Method::GET, url)
            .header("Accept", "application/json")
            .query(&query);
        let response = self.send_checked(builder).await?;
        let rows: Value = response.json().await?;
        match rows {
            Value::Array(rows) => Ok(rows),
            other => Err(AdapterError::InvalidResponse(format!(
                "expected an array of rows from {table}, got {other}"
            ))),
        }
    }

    /// Insert a single record
    ///
    /// POST /rest/v1/{table} with `Prefer: return=minimal`
    pub async fn insert_row(&self, table: &str, record: &Value) -> Result<()> {
        let url = self.endpoint(["rest", "v1", table])?;
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(&[record]);
        self.send_checked(builder).await?;
        Ok(())
    }
}

fn select_list(columns: &[&str]) -> String {
    if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(",")
    }
}
