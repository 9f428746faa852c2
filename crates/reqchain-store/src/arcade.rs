//! ArcadeDB implementation of [`StoreExecutor`] over the HTTP command API.
//!
//! Every operation goes through the same authenticated POST to
//! `/api/v1/command/<database>`. Commands are rendered with bound
//! parameters: values travel in the request's `params` map, while the only
//! things embedded in command text are validated identifiers and RIDs.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::{Clause, EdgeDirection, Filter, StoreCommand, StoreQuery};
use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::record::StoreRecord;

/// JSON body of the ArcadeDB command endpoint.
#[derive(Debug, Serialize)]
struct SqlPayload {
    command: String,
    language: &'static str,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    params: serde_json::Map<String, serde_json::Value>,
}

impl SqlPayload {
    fn new(command: String) -> Self {
        SqlPayload {
            command,
            language: "sql",
            params: serde_json::Map::new(),
        }
    }

    fn bind(&mut self, value: &str) -> String {
        let name = format!("p{}", self.params.len());
        self.params
            .insert(name.clone(), serde_json::Value::from(value));
        format!(":{name}")
    }
}

/// A type or field name is only ever embedded after validation; values go
/// through `params`. Metadata names (`@rid`, `@type`) are allowed as filter
/// fields.
fn check_identifier(name: &str, what: &str) -> Result<(), StoreError> {
    let bare = name.strip_prefix('@').unwrap_or(name);
    let ok = !bare.is_empty()
        && bare
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidCommand {
            reason: format!("{what} `{name}` is not a valid identifier"),
        })
    }
}

/// Backtick-quote a regular name; metadata names are used bare.
fn quoted(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

fn render_filter(filter: &Filter, payload: &mut SqlPayload) -> Result<String, StoreError> {
    let mut parts = Vec::with_capacity(filter.clauses().len());
    for clause in filter.clauses() {
        check_identifier(clause.field(), "filter field")?;
        let op = match clause {
            Clause::Eq { .. } => "=",
            Clause::Ne { .. } => "<>",
        };
        let param = payload.bind(clause.value());
        parts.push(format!("{} {op} {param}", quoted(clause.field())));
    }
    Ok(parts.join(" AND "))
}

fn render_command(command: &StoreCommand) -> Result<SqlPayload, StoreError> {
    match command {
        StoreCommand::CreateVertex {
            vertex_type,
            fields,
        } => {
            check_identifier(vertex_type, "vertex type")?;
            let mut payload = SqlPayload::new(String::new());
            let mut assignments = Vec::with_capacity(fields.len());
            for (name, value) in fields {
                check_identifier(name, "field")?;
                let param = payload.bind(value);
                assignments.push(format!("{} = {param}", quoted(name)));
            }
            payload.command = format!(
                "CREATE VERTEX `{vertex_type}` SET {}",
                assignments.join(", ")
            );
            Ok(payload)
        }
        StoreCommand::CreateEdge {
            edge_type,
            from,
            to,
            if_not_exists,
        } => {
            check_identifier(edge_type, "edge type")?;
            let suffix = if *if_not_exists { " IF NOT EXISTS" } else { "" };
            Ok(SqlPayload::new(format!(
                "CREATE EDGE `{edge_type}` FROM {from} TO {to}{suffix}"
            )))
        }
        StoreCommand::Update {
            vertex_type,
            filter,
            fields,
        } => {
            check_identifier(vertex_type, "vertex type")?;
            if filter.is_empty() {
                return Err(StoreError::InvalidCommand {
                    reason: "refusing to render an UPDATE without a filter".to_string(),
                });
            }
            let mut payload = SqlPayload::new(String::new());
            let mut assignments = Vec::with_capacity(fields.len());
            for (name, value) in fields {
                check_identifier(name, "field")?;
                let param = payload.bind(value);
                assignments.push(format!("{} = {param}", quoted(name)));
            }
            let where_clause = render_filter(filter, &mut payload)?;
            payload.command = format!(
                "UPDATE `{vertex_type}` SET {} WHERE {where_clause}",
                assignments.join(", ")
            );
            Ok(payload)
        }
    }
}

fn render_query(query: &StoreQuery) -> Result<SqlPayload, StoreError> {
    match query {
        StoreQuery::Select {
            vertex_type,
            filter,
        } => {
            check_identifier(vertex_type, "vertex type")?;
            let mut payload = SqlPayload::new(String::new());
            payload.command = if filter.is_empty() {
                format!("SELECT FROM `{vertex_type}`")
            } else {
                let where_clause = render_filter(filter, &mut payload)?;
                format!("SELECT FROM `{vertex_type}` WHERE {where_clause}")
            };
            Ok(payload)
        }
        StoreQuery::Edges { vertex, direction } => {
            let expand = match direction {
                EdgeDirection::Outgoing => "outE()",
                EdgeDirection::Incoming => "inE()",
            };
            Ok(SqlPayload::new(format!(
                "SELECT @rid, @type, @out, @in FROM (SELECT expand({expand}) FROM {vertex})"
            )))
        }
    }
}

/// Extract the `result` array of a command response as typed records.
fn parse_records(body: &serde_json::Value) -> Result<Vec<StoreRecord>, StoreError> {
    let rows = body
        .get("result")
        .and_then(|v| v.as_array())
        .ok_or_else(|| StoreError::MalformedResponse {
            reason: "response has no `result` array".to_string(),
        })?;
    Ok(rows.iter().filter_map(StoreRecord::from_json).collect())
}

/// [`StoreExecutor`] backed by an ArcadeDB HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ArcadeDbExecutor {
    client: reqwest::Client,
    base_url: String,
    database: String,
    username: String,
    password: String,
}

impl ArcadeDbExecutor {
    /// Executor for the given server and database, with default root
    /// credentials. Use [`with_credentials`](Self::with_credentials) for
    /// anything real.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        ArcadeDbExecutor {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            database: database.into(),
            username: "root".to_string(),
            password: String::new(),
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    fn command_url(&self) -> String {
        format!(
            "{}/api/v1/command/{}",
            self.base_url.trim_end_matches('/'),
            self.database
        )
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64.encode(credentials))
    }

    async fn post(&self, payload: &SqlPayload) -> Result<serde_json::Value, StoreError> {
        debug!(command = %payload.command, "issuing store command");
        let response = self
            .client
            .post(self.command_url())
            .header("Authorization", self.auth_header())
            .json(payload)
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(command = %payload.command, status = status.as_u16(), "store rejected command");
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl StoreExecutor for ArcadeDbExecutor {
    async fn execute(&self, command: StoreCommand) -> Result<(), StoreError> {
        let payload = render_command(&command)?;
        self.post(&payload).await?;
        Ok(())
    }

    async fn select(&self, query: StoreQuery) -> Result<Vec<StoreRecord>, StoreError> {
        let payload = render_query(&query)?;
        let body = self.post(&payload).await?;
        parse_records(&body)
    }
}
