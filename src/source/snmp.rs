//! net-snmp command line backend.

use std::io;
use std::process::Command;

use raidwatch_types::{QueryResult, QueryValue, Snapshot};
use tracing::{debug, info};

use super::collector::{discover_base, Collector};
use super::{QueryService, SnapshotSource};
use crate::decode::Blacklist;
use crate::error::SourceError;

const SNMPGET: &str = "snmpget";
const SNMPWALK: &str = "snmpwalk";

/// Agent notices that stand in for a value when nothing is there.
const NOTICES: &[&str] = &["No Such Object", "No Such Instance", "No more variables"];

/// Queries an agent by running `snmpget` and `snmpwalk`.
#[derive(Debug, Clone)]
pub struct SnmpCli {
    host: String,
    community: String,
    version: String,
}

impl SnmpCli {
    pub fn new(host: impl Into<String>, community: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            community: community.into(),
            version: version.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn run(&self, program: &str, oid: &str) -> Result<String, SourceError> {
        debug!(program, version = %self.version, host = %self.host, oid, "performing query");

        let output = Command::new(program)
            .args(["-v", &self.version, "-O", "v", "-c", &self.community, &self.host, oid])
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => SourceError::MissingTool(program.to_string()),
                _ => SourceError::Io(e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(oid, raw = %stdout, "query output");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() { stdout.as_str() } else { stderr.trim() };
            return Err(SourceError::Query {
                oid: oid.to_string(),
                message: message.to_string(),
            });
        }
        Ok(stdout)
    }
}

impl QueryService for SnmpCli {
    fn get(&self, oid: &str) -> Result<QueryResult, SourceError> {
        let output = self.run(SNMPGET, oid)?;
        parse_output(&output)
            .into_iter()
            .next()
            .map(QueryResult::Scalar)
            .ok_or_else(|| SourceError::Query {
                oid: oid.to_string(),
                message: "empty response".to_string(),
            })
    }

    fn walk(&self, oid: &str) -> Result<QueryResult, SourceError> {
        let output = self.run(SNMPWALK, oid)?;
        let values = parse_output(&output)
            .into_iter()
            .filter(|value| !value.as_str().is_some_and(is_notice))
            .collect();
        Ok(QueryResult::List(values))
    }
}

/// Parse `-O v` output, one value per non-empty line.
///
/// `INTEGER` and unsigned counter lines become integers, `STRING` lines
/// lose their quotes, and anything else is kept as text.
pub fn parse_output(output: &str) -> Vec<QueryValue> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> QueryValue {
    let Some((style, value)) = line.split_once(':') else {
        return QueryValue::from(line);
    };
    match style {
        "INTEGER" | "Gauge32" | "Counter32" | "Counter64" | "Unsigned32" => match value.trim().parse::<i64>() {
            Ok(n) => QueryValue::Integer(n),
            Err(_) => QueryValue::from(line),
        },
        "STRING" => QueryValue::from(value.trim().trim_matches('"').trim()),
        _ => QueryValue::from(value.trim()),
    }
}

pub(crate) fn is_notice(text: &str) -> bool {
    NOTICES.iter().any(|notice| text.starts_with(notice))
}

/// Live source: discovers the base address, then collects.
#[derive(Debug)]
pub struct SnmpSource {
    cli: SnmpCli,
    blacklist: Blacklist,
    description: String,
}

impl SnmpSource {
    pub fn new(cli: SnmpCli, blacklist: Blacklist) -> Self {
        let description = format!("snmp: {}", cli.host());
        Self {
            cli,
            blacklist,
            description,
        }
    }
}

impl SnapshotSource for SnmpSource {
    fn fetch(&mut self) -> Result<Snapshot, SourceError> {
        let base = discover_base(&self.cli, self.cli.host())?;
        info!(host = %self.cli.host(), base, "detected array type");
        Collector::new(&self.cli, base, &self.blacklist).collect()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
