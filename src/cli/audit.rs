//! Audit log CLI command

use anyhow::Result;

use crate::audit::{AuditEntry, AuditLogger};
use crate::response::Response;

use super::Output;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(audit: &AuditLogger, out: &Output, count: usize) -> Result<()> {
    let response: Response<Vec<AuditEntry>> = audit.read_recent(count).into();
    out.emit(response, |entries| {
        if entries.is_empty() {
            return "No audit entries.".to_string();
        }
        entries
            .iter()
            .map(|e| e.format_human_readable())
            .collect::<Vec<_>>()
            .join("\n")
    })
}
