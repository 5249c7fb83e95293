//! TASKTYPES section: `TASKTYPES ( TaskTypeID [Size] )*`.

use jobflow_diagnostics::{Diagnostic, LineRange, codes};

use super::{Parser, TaskPos, ctx, parse_unsigned};
use crate::model::{TaskTypeId, UNSIZED};

impl Parser {
    pub(crate) fn task_type_token(&mut self, token: &str, line: u32) {
        if TaskTypeId::mentions_letter(token) {
            let id = if TaskTypeId::is_well_formed(token) {
                TaskTypeId::new(token)
            } else {
                let id = TaskTypeId::corrected(token);
                self.diags.push(
                    Diagnostic::warn(
                        codes::INVALID_TASK_TYPE_ID,
                        format!("invalid task type identifier {token}, corrected to {id}"),
                        Some(LineRange::single(line)),
                    )
                    .with_context(ctx!("token" => token, "corrected" => id.as_str())),
                );
                id
            };

            // Within one declaration run a repeated identifier is dropped;
            // across runs it re-opens the existing entry.
            if !self.task_run_seen.insert(id.as_str().to_string()) {
                self.diags.push(
                    Diagnostic::warn(
                        codes::DUPLICATE_ID,
                        format!("task type {id} already declared, ignoring"),
                        Some(LineRange::single(line)),
                    )
                    .with_context(ctx!("id" => id.as_str())),
                );
                self.task_pos = TaskPos::ExpectId;
                return;
            }

            self.workflow.task_types.entry(id.clone()).or_insert(UNSIZED);
            self.task_pos = TaskPos::ExpectSize(id);
        } else if let TaskPos::ExpectSize(id) = std::mem::take(&mut self.task_pos) {
            // A consumed size still counts as seen for duplicate detection.
            self.task_run_seen.insert(token.to_string());
            let owner = format!("task type {id}");
            if let Some(size) = parse_unsigned(&mut self.diags, token, &owner, line) {
                self.workflow.task_types.insert(id, size);
            }
        } else if !self.task_run_seen.insert(token.to_string()) {
            self.diags.push(
                Diagnostic::warn(
                    codes::DUPLICATE_ID,
                    format!("token {token} listed more than once, ignoring"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token)),
            );
        }
        // A first-time stray token is skipped quietly.
    }
}
