//! JOBTYPES section: `JOBTYPES ( JobTypeID ( TaskTypeID [Size] )* )*`.
//!
//! A job type identifier may recur; each occurrence opens a fresh alternative
//! route for that job. Task type tokens extend the most recently opened route.

use jobflow_diagnostics::{Diagnostic, LineRange, codes};

use super::{JobPos, Parser, ctx, parse_unsigned};
use crate::model::{JobTypeId, RouteStep, TaskTypeId, UNSIZED};

impl Parser {
    pub(crate) fn job_type_token(&mut self, token: &str, line: u32) {
        if JobTypeId::mentions_letter(token) {
            self.open_route(token, line);
        } else if TaskTypeId::mentions_letter(token) {
            self.append_step(token, line);
        } else if self.job_pos == JobPos::ExpectSizeOverride {
            self.job_pos = JobPos::ExpectId;
            self.override_step_size(token, line);
        }
        // Anything else is noise between declarations and is skipped.
    }

    /// Start a new alternative route for a (possibly corrected) job type.
    fn open_route(&mut self, token: &str, line: u32) {
        let id = if JobTypeId::is_well_formed(token) {
            JobTypeId::new(token)
        } else {
            let id = JobTypeId::corrected(token);
            self.diags.push(
                Diagnostic::warn(
                    codes::INVALID_JOB_TYPE_ID,
                    format!("invalid job type identifier {token}, corrected to {id}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "corrected" => id.as_str())),
            );
            id
        };

        let routes = self.workflow.job_types.entry(id.clone()).or_default();
        if !routes.is_empty() {
            self.diags.push(
                Diagnostic::warn(
                    codes::JOB_TYPE_REDECLARED,
                    format!(
                        "job type {id} declared again, adding alternative route {}",
                        routes.len() + 1
                    ),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("id" => id.as_str())),
            );
        }
        routes.push(Vec::new());
        self.current_job = Some(id);
        self.job_pos = JobPos::ExpectId;
    }

    /// Append a task type to the current route, auto-declaring it if needed.
    fn append_step(&mut self, token: &str, line: u32) {
        // A task type before any job identifier has no route to land in.
        let Some(job) = self.current_job.clone() else {
            return;
        };

        let task = if TaskTypeId::is_well_formed(token) {
            TaskTypeId::new(token)
        } else {
            let task = TaskTypeId::corrected(token);
            self.diags.push(
                Diagnostic::warn(
                    codes::INVALID_TASK_TYPE_ID,
                    format!("invalid task type identifier {token}, corrected to {task}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "corrected" => task.as_str())),
            );
            task
        };

        if !self.workflow.task_types.contains_key(&task) {
            self.diags.push(
                Diagnostic::warn(
                    codes::UNDECLARED_TASK_TYPE,
                    format!("task type {task} referenced by job type {job} but never declared"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("task" => task.as_str(), "job" => job.as_str())),
            );
            self.workflow.task_types.insert(task.clone(), UNSIZED);
        }

        let size = self.workflow.task_types[&task];
        if let Some(route) = self
            .workflow
            .job_types
            .get_mut(&job)
            .and_then(|routes| routes.last_mut())
        {
            route.push(RouteStep { task, size });
            self.job_pos = JobPos::ExpectSizeOverride;
        }
    }

    /// Override the size of the step that was just appended.
    fn override_step_size(&mut self, token: &str, line: u32) {
        let Some(job) = self.current_job.clone() else {
            return;
        };
        let owner = format!("job type {job}");
        let Some(size) = parse_unsigned(&mut self.diags, token, &owner, line) else {
            return;
        };
        if let Some(step) = self
            .workflow
            .job_types
            .get_mut(&job)
            .and_then(|routes| routes.last_mut())
            .and_then(|route| route.last_mut())
        {
            step.size = size;
        }
    }
}
