//! STATIONS section: `STATIONS ( StationID Capacity MultiFlag FifoFlag
//! ( TaskTypeID Time [Tolerance] )* )*`.
//!
//! The three attributes after the station identifier are positional and
//! captured verbatim; their content is not validated here. The dynamic part
//! lists the task types the station executes with their service times.

use jobflow_diagnostics::{Diagnostic, LineRange, codes};

use super::{Parser, StationPos, ctx};
use crate::model::{Service, StationId, TaskTypeId};

impl Parser {
    pub(crate) fn station_token(&mut self, token: &str, line: u32) {
        // A station identifier starts a new station block wherever it
        // appears, even in the middle of another block.
        if StationId::mentions_letter(token) {
            self.open_station(token, line);
            return;
        }

        match std::mem::take(&mut self.station_pos) {
            StationPos::ExpectId => {}
            StationPos::ExpectCapacity => {
                self.set_attr(|cfg, v| cfg.max_capacity = v, token);
                self.station_pos = StationPos::ExpectMultiFlag;
            }
            StationPos::ExpectMultiFlag => {
                self.set_attr(|cfg, v| cfg.multi_flag = v, token);
                self.station_pos = StationPos::ExpectFifoFlag;
            }
            StationPos::ExpectFifoFlag => {
                self.set_attr(|cfg, v| cfg.fifo_flag = v, token);
                self.station_pos = StationPos::ExpectTask;
            }
            StationPos::ExpectTask => {
                self.station_pos = StationPos::ExpectTask;
                if TaskTypeId::mentions_letter(token) {
                    self.open_service(token, line);
                }
            }
            StationPos::ExpectTime(task) => {
                if TaskTypeId::mentions_letter(token) {
                    // The previous task never got a time; move on.
                    self.open_service(token, line);
                    return;
                }
                self.station_pos = StationPos::ExpectTask;
                let owner = format!("task type {task}");
                let Some(time) = self.unsigned_token(token, &owner, line) else {
                    self.station_pos = StationPos::ExpectTime(task);
                    return;
                };
                if let Some(cfg) = self
                    .current_station
                    .as_ref()
                    .and_then(|s| self.workflow.stations.get_mut(s))
                {
                    cfg.services.insert(
                        task.clone(),
                        Service {
                            time,
                            tolerance: None,
                        },
                    );
                    self.station_pos = StationPos::ExpectTolerance(task);
                }
            }
            StationPos::ExpectTolerance(task) => {
                if TaskTypeId::mentions_letter(token) {
                    self.open_service(token, line);
                    return;
                }
                self.station_pos = StationPos::ExpectTask;
                let owner = format!("task type {task}");
                let Some(tolerance) = self.unsigned_token(token, &owner, line) else {
                    return;
                };
                if let Some(service) = self
                    .current_station
                    .as_ref()
                    .and_then(|s| self.workflow.stations.get_mut(s))
                    .and_then(|cfg| cfg.services.get_mut(&task))
                    && service.tolerance.is_none()
                {
                    service.tolerance = Some(tolerance);
                }
            }
        }
    }

    /// Begin a new station block for a (possibly corrected) identifier.
    fn open_station(&mut self, token: &str, line: u32) {
        let id = if StationId::is_well_formed(token) {
            StationId::new(token)
        } else {
            let id = StationId::corrected(token);
            self.diags.push(
                Diagnostic::warn(
                    codes::INVALID_STATION_ID,
                    format!("invalid station identifier {token}, corrected to {id}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "corrected" => id.as_str())),
            );
            id
        };
        self.workflow.stations.entry(id.clone()).or_default();
        self.current_station = Some(id);
        self.station_pos = StationPos::ExpectCapacity;
    }

    /// Record a (possibly corrected) task type the current station executes.
    fn open_service(&mut self, token: &str, line: u32) {
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
        self.claim_task(&task);
        self.station_pos = StationPos::ExpectTime(task);
    }

    /// Set one positional attribute of the current station.
    fn set_attr(&mut self, set: impl FnOnce(&mut crate::model::StationConfig, String), token: &str) {
        if let Some(cfg) = self
            .current_station
            .as_ref()
            .and_then(|s| self.workflow.stations.get_mut(s))
        {
            set(cfg, token.to_string());
        }
    }

    /// Validate a time/tolerance token: strip a leading `-` with a warning
    /// and reject anything that is not a decimal number, keeping the source
    /// spelling otherwise.
    fn unsigned_token(&mut self, token: &str, owner: &str, line: u32) -> Option<String> {
        let unsigned = if let Some(rest) = token.strip_prefix('-') {
            self.diags.push(
                Diagnostic::warn(
                    codes::NEGATIVE_VALUE,
                    format!("invalid negative value {token} for {owner}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "owner" => owner)),
            );
            rest
        } else {
            token
        };

        if unsigned.parse::<f64>().is_ok() {
            Some(unsigned.to_string())
        } else {
            self.diags.push(
                Diagnostic::warn(
                    codes::UNPARSEABLE_NUMBER,
                    format!("cannot read {token} as a number for {owner}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "owner" => owner)),
            );
            None
        }
    }
}
