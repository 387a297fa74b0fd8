//! Update Engine: sequential application of update files.
//!
//! Each update buffer is a small cell whose `DSID` carries the update number
//! (`UPDN`) and whose records carry an instruction (`RUIN`): insert, delete
//! or modify. Updates apply strictly in ascending order starting at the base
//! cell's update number plus one.
//!
//! Sequencing problems follow the recovery mode:
//!
//! | Problem | Permissive | Strict |
//! |---|---|---|
//! | gap (`.001` then `.003`) | `UPDATE_GAP`, file skipped | [`ChartError::UpdateSequence`] |
//! | stale or repeated number | `UPDATE_STALE`, file skipped | [`ChartError::UpdateSequence`] |
//! | other cell | `UPDATE_CELL_MISMATCH`, file skipped | [`ChartError::UpdateSequence`] |
//! | record version mismatch | `VERSION_MISMATCH`, record rejected | [`ChartError::UpdateSequence`] |
//!
//! A skipped gap leaves the expected number unchanged, so a later buffer with
//! the right number still applies.

use crate::cell::{Cell, RecordStore};
use crate::error::{ChartError, Result};
use crate::record::{DatasetIdentification, FeatureRecord, RecordInstruction, SpatialRecord, UpdateControl};
use crate::recovery::RecoveryMode;
use crate::warning::{Severity, Warning, WarningCode, WarningCollector};

/// Lifecycle of an [`UpdateEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Accepting update buffers
    Applying,
    /// Every provided buffer was consumed
    FullyApplied,
    /// A strict-mode sequencing failure stopped the sequence
    Aborted,
}

/// What happened to one update buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update with this number was applied
    Applied(u32),
    /// The buffer was skipped for the given reason
    Skipped(WarningCode),
}

/// Applies update files to a [`RecordStore`] in place.
#[derive(Debug)]
pub struct UpdateEngine<'s> {
    store: &'s mut RecordStore,
    cell_name: String,
    last_applied: u32,
    applied: Vec<u32>,
    last_identification: Option<DatasetIdentification>,
    state: UpdateState,
}

impl<'s> UpdateEngine<'s> {
    /// Create an engine for a base cell whose own update number is `base_update`.
    pub fn new(store: &'s mut RecordStore, cell_name: impl Into<String>, base_update: u32) -> Self {
        UpdateEngine {
            store,
            cell_name: cell_name.into(),
            last_applied: base_update,
            applied: Vec::new(),
            last_identification: None,
            state: UpdateState::Applying,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> UpdateState {
        self.state
    }

    /// Number of the last applied update (the base number if none applied).
    #[must_use]
    pub fn last_applied(&self) -> u32 {
        self.last_applied
    }

    /// Numbers of the updates applied so far.
    #[must_use]
    pub fn applied(&self) -> &[u32] {
        &self.applied
    }

    /// Identification of the last applied update.
    #[must_use]
    pub fn last_identification(&self) -> Option<&DatasetIdentification> {
        self.last_identification.as_ref()
    }

    /// Decode and apply one update buffer.
    ///
    /// # Errors
    ///
    /// Returns the decode errors of [`Cell::decode`], and
    /// [`ChartError::UpdateSequence`] for a sequencing problem in strict mode.
    pub fn apply(&mut self, bytes: &[u8], warnings: &mut WarningCollector) -> Result<UpdateOutcome> {
        match Cell::decode(bytes, warnings) {
            Ok(cell) => self.apply_cell(cell, warnings),
            Err(e) => {
                self.state = UpdateState::Aborted;
                Err(e)
            },
        }
    }

    /// Apply one decoded update cell.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UpdateSequence`] for a sequencing problem in strict mode.
    pub fn apply_cell(&mut self, cell: Cell, warnings: &mut WarningCollector) -> Result<UpdateOutcome> {
        if self.state != UpdateState::Applying {
            return Err(ChartError::UpdateSequence(format!(
                "update engine is {:?} and accepts no more updates",
                self.state
            )));
        }

        let name = cell.identification.cell_name().to_string();
        if name != self.cell_name {
            let message = format!("update for cell {name} cannot apply to cell {}", self.cell_name);
            self.sequencing(warnings, WarningCode::UpdateCellMismatch, Severity::Error, None, message)?;
            return Ok(UpdateOutcome::Skipped(WarningCode::UpdateCellMismatch));
        }

        let Some(number) = cell.identification.update_number() else {
            let message = format!(
                "update {:?} of {name} has no numeric update number, applied update is {}",
                cell.identification.update, self.last_applied
            );
            self.sequencing(warnings, WarningCode::UpdateGap, Severity::Error, None, message)?;
            return Ok(UpdateOutcome::Skipped(WarningCode::UpdateGap));
        };
        // At u32::MAX nothing can follow, so every update is stale.
        if number <= self.last_applied {
            let message = format!("update {number} of {name} is not newer than applied update {}", self.last_applied);
            self.sequencing(warnings, WarningCode::UpdateStale, Severity::Warning, None, message)?;
            return Ok(UpdateOutcome::Skipped(WarningCode::UpdateStale));
        }
        if Some(number) != self.last_applied.checked_add(1) {
            let message = format!(
                "update {number} of {name} skips over updates after applied update {}",
                self.last_applied
            );
            self.sequencing(warnings, WarningCode::UpdateGap, Severity::Error, None, message)?;
            return Ok(UpdateOutcome::Skipped(WarningCode::UpdateGap));
        }

        let (spatials, features) = (cell.spatials.len(), cell.features.len());
        for spatial in cell.spatials {
            self.apply_spatial(spatial, warnings)?;
        }
        for feature in cell.features {
            self.apply_feature(feature, warnings)?;
        }

        tracing::debug!(cell = %name, update = number, spatials, features, "applied update");
        self.last_applied = number;
        self.applied.push(number);
        self.last_identification = Some(cell.identification);
        Ok(UpdateOutcome::Applied(number))
    }

    /// Mark the sequence as complete.
    pub fn finish(&mut self) -> UpdateState {
        if self.state == UpdateState::Applying {
            self.state = UpdateState::FullyApplied;
        }
        self.state
    }

    fn sequencing(
        &mut self,
        warnings: &mut WarningCollector,
        code: WarningCode,
        severity: Severity,
        record_id: Option<u32>,
        message: String,
    ) -> Result<()> {
        if warnings.mode() == RecoveryMode::Strict {
            self.state = UpdateState::Aborted;
            return Err(ChartError::UpdateSequence(format!("{code}: {message}")));
        }
        let warning = Warning::new(severity, code, message);
        warnings.record(match record_id {
            Some(id) => warning.for_record(id),
            None => warning,
        })
    }

    fn apply_feature(&mut self, update: FeatureRecord, warnings: &mut WarningCollector) -> Result<()> {
        let rcid = update.rcid;
        match update.ruin {
            RecordInstruction::Insert => {
                if self.store.features.contains_key(&rcid) {
                    return warnings.push_for(
                        rcid,
                        Severity::Warning,
                        WarningCode::DuplicateRecord,
                        format!("update inserts feature {rcid}, which already exists"),
                    );
                }
                self.store.features.insert(
                    rcid,
                    FeatureRecord {
                        spatial_control: None,
                        related_control: None,
                        ..update
                    },
                );
            },
            RecordInstruction::Delete => {
                let Some(current_rver) = self.store.features.get(&rcid).map(|f| f.rver) else {
                    return missing(warnings, rcid, format!("feature {rcid}"));
                };
                if !self.version_follows(warnings, rcid, current_rver, update.rver)? {
                    return Ok(());
                }
                self.store.features.shift_remove(&rcid);
            },
            RecordInstruction::Modify => {
                let Some(current_rver) = self.store.features.get(&rcid).map(|f| f.rver) else {
                    return missing(warnings, rcid, format!("feature {rcid}"));
                };
                if !self.version_follows(warnings, rcid, current_rver, update.rver)? {
                    return Ok(());
                }
                let Some(current) = self.store.features.get_mut(&rcid) else {
                    return Ok(());
                };
                current.rver = update.rver;
                merge_attributes(&mut current.attributes, &update.attributes);
                merge_attributes(&mut current.national_attributes, &update.national_attributes);
                if update.object_id.is_some() {
                    current.object_id = update.object_id;
                }
                let mut edits_ok = true;
                if let Some(control) = update.spatial_control {
                    edits_ok &= edit_list(&mut current.spatial, control, &update.spatial);
                }
                if let Some(control) = update.related_control {
                    edits_ok &= edit_list(&mut current.related, control, &update.related);
                }
                if !edits_ok {
                    warnings.push_for(
                        rcid,
                        Severity::Warning,
                        WarningCode::UpdateTargetMissing,
                        format!("pointer edit of feature {rcid} is out of range and was ignored"),
                    )?;
                }
            },
        }
        Ok(())
    }

    fn apply_spatial(&mut self, update: SpatialRecord, warnings: &mut WarningCollector) -> Result<()> {
        let id = update.id;
        match update.ruin {
            RecordInstruction::Insert => {
                if self.store.spatials.contains_key(&id) {
                    return warnings.push(
                        Severity::Warning,
                        WarningCode::DuplicateRecord,
                        format!("update inserts {id}, which already exists"),
                    );
                }
                self.store.spatials.insert(
                    id,
                    SpatialRecord {
                        pointer_control: None,
                        coord_control: None,
                        ..update
                    },
                );
            },
            RecordInstruction::Delete => {
                let Some(current_rver) = self.store.spatials.get(&id).map(|s| s.rver) else {
                    return missing(warnings, id.rcid, id.to_string());
                };
                if !self.version_follows(warnings, id.rcid, current_rver, update.rver)? {
                    return Ok(());
                }
                self.store.spatials.shift_remove(&id);
            },
            RecordInstruction::Modify => {
                let Some(current_rver) = self.store.spatials.get(&id).map(|s| s.rver) else {
                    return missing(warnings, id.rcid, id.to_string());
                };
                if !self.version_follows(warnings, id.rcid, current_rver, update.rver)? {
                    return Ok(());
                }
                let Some(current) = self.store.spatials.get_mut(&id) else {
                    return Ok(());
                };
                current.rver = update.rver;
                merge_attributes(&mut current.attributes, &update.attributes);
                let mut edits_ok = true;
                if let Some(control) = update.pointer_control {
                    edits_ok &= edit_list(&mut current.pointers, control, &update.pointers);
                }
                if let Some(control) = update.coord_control {
                    if update.soundings.is_empty() {
                        edits_ok &= edit_list(&mut current.coords, control, &update.coords);
                    } else {
                        edits_ok &= edit_list(&mut current.soundings, control, &update.soundings);
                    }
                }
                if !edits_ok {
                    warnings.push(
                        Severity::Warning,
                        WarningCode::UpdateTargetMissing,
                        format!("list edit of {id} is out of range and was ignored"),
                    )?;
                }
            },
        }
        Ok(())
    }

    /// Whether `update` is exactly one version past `current`; reports it when not.
    fn version_follows(
        &mut self,
        warnings: &mut WarningCollector,
        rcid: u32,
        current: u16,
        update: u16,
    ) -> Result<bool> {
        if Some(update) == current.checked_add(1) {
            return Ok(true);
        }
        let message = format!("record {rcid} is at version {current}, update carries version {update}");
        self.sequencing(warnings, WarningCode::VersionMismatch, Severity::Error, Some(rcid), message)?;
        Ok(false)
    }
}

fn missing(warnings: &mut WarningCollector, rcid: u32, what: String) -> Result<()> {
    warnings.push_for(
        rcid,
        Severity::Warning,
        WarningCode::UpdateTargetMissing,
        format!("update targets {what}, which does not exist"),
    )
}

/// Replace listed attributes; an empty value removes the attribute.
fn merge_attributes(current: &mut Vec<(u16, String)>, update: &[(u16, String)]) {
    for (code, value) in update {
        let position = current.iter().position(|(c, _)| c == code);
        match (position, value.trim().is_empty()) {
            (Some(i), true) => {
                current.remove(i);
            },
            (Some(i), false) => current[i].1.clone_from(value),
            (None, false) => current.push((*code, value.clone())),
            (None, true) => {},
        }
    }
}

/// Apply a 1-based list edit. Returns `false`, leaving the list untouched,
/// when the edit does not fit the list.
fn edit_list<T: Clone>(list: &mut Vec<T>, control: UpdateControl, items: &[T]) -> bool {
    let Some(start) = control.index.checked_sub(1) else {
        return false;
    };
    match control.instruction {
        RecordInstruction::Insert => {
            if start > list.len() {
                return false;
            }
            list.splice(start..start, items.iter().cloned());
        },
        RecordInstruction::Delete => {
            let end = start + control.count;
            if end > list.len() {
                return false;
            }
            list.drain(start..end);
        },
        RecordInstruction::Modify => {
            let end = start + control.count;
            if end > list.len() || items.len() != control.count {
                return false;
            }
            list.splice(start..end, items.iter().cloned());
        },
    }
    true
}
