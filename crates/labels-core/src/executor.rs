//! Applying a reconciliation to a destination.
//!
//! The executor never decides whether changes reach the remote; it hands every
//! change to an [`Applier`]. [`RemoteApplier`] issues the calls, [`DumpRecorder`]
//! drops them so only the [`ChangeSet`] is produced.

use crate::error::{Result, SyncError};
use crate::models::*;
use crate::reconcile;
use crate::traits::LabelRepository;

/// Strategy receiving each change the executor decides on
pub trait Applier {
    fn create(&mut self, name: &str, attrs: &LabelAttrs) -> Result<()>;

    fn update(&mut self, name: &str, attrs: &LabelAttrs) -> Result<()>;

    fn delete(&mut self, name: &str) -> Result<()>;
}

/// Applies changes to a remote repository
pub struct RemoteApplier<'a> {
    repo: &'a dyn LabelRepository,
}

impl<'a> RemoteApplier<'a> {
    pub fn new(repo: &'a dyn LabelRepository) -> Self {
        Self { repo }
    }
}

impl Applier for RemoteApplier<'_> {
    fn create(&mut self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        tracing::info!(repo = %self.repo.id(), "Creating {}", name);
        self.repo.create_label(name, attrs)
    }

    fn update(&mut self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        tracing::info!(repo = %self.repo.id(), "Updating {}", name);
        self.repo.update_label(name, attrs)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        tracing::info!(repo = %self.repo.id(), "Deleting {}", name);
        self.repo.delete_label(name)
    }
}

/// Applier for dump mode: nothing leaves the process
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpRecorder;

impl Applier for DumpRecorder {
    fn create(&mut self, _name: &str, _attrs: &LabelAttrs) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _name: &str, _attrs: &LabelAttrs) -> Result<()> {
        Ok(())
    }

    fn delete(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// One of the three reconciliation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncMode {
    CreateMissing,
    UpdateWrong,
    DeleteBad,
}

impl SyncMode {
    /// Steps selected by the create/remove/modify flags, in execution order.
    /// No flag at all selects every step (full copy).
    pub fn selection(create: bool, remove: bool, modify: bool) -> Vec<SyncMode> {
        if !create && !remove && !modify {
            return Self::full_copy().to_vec();
        }

        let mut modes = Vec::new();
        if create {
            modes.push(SyncMode::CreateMissing);
        }
        if modify {
            modes.push(SyncMode::UpdateWrong);
        }
        if remove {
            modes.push(SyncMode::DeleteBad);
        }
        modes
    }

    pub fn full_copy() -> [SyncMode; 3] {
        [
            SyncMode::CreateMissing,
            SyncMode::UpdateWrong,
            SyncMode::DeleteBad,
        ]
    }
}

/// Runs sync steps for one (source, destination) pair.
///
/// Every step reconciles against the destination as it was when the executor
/// was built; the destination is not re-fetched between steps. A failing
/// applier call stops the run and earlier calls are not rolled back.
pub struct SyncExecutor<'a, A: Applier> {
    source: &'a LabelCollection,
    destination: &'a LabelCollection,
    applier: A,
    changes: ChangeSet,
}

impl<'a, A: Applier> SyncExecutor<'a, A> {
    pub fn new(source: &'a LabelCollection, destination: &'a LabelCollection, applier: A) -> Self {
        Self {
            source,
            destination,
            applier,
            changes: ChangeSet::new(),
        }
    }

    /// Create labels the destination lacks
    pub fn create_missing(&mut self) -> Result<()> {
        let missing = reconcile::missing(self.source, self.destination);
        tracing::debug!(count = missing.len(), "missing labels");

        for (name, attrs) in &missing {
            self.applier.create(name, attrs)?;
            self.changes.record(ChangeAction::Create, name, attrs);
        }
        Ok(())
    }

    /// Rewrite color and description of labels that differ from the source
    pub fn update_wrong(&mut self) -> Result<()> {
        let wrong = reconcile::wrong(self.source, self.destination);
        tracing::debug!(count = wrong.len(), "wrong labels");

        for (name, attrs) in &wrong {
            self.existing(name)?;
            self.applier.update(name, attrs)?;
            self.changes.record(ChangeAction::Update, name, attrs);
        }
        Ok(())
    }

    /// Delete labels the source does not have
    pub fn delete_bad(&mut self) -> Result<()> {
        let bad = reconcile::bad(self.source, self.destination);
        tracing::debug!(count = bad.len(), "bad labels");

        for (name, attrs) in &bad {
            self.existing(name)?;
            self.applier.delete(name)?;
            self.changes.record(ChangeAction::Delete, name, attrs);
        }
        Ok(())
    }

    /// Create, then update, then delete
    pub fn full_copy(&mut self) -> Result<()> {
        self.run(&SyncMode::full_copy())
    }

    /// Run the given steps in create, update, delete order
    pub fn run(&mut self, modes: &[SyncMode]) -> Result<()> {
        let mut ordered = modes.to_vec();
        ordered.sort();
        ordered.dedup();

        for mode in ordered {
            match mode {
                SyncMode::CreateMissing => self.create_missing()?,
                SyncMode::UpdateWrong => self.update_wrong()?,
                SyncMode::DeleteBad => self.delete_bad()?,
            }
        }
        Ok(())
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }

    fn existing(&self, name: &str) -> Result<&LabelAttrs> {
        self.destination
            .get(name)
            .ok_or_else(|| SyncError::LabelNotFound(name.to_string()))
    }
}
