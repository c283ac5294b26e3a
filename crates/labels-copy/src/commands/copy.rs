use crate::cli::{Destination, Source};
use crate::output::RunReport;
use anyhow::{anyhow, Context, Result};
use labels_core::{
    snapshot, DumpRecorder, LabelCollection, LabelHost, RemoteApplier, SyncExecutor, SyncMode,
};
use std::path::PathBuf;

/// Everything one invocation does
#[derive(Debug, Clone)]
pub struct CopyPlan {
    pub source: Source,
    pub destination: Destination,
    pub modes: Vec<SyncMode>,
    pub dump_file: PathBuf,
}

impl CopyPlan {
    /// Whether any side of the run is a remote repository
    pub fn needs_remote(&self) -> bool {
        matches!(self.source, Source::Repo(_)) || matches!(self.destination, Destination::Repo(_))
    }

    fn source_name(&self) -> String {
        match &self.source {
            Source::Repo(id) => id.to_string(),
            Source::Snapshot(path) => path.display().to_string(),
        }
    }

    fn destination_name(&self) -> String {
        match &self.destination {
            Destination::Repo(id) => id.to_string(),
            Destination::Dump => "dump".to_string(),
        }
    }
}

pub fn handle_copy(host: Option<&dyn LabelHost>, plan: &CopyPlan) -> Result<RunReport> {
    let source = load_source(host, &plan.source)?;

    let (changes, dump_file) = match &plan.destination {
        Destination::Repo(id) => {
            let host = require_host(host)?;
            let repo = host
                .open_repo(id)
                .with_context(|| format!("Failed to open destination repository {}", id))?;
            let current = LabelCollection::from_remote(repo.as_ref())
                .with_context(|| format!("Failed to list labels of {}", id))?;

            let mut executor =
                SyncExecutor::new(&source, &current, RemoteApplier::new(repo.as_ref()));
            executor
                .run(&plan.modes)
                .with_context(|| format!("Failed to copy labels to {}", id))?;
            (executor.into_changes(), None)
        }
        Destination::Dump => {
            let empty = LabelCollection::new();
            let mut executor = SyncExecutor::new(&source, &empty, DumpRecorder);
            executor.run(&plan.modes)?;
            let changes = executor.into_changes();

            eprintln!("Dumping labels into {}", plan.dump_file.display());
            snapshot::write_file(&plan.dump_file, &changes.to_collection())
                .context("Failed to write snapshot")?;
            (changes, Some(plan.dump_file.clone()))
        }
    };

    Ok(RunReport {
        source: plan.source_name(),
        destination: plan.destination_name(),
        dump_file,
        changes,
    })
}

fn load_source(host: Option<&dyn LabelHost>, source: &Source) -> Result<LabelCollection> {
    match source {
        Source::Repo(id) => {
            let host = require_host(host)?;
            let repo = host
                .open_repo(id)
                .with_context(|| format!("Failed to open source repository {}", id))?;
            LabelCollection::from_remote(repo.as_ref())
                .with_context(|| format!("Failed to list labels of {}", id))
        }
        Source::Snapshot(path) => LabelCollection::from_snapshot(path)
            .with_context(|| format!("Failed to load snapshot {}", path.display())),
    }
}

fn require_host(host: Option<&dyn LabelHost>) -> Result<&dyn LabelHost> {
    host.ok_or_else(|| anyhow!("No connection to the remote host"))
}
