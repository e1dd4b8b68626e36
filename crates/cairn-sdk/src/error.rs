use std::path::PathBuf;

use cairn_types::{ObjectId, ObjectKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a cairn repository (or any parent up to /): {0}")]
    NotARepository(PathBuf),

    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(u32),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0} is not a directory")]
    DestinationNotDirectory(PathBuf),

    #[error("{0} is not empty")]
    DestinationNotEmpty(PathBuf),

    #[error("refusing to write outside the checkout: {0:?}")]
    UnsafePath(String),

    #[error("unknown revision: {0:?}")]
    UnknownRevision(String),

    #[error("ambiguous revision {name:?}: candidates are {}", format_candidates(.candidates))]
    AmbiguousRevision {
        name: String,
        candidates: Vec<ObjectId>,
    },

    #[error("no {kind} reachable from {name:?}")]
    NoObjectOfKind { name: String, kind: ObjectKind },

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] cairn_refs::RefError),

    #[error("history error: {0}")]
    Dag(#[from] cairn_dag::DagError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(|id| id.to_hex())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type SdkResult<T> = Result<T, SdkError>;
