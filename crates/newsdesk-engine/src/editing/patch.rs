use crate::models::BlockId;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// False when the command addressed something that does not exist
    pub changed: bool,
    /// Block created or modified by the command
    pub block: Option<BlockId>,
    pub version: u64,
}
