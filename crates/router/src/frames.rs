//! Caller frame unwinding
//!
//! Records arrive attributed to the host framework's own wrapper module,
//! not the code that issued the log call. The unwinder walks the captured
//! call chain outward until it leaves the wrapper file, counting how many
//! hops it took so the host can be told which ancestor to report.

use std::path::{Path, PathBuf};

/// One captured stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Source file the frame executes in
    pub source_file: PathBuf,
    /// Line number at the call site
    pub line: u32,
    parent: Option<Box<CallFrame>>,
}

impl CallFrame {
    /// Leaf frame with no recorded caller
    pub fn new(source_file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            source_file: source_file.into(),
            line,
            parent: None,
        }
    }

    /// Attach the calling frame
    #[must_use]
    pub fn with_parent(mut self, parent: CallFrame) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// The calling frame, if recorded
    pub fn parent(&self) -> Option<&CallFrame> {
        self.parent.as_deref()
    }
}

/// Resolved caller attribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// First source file outside the wrapper
    pub file: PathBuf,
    /// Line number in that file
    pub line: u32,
    /// Unwind depth for the host to skip; starts at 2 for the wrapper's
    /// own emit hop
    pub depth: u32,
}

/// Walk outward from `initial` until the frame's file is no longer
/// `framework_file`.
///
/// The depth starts at 2 and increases by one per wrapper frame stepped
/// over. If the chain ends while still inside the wrapper, attribution
/// stays on the last frame seen and a warning is logged.
pub fn resolve(initial: &CallFrame, framework_file: &Path) -> Attribution {
    let mut current = initial;
    let mut depth: u32 = 2;

    while current.source_file == framework_file {
        depth += 1;
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                tracing::warn!(
                    file = %current.source_file.display(),
                    "caller attribution ran out of frames inside the logging wrapper"
                );
                break;
            }
        }
    }

    Attribution {
        file: current.source_file.clone(),
        line: current.line,
        depth,
    }
}
