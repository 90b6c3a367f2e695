//! Subscriber installation for the `mgc` binary.
//!
//! Events go to stderr through a `tracing-tree` layer so nested calls and
//! scopes read as an indented tree. `RUST_LOG` sets the starting filter
//! (`warn` when unset); the REPL's `.trace` command swaps it for `trace`
//! and back through a reload handle.

use std::sync::OnceLock;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "warn";

static TRACING: OnceLock<Option<TraceControl>> = OnceLock::new();

/// Handle for switching the active filter after installation.
pub struct TraceControl {
    handle: reload::Handle<EnvFilter, Registry>,
    initial: String,
}

impl TraceControl {
    /// Switch between full `trace` output and the starting filter.
    pub fn set_verbose(&self, on: bool) {
        let filter = if on {
            EnvFilter::new("trace")
        } else {
            EnvFilter::new(&self.initial)
        };
        if let Err(err) = self.handle.reload(filter) {
            eprintln!("warning: cannot change trace filter: {err}");
        }
    }
}

/// Install the global subscriber once.
///
/// Returns `None` when another subscriber was already installed (as in tests
/// that set their own), in which case `.trace` has no effect on filtering.
pub fn init_tracing() -> Option<&'static TraceControl> {
    TRACING.get_or_init(install).as_ref()
}

fn install() -> Option<TraceControl> {
    let initial = std::env::var("RUST_LOG")
        .ok()
        .filter(|directive| EnvFilter::try_new(directive).is_ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    let (filter, handle) = reload::Layer::new(EnvFilter::new(&initial));
    let tree = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_targets(true)
        .with_indent_lines(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .try_init()
        .ok()?;

    Some(TraceControl { handle, initial })
}
