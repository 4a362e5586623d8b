//! Toolchain invocation and dynamic loading.
//!
//! `compile` writes the emitted source into the system temp directory,
//! shells out to the C compiler (`cc`, or `$REMEX_CC`), and loads the
//! produced shared module. Artifact paths are unique per process
//! and per compiled instance, so concurrent compiles of distinct automata
//! never collide. Both files are removed when the matcher drops, and on
//! every error path out of `compile`.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};
use std::sync::atomic::{AtomicU64, Ordering};

use libloading::Library;
use log::{debug, warn};

use crate::automaton::Dfa;

use super::codegen::{emit_source, ENTRY_SYMBOL};
use super::JitError;

type RawMatchFn = unsafe extern "C" fn(*const u8, usize) -> std::os::raw::c_int;

/// Distinguishes artifact paths of matchers compiled within one process.
static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(0);

/// The generated files backing one compiled matcher.
///
/// Dropping removes them. Removal is best-effort: a failure is logged and
/// never masks whatever teardown is in progress.
#[derive(Debug)]
struct Artifacts {
    source: PathBuf,
    module: PathBuf,
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        for path in [&self.source, &self.module] {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to remove {}: {}", path.display(), err);
                }
            }
        }
    }
}

/// A loaded native matcher for one deterministic automaton.
///
/// Owns the generated source, the shared module, and the loaded library;
/// dropping the matcher unloads the module and deletes both files. Because
/// the matcher is an owned value, it cannot be released twice.
pub struct CompiledMatcher {
    entry: RawMatchFn,
    // Field order is drop order: unload the library before deleting the
    // files underneath it.
    _library: Library,
    artifacts: Artifacts,
}

impl CompiledMatcher {
    /// Invoke the native entry point.
    ///
    /// Observably identical to `Dfa::test_match` on the automaton this
    /// matcher was compiled from.
    pub fn test_match(&self, input: &[u8]) -> bool {
        // The generated routine reads exactly `len` bytes from `input`.
        unsafe { (self.entry)(input.as_ptr(), input.len()) != 0 }
    }

    /// Path of the generated C source (diagnostics).
    pub fn source_path(&self) -> &Path {
        &self.artifacts.source
    }

    /// Path of the produced shared module (diagnostics).
    pub fn module_path(&self) -> &Path {
        &self.artifacts.module
    }
}

impl fmt::Debug for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMatcher")
            .field("source", &self.artifacts.source)
            .field("module", &self.artifacts.module)
            .finish()
    }
}

/// Compile `dfa` to native code and load it.
///
/// Fails with [`JitError::CompileFailure`] when the toolchain cannot be run
/// or produces no module, [`JitError::LoadFailure`] when the module cannot
/// be loaded, and [`JitError::SymbolResolution`] when the entry point is
/// missing. All are environment failures, not automaton bugs; generated
/// files are cleaned up before returning an error.
///
/// Panics if the automaton is unusable.
pub fn compile(dfa: &Dfa) -> Result<CompiledMatcher, JitError> {
    let compiler = env::var("REMEX_CC").unwrap_or_else(|_| "cc".to_string());
    compile_with(dfa, &compiler)
}

fn compile_with(dfa: &Dfa, compiler: &str) -> Result<CompiledMatcher, JitError> {
    assert!(dfa.is_usable(), "compile on unusable automaton");

    let stem = format!(
        "remex-{}-{}",
        process::id(),
        NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed)
    );
    let dir = env::temp_dir();
    let artifacts = Artifacts {
        source: dir.join(format!("{}.c", stem)),
        module: dir.join(format!("{}.{}", stem, env::consts::DLL_EXTENSION)),
    };

    fs::write(&artifacts.source, emit_source(dfa)).map_err(|err| {
        JitError::CompileFailure(format!("writing {}: {}", artifacts.source.display(), err))
    })?;

    debug!(
        "compiling {} -> {} with {}",
        artifacts.source.display(),
        artifacts.module.display(),
        compiler
    );

    let output = Command::new(compiler)
        .arg("-O2")
        .arg("-shared")
        .arg("-fPIC")
        .arg("-o")
        .arg(&artifacts.module)
        .arg(&artifacts.source)
        .output()
        .map_err(|err| JitError::CompileFailure(format!("spawning {}: {}", compiler, err)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JitError::CompileFailure(format!(
            "{} exited with {}: {}",
            compiler,
            output.status,
            stderr.trim()
        )));
    }
    if !artifacts.module.exists() {
        return Err(JitError::CompileFailure(format!(
            "{} produced no module at {}",
            compiler,
            artifacts.module.display()
        )));
    }

    let library = unsafe { Library::new(&artifacts.module) }
        .map_err(|err| JitError::LoadFailure(err.to_string()))?;

    let entry = unsafe {
        library
            .get::<RawMatchFn>(ENTRY_SYMBOL.as_bytes())
            .map(|symbol| *symbol)
            .map_err(|err| JitError::SymbolResolution(err.to_string()))?
    };

    Ok(CompiledMatcher {
        entry,
        _library: library,
        artifacts,
    })
}
