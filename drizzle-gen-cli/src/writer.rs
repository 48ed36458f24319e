//! Writing generated modules to disk

use std::path::{Path, PathBuf};

use prisma_gen_drizzle::{Module, OutputMode};

use crate::error::{CliError, CliResult};

/// Target path of every module
///
/// Directory mode writes `<output>/<module>.ts`; single-file mode writes the
/// one module to `output` itself.
pub fn plan(output: &Path, mode: &OutputMode, modules: &[Module]) -> Vec<PathBuf> {
    modules
        .iter()
        .map(|module| match mode {
            OutputMode::Directory => output.join(format!("{}.ts", module.name)),
            OutputMode::SingleFile(_) => output.to_path_buf(),
        })
        .collect()
}

/// Write `content` to `path`, creating parent directories
pub fn write(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
