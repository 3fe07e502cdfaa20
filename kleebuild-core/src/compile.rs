//! Invocation of the external font compiler.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Narrow seam over the toolchain that turns a design source into
/// compiled OTF masters.
///
/// The pipeline only ever asks for one thing: compile this source, tell
/// me whether it worked. Everything else (where output lands, what the
/// compiler prints) is the implementation's business.
pub trait SourceCompiler {
    fn compile(&self, source: &Path) -> Result<()>;
}

/// Runs `fontmake` to compile one Glyphs source into `master_otf/`.
#[derive(Debug, Clone)]
pub struct Fontmake {
    program: PathBuf,
    root: PathBuf,
}

impl Fontmake {
    /// A compiler that runs whatever `fontmake` resolves to on PATH,
    /// with `root` as its working directory so intermediates land in
    /// the build tree.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            program: PathBuf::from("fontmake"),
            root: root.into(),
        }
    }

    /// Use a specific executable instead of `fontmake` from PATH.
    pub fn with_program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Argument vector handed to the compiler.
    ///
    /// `--keep-overlaps` matches the TTF build; removing overlaps while
    /// converting to cubic outlines introduces curve artifacts.
    fn args(&self, source: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-g"),
            source.as_os_str().to_os_string(),
            OsString::from("--keep-overlaps"),
            OsString::from("-o"),
            OsString::from("otf"),
        ]
    }
}

impl SourceCompiler for Fontmake {
    fn compile(&self, source: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(self.args(source))
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .status()
            .with_context(|| {
                format!(
                    "running {} on {}",
                    self.program.display(),
                    source.display()
                )
            })?;

        if !status.success() {
            bail!("fontmake failed on {} ({status})", source.display());
        }

        Ok(())
    }
}
