//! The build pipeline: discover, compile, post-process, clean up.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::compile::SourceCompiler;
use crate::config;
use crate::discovery::SourceDiscovery;
use crate::postprocess::{process_font, weight_class};
use crate::report::{BuildReport, BuiltFont};

/// Directory contract of a Klee One checkout.
///
/// All paths are fixed names under one build root; the layout is the
/// interface between this tool, fontmake, and the release process, so
/// none of them are configurable.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    root: PathBuf,
}

impl BuildLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the Glyphs design sources live.
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(config::SOURCES_DIR)
    }

    /// Where fontmake drops compiled OTF masters.
    pub fn master_otf_dir(&self) -> PathBuf {
        self.root.join(config::MASTER_OTF_DIR)
    }

    /// Final release directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(config::OUTPUT_DIR)
    }

    /// Scratch directories removed once the build is done.
    pub fn scratch_dirs(&self) -> Vec<PathBuf> {
        config::SCRATCH_DIRS
            .iter()
            .map(|dir| self.root.join(dir))
            .collect()
    }
}

/// Run the whole pipeline: compile every source, post-process every
/// compiled OTF into the release directory, then sweep the scratch
/// directories.
///
/// Strictly sequential; the first failure aborts the run. Progress
/// lines go to `progress` as the build advances.
pub fn run<W: Write>(
    layout: &BuildLayout,
    compiler: &dyn SourceCompiler,
    mut progress: W,
) -> Result<BuildReport> {
    fs::create_dir_all(layout.output_dir())
        .with_context(|| format!("creating {}", layout.output_dir().display()))?;

    writeln!(progress, "[Klee One] Generating OTFs")?;

    let sources =
        SourceDiscovery::new(layout.sources_dir(), config::GLYPHS_EXTENSION).discover()?;
    for source in &sources {
        writeln!(progress, "[Klee One] Compiling {}", source.display())?;
        compiler.compile(source)?;
    }

    let mut fonts = Vec::new();
    let compiled =
        SourceDiscovery::new(layout.master_otf_dir(), config::OTF_EXTENSION).discover()?;
    for font_path in &compiled {
        fonts.push(postprocess_one(layout, font_path, &mut progress)?);
    }

    cleanup(layout)?;
    writeln!(progress, "[Klee One] Done (OTFs)")?;

    Ok(BuildReport { fonts })
}

fn postprocess_one<W: Write>(
    layout: &BuildLayout,
    font_path: &Path,
    progress: &mut W,
) -> Result<BuiltFont> {
    let font_name = font_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| font_path.display().to_string());

    writeln!(progress, "[{font_name}] Post-processing (OTF)")?;

    let data =
        fs::read(font_path).with_context(|| format!("reading {}", font_path.display()))?;
    let processed = process_font(&data, &font_name)
        .with_context(|| format!("post-processing {}", font_path.display()))?;

    let file_name = font_path
        .file_name()
        .with_context(|| format!("artifact without a file name: {}", font_path.display()))?;
    let out_path = layout.output_dir().join(file_name);
    fs::write(&out_path, &processed)
        .with_context(|| format!("writing {}", out_path.display()))?;

    writeln!(progress, "[{font_name}] Saved to {}", out_path.display())?;

    Ok(BuiltFont {
        name: font_name,
        path: out_path,
        weight_class: weight_class(&processed),
    })
}

/// Remove fontmake's scratch directories.
///
/// Absence is fine; anything else (permissions, busy mounts) is a real
/// failure and propagates.
pub fn cleanup(layout: &BuildLayout) -> Result<()> {
    for dir in layout.scratch_dirs() {
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("removing {}", dir.display()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{cleanup, run, BuildLayout};
    use crate::compile::SourceCompiler;
    use anyhow::{bail, Result};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    struct NoopCompiler;

    impl SourceCompiler for NoopCompiler {
        fn compile(&self, _source: &Path) -> Result<()> {
            Ok(())
        }
    }

    struct FailingCompiler;

    impl SourceCompiler for FailingCompiler {
        fn compile(&self, source: &Path) -> Result<()> {
            bail!("refusing to compile {}", source.display())
        }
    }

    #[test]
    fn layout_paths_hang_off_the_root() {
        let layout = BuildLayout::new("/build");

        assert_eq!(layout.sources_dir(), Path::new("/build/sources"));
        assert_eq!(layout.master_otf_dir(), Path::new("/build/master_otf"));
        assert_eq!(layout.output_dir(), Path::new("/build/fonts/otf"));
        assert_eq!(layout.scratch_dirs().len(), 3);
    }

    #[test]
    fn empty_root_is_an_empty_build() {
        let tmp = tempdir().expect("tempdir");
        let layout = BuildLayout::new(tmp.path());
        let mut progress = Vec::new();

        let report = run(&layout, &NoopCompiler, &mut progress).expect("run");

        assert!(report.fonts.is_empty());
        assert!(layout.output_dir().is_dir(), "output dir is created up front");

        let log = String::from_utf8(progress).expect("utf8");
        assert!(log.contains("[Klee One] Generating OTFs"));
        assert!(log.contains("[Klee One] Done (OTFs)"));
    }

    #[test]
    fn compiler_failure_aborts_the_run() {
        let tmp = tempdir().expect("tempdir");
        let layout = BuildLayout::new(tmp.path());
        fs::create_dir_all(layout.sources_dir()).expect("mkdir");
        fs::write(layout.sources_dir().join("KleeOne.glyphs"), b"").expect("touch");

        let result = run(&layout, &FailingCompiler, Vec::new());
        let message = format!("{:#}", result.expect_err("must abort"));
        assert!(message.contains("KleeOne.glyphs"), "got: {message}");
    }

    #[test]
    fn cleanup_removes_scratch_dirs_and_tolerates_missing_ones() {
        let tmp = tempdir().expect("tempdir");
        let layout = BuildLayout::new(tmp.path());

        fs::create_dir_all(tmp.path().join("master_ufo/sub")).expect("mkdir");
        fs::write(tmp.path().join("master_ufo/sub/file"), b"x").expect("touch");
        // instance_ufo and master_otf intentionally absent

        cleanup(&layout).expect("cleanup");

        assert!(!tmp.path().join("master_ufo").exists());
        for dir in layout.scratch_dirs() {
            assert!(!dir.exists());
        }
    }

    #[test]
    fn cleanup_runs_even_for_an_empty_build() {
        let tmp = tempdir().expect("tempdir");
        let layout = BuildLayout::new(tmp.path());
        fs::create_dir_all(tmp.path().join("instance_ufo")).expect("mkdir");

        run(&layout, &NoopCompiler, Vec::new()).expect("run");

        assert!(!tmp.path().join("instance_ufo").exists());
    }
}
