/// kleebuild-core: the patient foundry behind Klee One releases
///
/// Turning a handful of Glyphs sources into shippable OTF binaries is
/// mostly waiting on fontmake; the interesting work is everything the
/// compiler does not do for you. This crate runs that whole journey as
/// one straight line, four stops, no detours.
///
/// ## The Four Stops
///
/// **Discovery**: look in `sources/` for `.glyphs` design files. Nothing
/// recursive, nothing clever — the folder either has sources or it does
/// not, and an absent folder is simply an empty build.
///
/// **Compilation**: hand each source to fontmake with the same flags the
/// TTF build uses, and let it drop compiled masters into `master_otf/`.
/// fontmake is treated as a guest chef: we set the table, it cooks, and
/// any complaint from it ends the dinner on the spot.
///
/// **Post-processing**: open every compiled OTF and apply the release
/// dressing — a stub DSIG some installers still ask after, the SemiBold
/// weight class fontmake gets wrong, the integer-PPEM rendering flag,
/// Japanese family and subfamily names, and a gasp table that always
/// reads grid-fit-plus-smoothing at every size. Each edit is independent
/// and idempotent; running the dressing twice changes nothing.
///
/// **Cleanup**: sweep away the scratch directories fontmake left behind.
///
/// ## The Cast
///
/// - [`pipeline::run`]: walks the four stops in order
/// - [`compile::SourceCompiler`]: the narrow doorway fontmake stands in
/// - [`postprocess::process_font`]: bytes in, release-ready bytes out
/// - [`report::BuildReport`]: what a run actually produced
///
/// Binary tables are read and written with the fontations stack
/// (write-fonts and its read re-export), so nothing here ever parses a
/// font by hand.
pub mod compile;
pub mod config;
pub mod discovery;
pub mod pipeline;
pub mod postprocess;
pub mod report;
