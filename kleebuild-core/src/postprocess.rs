//! Post-processing of compiled OTFs.
//!
//! Every edit here is independent of the others and idempotent:
//! re-running the whole sequence over an already-processed font
//! reproduces the same bytes.

use anyhow::{anyhow, Context, Result};
use write_fonts::{
    dump_table,
    from_obj::ToOwnedTable,
    read::{
        tables::{
            head::{Flags, Head},
            name::{Name as ReadName, NameId},
            os2::Os2,
        },
        types::Tag,
        FontRef, TableProvider, TopLevelTable,
    },
    tables::{
        dsig::Dsig,
        gasp::{Gasp, GaspRange, GaspRangeBehavior},
        name::{Name, NameRecord},
    },
    FontBuilder,
};

use crate::config::{FAMILY_NAME_JA, REGULAR, SEMIBOLD, WEIGHT_CLASS_SEMIBOLD};

const GASP: Tag = Tag::new(b"gasp");

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const WINDOWS_JAPANESE: u16 = 0x0411;

/// PPEM sentinel covering every rendering size.
const ALL_SIZES: u16 = 0xFFFF;

/// Apply the full release-edit sequence to one compiled font.
///
/// `font_name` is the artifact's logical name (file stem, e.g.
/// `KleeOne-SemiBold`); the style substrings in it drive the
/// weight-class and subfamily edits.
pub fn process_font(data: &[u8], font_name: &str) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("parsing compiled font")?;
    let mut builder = FontBuilder::new();

    builder
        .add_table(&Dsig::default())
        .map_err(|e| anyhow!("{e}"))?;

    if font_name.contains(SEMIBOLD) {
        builder.add_raw(Os2::TAG, set_weight_class(&font, WEIGHT_CLASS_SEMIBOLD)?);
    }

    builder.add_raw(Head::TAG, force_integer_ppem(&font)?);

    builder
        .add_table(&localized_names(&font, font_name)?)
        .map_err(|e| anyhow!("{e}"))?;

    let gasp = dump_table(&canonical_gasp()).map_err(|e| anyhow!("building gasp table: {e}"))?;
    if gasp_needs_rewrite(&font, &gasp) {
        builder.add_raw(GASP, gasp);
    }

    builder.copy_missing_tables(font);
    Ok(builder.build())
}

/// Weight class recorded in a font, if it carries an OS/2 table.
pub fn weight_class(data: &[u8]) -> Option<u16> {
    let font = FontRef::new(data).ok()?;
    font.os2().ok().map(|os2| os2.us_weight_class())
}

/// Splice a new usWeightClass into the raw OS/2 bytes, leaving every
/// other field exactly as the compiler wrote it.
fn set_weight_class(font: &FontRef, weight: u16) -> Result<Vec<u8>> {
    let os2 = font.os2().context("reading OS/2 table")?;
    let mut data = os2.offset_data().as_bytes().to_owned();
    let range = os2.shape().us_weight_class_byte_range();
    data[range].copy_from_slice(&weight.to_be_bytes());
    Ok(data)
}

/// OR the force-integer-PPEM bit into head.flags.
///
/// Works on the raw flags word so reserved bits the compiler may have
/// set survive the round trip.
fn force_integer_ppem(font: &FontRef) -> Result<Vec<u8>> {
    let head = font.head().context("reading head table")?;
    let mut data = head.offset_data().as_bytes().to_owned();
    let range = head.shape().flags_byte_range();
    let flags = u16::from_be_bytes([data[range.start], data[range.start + 1]])
        | Flags::FORCE_INTEGER_PPEM.bits();
    data[range].copy_from_slice(&flags.to_be_bytes());
    Ok(data)
}

/// Windows-platform Japanese family and subfamily records.
///
/// Records under the same (platform, encoding, language, ID) key are
/// replaced rather than duplicated; records for other languages and
/// platforms pass through untouched, and no Macintosh records are
/// written.
fn localized_names(font: &FontRef, font_name: &str) -> Result<Name> {
    let mut name: Name = match font.name() {
        Ok(table) => table.to_owned_table(),
        Err(_) if font.data_for_tag(ReadName::TAG).is_none() => Name::default(),
        Err(err) => return Err(err).context("reading name table"),
    };

    upsert_japanese(&mut name, NameId::FAMILY_NAME, FAMILY_NAME_JA);
    if let Some(subfamily) = japanese_subfamily(font_name) {
        upsert_japanese(&mut name, NameId::SUBFAMILY_NAME, subfamily);
    }

    // The name table requires its records sorted.
    name.name_record.sort();
    Ok(name)
}

/// Subfamily literal recorded for this cut, if the style is one we name.
fn japanese_subfamily(font_name: &str) -> Option<&'static str> {
    if font_name.contains(SEMIBOLD) {
        Some(SEMIBOLD)
    } else if font_name.contains(REGULAR) {
        Some(REGULAR)
    } else {
        None
    }
}

fn upsert_japanese(name: &mut Name, name_id: NameId, value: &str) {
    let existing = name.name_record.iter_mut().find(|rec| {
        rec.platform_id == WINDOWS_PLATFORM
            && rec.encoding_id == UNICODE_BMP_ENCODING
            && rec.language_id == WINDOWS_JAPANESE
            && rec.name_id == name_id
    });

    match existing {
        Some(rec) => rec.string = value.to_string().into(),
        None => name.name_record.push(NameRecord::new(
            WINDOWS_PLATFORM,
            UNICODE_BMP_ENCODING,
            WINDOWS_JAPANESE,
            name_id,
            value.to_string().into(),
        )),
    }
}

/// gasp with a single range: grayscale plus symmetric smoothing at all
/// sizes.
fn canonical_gasp() -> Gasp {
    Gasp {
        version: 1,
        num_ranges: 1,
        gasp_ranges: vec![GaspRange {
            range_max_ppem: ALL_SIZES,
            range_gasp_behavior: GaspRangeBehavior::GASP_DOGRAY
                | GaspRangeBehavior::GASP_SYMMETRIC_SMOOTHING,
        }],
    }
}

fn gasp_needs_rewrite(font: &FontRef, canonical: &[u8]) -> bool {
    match font.data_for_tag(GASP) {
        Some(existing) => existing.as_bytes() != canonical,
        None => true,
    }
}
