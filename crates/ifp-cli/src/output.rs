use crate::error::Result;
use ifpkit::core::groups::registry::AtomGroupRegistry;
use ifpkit::core::models::structure::Structure;
use ifpkit::engine::fingerprint::FingerprintOutput;
use ifpkit::engine::perceiver::compound_label;
use itertools::Itertools;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize, PartialEq)]
pub struct FingerprintRow<'a> {
    pub unit: &'a str,
    pub length: u64,
    pub index: u32,
    pub value: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GroupRow {
    pub group: usize,
    pub size: usize,
    pub atoms: String,
    pub compounds: String,
    pub features: String,
    pub interactions: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One row per on-bit, units in the given order and indices ascending.
pub fn fingerprint_rows<'a>(
    fingerprints: &'a [(String, FingerprintOutput)],
) -> impl Iterator<Item = FingerprintRow<'a>> + 'a {
    fingerprints.iter().flat_map(|(unit, fp)| {
        let length = fp.length();
        fp.entries().into_iter().map(move |(index, value)| FingerprintRow {
            unit: unit.as_str(),
            length,
            index,
            value,
        })
    })
}

/// Groups in registry order; atoms are listed by serial.
pub fn group_rows(structure: &Structure, registry: &AtomGroupRegistry) -> Vec<GroupRow> {
    registry
        .iter()
        .enumerate()
        .map(|(position, (_, group))| {
            let centroid = group.centroid();
            GroupRow {
                group: position + 1,
                size: group.size(),
                atoms: group
                    .atoms()
                    .iter()
                    .filter_map(|&id| registry.atom(id).map(|a| a.serial))
                    .sorted_unstable()
                    .join(";"),
                compounds: group
                    .compounds()
                    .iter()
                    .map(|&c| compound_label(structure, c))
                    .join(";"),
                features: group.feature_names().join(";"),
                interactions: group.interactions().len(),
                x: centroid.x,
                y: centroid.y,
                z: centroid.z,
            }
        })
        .collect()
}

pub fn write_rows<W, R, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_fingerprints(path: &Path, fingerprints: &[(String, FingerprintOutput)]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_rows(file, fingerprint_rows(fingerprints))
}

pub fn write_groups(path: &Path, structure: &Structure, registry: &AtomGroupRegistry) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_rows(file, group_rows(structure, registry))
}
