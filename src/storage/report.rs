//! Writing the four report files.
//!
//! One CSV per collection: `direct.csv`, `automatic.csv`,
//! `semiautomatic.csv`, and `failed.csv`. Category descriptions are joined
//! onto every category column; the resolver itself never sees them.

use std::path::Path;

use crate::{
    domain::{Category, Config, ReferenceEntry, entry::MAX_CATEGORIES},
    resolve::{AutomaticMapping, MappingReport, SemiAutomaticMapping},
};

use super::{InvalidDelimiterError, delimiter, reference::DescriptionMap};

/// Writes the report collections into `dir`, one CSV per collection.
///
/// Rows are written in the collections' own order, which the resolver keeps
/// sorted by queried code — re-running an identical mapping produces
/// byte-identical files.
///
/// # Errors
///
/// Returns a [`ReportError`] if the directory cannot be created or a file
/// cannot be written.
pub fn write_report(
    report: &MappingReport,
    descriptions: &DescriptionMap,
    dir: &Path,
    config: &Config,
) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir)?;
    let delimiter = delimiter(config)?;

    write_direct(&report.direct, descriptions, &dir.join("direct.csv"), delimiter)?;
    write_automatic(
        &report.automatic,
        descriptions,
        &dir.join("automatic.csv"),
        delimiter,
    )?;
    write_semiautomatic(
        &report.semiautomatic,
        descriptions,
        &dir.join("semiautomatic.csv"),
        delimiter,
    )?;
    write_failed(report, &dir.join("failed.csv"), delimiter)?;

    tracing::info!(dir = %dir.display(), "wrote report files");
    Ok(())
}

fn writer(path: &Path, delimiter: u8) -> Result<csv::Writer<std::fs::File>, csv::Error> {
    csv::WriterBuilder::new().delimiter(delimiter).from_path(path)
}

fn category_headers() -> Vec<String> {
    let mut headers = Vec::with_capacity(MAX_CATEGORIES * 2);
    for slot in 1..=MAX_CATEGORIES {
        headers.push(format!("category_{slot}"));
        headers.push(format!("category_{slot}_desc"));
    }
    headers
}

fn describe(descriptions: &DescriptionMap, category: &Category) -> String {
    descriptions.get(category).unwrap_or_default().to_string()
}

/// Category and description cells, padded out to the six slots.
fn category_cells(categories: &[&Category], descriptions: &DescriptionMap) -> Vec<String> {
    let mut cells = Vec::with_capacity(MAX_CATEGORIES * 2);
    for slot in 0..MAX_CATEGORIES {
        if let Some(category) = categories.get(slot) {
            cells.push(category.to_string());
            cells.push(describe(descriptions, category));
        } else {
            cells.push(String::new());
            cells.push(String::new());
        }
    }
    cells
}

fn write_direct(
    entries: &[ReferenceEntry],
    descriptions: &DescriptionMap,
    path: &Path,
    delimiter: u8,
) -> Result<(), ReportError> {
    let mut writer = writer(path, delimiter)?;

    let mut header = vec![
        "code".to_string(),
        "default".to_string(),
        "default_desc".to_string(),
    ];
    header.extend(category_headers());
    writer.write_record(&header)?;

    for entry in entries {
        let mut row = vec![
            entry.code().to_string(),
            entry.default_category().to_string(),
            describe(descriptions, entry.default_category()),
        ];
        let slots: Vec<&Category> = entry.categories().collect();
        row.extend(category_cells(&slots, descriptions));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_automatic(
    mappings: &[AutomaticMapping],
    descriptions: &DescriptionMap,
    path: &Path,
    delimiter: u8,
) -> Result<(), ReportError> {
    let mut writer = writer(path, delimiter)?;

    let mut header = vec![
        "code".to_string(),
        "deciding_relationship".to_string(),
        "related_codes".to_string(),
        "default".to_string(),
        "default_desc".to_string(),
    ];
    header.extend(category_headers());
    writer.write_record(&header)?;

    for mapping in mappings {
        let related: Vec<&str> = mapping.mapping.related.iter().map(|c| c.as_str()).collect();
        let default = mapping
            .mapping
            .default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let default_desc = mapping
            .mapping
            .default
            .as_ref()
            .map(|category| describe(descriptions, category))
            .unwrap_or_default();

        let mut row = vec![
            mapping.code.to_string(),
            mapping.mapping.deciding.to_string(),
            related.join(" "),
            default,
            default_desc,
        ];
        let categories: Vec<&Category> = mapping.mapping.categories.iter().collect();
        row.extend(category_cells(&categories, descriptions));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_semiautomatic(
    mappings: &[SemiAutomaticMapping],
    descriptions: &DescriptionMap,
    path: &Path,
    delimiter: u8,
) -> Result<(), ReportError> {
    let mut writer = writer(path, delimiter)?;
    writer.write_record(["code", "tier", "category", "category_desc", "agreement_pct"])?;

    for mapping in mappings {
        for candidate in &mapping.mapping.candidates {
            let description = describe(descriptions, &candidate.category);
            let pct = format!("{:.2}", candidate.agreement_pct);
            writer.write_record([
                mapping.code.as_str(),
                mapping.mapping.tier.as_str(),
                candidate.category.as_str(),
                description.as_str(),
                pct.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_failed(report: &MappingReport, path: &Path, delimiter: u8) -> Result<(), ReportError> {
    let mut writer = writer(path, delimiter)?;
    writer.write_record(["code"])?;
    for code in &report.failed {
        writer.write_record([code.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Errors that can occur when writing report files.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The configured delimiter is unusable.
    #[error(transparent)]
    Delimiter(#[from] InvalidDelimiterError),

    /// The output directory could not be created or a file flushed.
    #[error("failed to write report")]
    Io(#[from] std::io::Error),

    /// A report file could not be written.
    #[error("failed to write report file")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;

    use super::*;
    use crate::{
        domain::{Code, ReferenceIndex},
        resolve::Resolver,
    };

    fn category(s: &str) -> Category {
        Category::try_from(s).unwrap()
    }

    fn entry(code: &str, categories: &[&str], default: &str) -> ReferenceEntry {
        let categories =
            NonEmpty::from_vec(categories.iter().map(|c| category(c)).collect()).unwrap();
        ReferenceEntry::new(Code::try_from(code).unwrap(), categories, category(default)).unwrap()
    }

    fn descriptions(pairs: &[(&str, &str)]) -> DescriptionMap {
        let mut map = DescriptionMap::default();
        for (label, desc) in pairs {
            map.insert(&category(label), Some(desc));
        }
        map
    }

    fn read(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn writes_all_four_files() {
        let index = ReferenceIndex::from_entries(vec![
            entry("A000", &["X"], "X"),
            entry("A01011", &["X"], "X"),
            entry("A01012", &["X"], "X"),
            entry("B21", &["Y"], "Y"),
            entry("B22", &["Z"], "Z"),
        ])
        .unwrap();
        let queries: Vec<Code> = ["A000", "A0101", "B20", "Z999"]
            .iter()
            .map(|c| Code::try_from(*c).unwrap())
            .collect();
        let report = Resolver::new(&index).map_codes(&queries);
        let descriptions = descriptions(&[("X", "Something"), ("Y", "Other"), ("Z", "Third")]);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        write_report(&report, &descriptions, &out, &Config::default()).unwrap();

        let direct = read(&out.join("direct.csv"));
        assert_eq!(direct.len(), 2);
        assert!(direct[0].starts_with("code,default,default_desc,category_1"));
        assert!(direct[1].starts_with("A000,X,Something,X,Something,"));

        let automatic = read(&out.join("automatic.csv"));
        assert_eq!(automatic.len(), 2);
        assert_eq!(
            automatic[1],
            "A0101,Children,A01011 A01012,X,Something,X,Something,,,,,,,,,,"
        );

        let semiautomatic = read(&out.join("semiautomatic.csv"));
        assert_eq!(
            semiautomatic,
            vec![
                "code,tier,category,category_desc,agreement_pct".to_string(),
                "B20,Close,Y,Other,50.00".to_string(),
                "B20,Close,Z,Third,50.00".to_string(),
            ]
        );

        let failed = read(&out.join("failed.csv"));
        assert_eq!(failed, vec!["code".to_string(), "Z999".to_string()]);
    }

    #[test]
    fn an_unresolved_default_leaves_its_cells_empty() {
        let index = ReferenceIndex::from_entries(vec![
            entry("A01011", &["X", "Y", "V"], "V"),
            entry("A01012", &["X", "Y", "W"], "W"),
        ])
        .unwrap();
        let queries = vec![Code::try_from("A0101").unwrap()];
        let report = Resolver::new(&index).map_codes(&queries);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        write_report(&report, &DescriptionMap::default(), &out, &Config::default()).unwrap();

        let automatic = read(&out.join("automatic.csv"));
        assert_eq!(
            automatic[1],
            "A0101,Children,A01011 A01012,,,X,,Y,,,,,,,,,"
        );
    }
}
