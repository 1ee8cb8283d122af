use crate::{
    checks::domain::{DomainName, Domains},
    products::unexpected::DomainListError,
    utilities::{produce_list_absolute, read_text_file},
    *,
};
use std::{collections::HashSet, path::Path};


/// Read monitored domains from all files matching given glob pattern.
///
/// A file holds either a JSON array of names, or plain text with one name per line
/// (blank lines and `#` comments skipped). Invalid names are skipped, duplicates dropped.
pub fn read_domain_list(pattern: &str) -> Result<Domains, DomainListError> {
    let files = produce_list_absolute(pattern)?;
    if files.is_empty() {
        warn!("No domain list files match: '{}'", pattern);
        return Ok(Domains::new());
    }

    let mut seen = HashSet::new();
    let mut domains = Domains::new();
    for file in files {
        for entry in read_entries(&file)? {
            match entry.parse::<DomainName>() {
                Ok(domain) if seen.insert(domain.clone()) => domains.push(domain),
                Ok(domain) => debug!("Duplicate domain: {} skipped", domain),
                Err(err) => warn!("{} in file: {:?}. Skipped.", err, file),
            }
        }
    }
    info!("Loaded {} monitored domains", domains.len());
    Ok(domains)
}


/// Raw entries of a single domain list file
fn read_entries(path: &Path) -> Result<Vec<String>, DomainListError> {
    let contents = read_text_file(path).map_err(|source| {
        DomainListError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    if contents.trim_start().starts_with('[') {
        serde_json::from_str(&contents).map_err(|source| {
            DomainListError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    } else {
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect())
    }
}
