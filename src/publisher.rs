use crate::{
    products::{check_result::CertificateCheckResult, unexpected::PublishError},
    utilities::{sync_directory, temporary_sibling, write_synced},
    *,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};


/// Publish report under destination path. Readers see either the previous or the new report,
/// never a partial one: the report is written to a sibling temporary file, synced and renamed
pub fn publish(report: &[CertificateCheckResult], destination: &Path) -> Result<(), PublishError> {
    publish_with(report, destination, |_| Ok(()))
}


/// Publish report, running `before_swap` on the written temporary file right before the rename
pub fn publish_with<F>(
    report: &[CertificateCheckResult],
    destination: &Path,
    before_swap: F,
) -> Result<(), PublishError>
where
    F: FnOnce(&Path) -> Result<(), io::Error>,
{
    let contents = serde_json::to_vec_pretty(report)?;
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&directory).map_err(|source| {
        PublishError::Write {
            path: directory.clone(),
            source,
        }
    })?;

    let temporary = temporary_sibling(destination);
    debug!("Writing report of {} results to: {:?}", report.len(), temporary);
    let written = write_synced(&temporary, &contents)
        .and_then(|_| before_swap(&temporary))
        .map_err(|source| {
            PublishError::Write {
                path: temporary.clone(),
                source,
            }
        })
        .and_then(|_| {
            fs::rename(&temporary, destination).map_err(|source| {
                PublishError::Rename {
                    from: temporary.clone(),
                    to: destination.to_path_buf(),
                    source,
                }
            })
        });

    match written {
        Ok(()) => {
            sync_directory(&directory);
            info!("Published report of {} results: {:?}", report.len(), destination);
            Ok(())
        }
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&temporary) {
                trace!("Temporary report {:?} not removed: {}", temporary, cleanup);
            }
            error!("{}", err);
            Err(err)
        }
    }
}
