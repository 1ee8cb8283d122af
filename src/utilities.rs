use crate::{configuration::*, products::unexpected::DomainListError, *};
use glob::glob;
use retry::{delay::Fixed, retry, Error as RetryError};
use slack_hooked::{AttachmentBuilder, PayloadBuilder, Slack};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    time::{SystemTime, UNIX_EPOCH},
};


/// Read text file
pub fn read_text_file<P: AsRef<Path>>(name: P) -> Result<String, io::Error> {
    fs::read_to_string(name)
}


/// Produce sorted list of absolute paths of files matching given glob pattern
pub fn produce_list_absolute(glob_pattern: &str) -> Result<Vec<PathBuf>, DomainListError> {
    let entries = glob(glob_pattern).map_err(|source| {
        DomainListError::Pattern {
            pattern: glob_pattern.to_string(),
            source,
        }
    })?;
    let mut list = entries
        .filter_map(|entry| {
            match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(err) => {
                    error!("Error: produce_list_absolute(): {}", err);
                    None
                }
            }
        })
        .map(|path| fs::canonicalize(&path).unwrap_or(path))
        .collect::<Vec<PathBuf>>();
    list.sort();
    debug!("produce_list_absolute(): Elements: {:?}", list);
    Ok(list)
}


/// Sibling temporary file name, unique per process and call
pub fn temporary_sibling(destination: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_nanos())
        .unwrap_or_default();
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("report"));
    destination.with_file_name(format!(".{}.{}-{}.tmp", file_name, process::id(), nanos))
}


/// Write given contents to a fresh file and flush it to the storage
pub fn write_synced(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}


/// Flush directory entries (renames) to the storage. No-op where directories can't be opened
pub fn sync_directory(directory: &Path) {
    let synced = fs::File::open(directory).and_then(|dir| dir.sync_all());
    if let Err(err) = synced {
        trace!("Couldn't sync directory {:?}: {}", directory, err);
    }
}


/// Send failure notification to a Slack webhook, retried a few times
pub fn notify_failure(
    webhook: &str,
    bot_name: &str,
    icon: &str,
    subject: &str,
    message: &str,
) -> Result<(), String> {
    let delays = Fixed::from_millis(NOTIFY_RETRY_DELAY_MS).take(NOTIFY_RETRIES);
    retry(delays, || {
        Slack::new(webhook)
            .and_then(|slack| {
                AttachmentBuilder::new(message)
                    .text(message)
                    .color(DEFAULT_SLACK_FAILURE_COLOR)
                    .build()
                    .and_then(|attachment| {
                        PayloadBuilder::new()
                            .text(subject)
                            .username(bot_name)
                            .icon_emoji(icon)
                            .attachments(vec![attachment])
                            .build()
                    })
                    .and_then(|payload| {
                        debug!("Sending notification with payload: {:?}", &payload);
                        slack.send(&payload)
                    })
            })
            .map_err(|err| err.to_string())
    })
    .map_err(|err| {
        match err {
            RetryError::Operation { error, tries, .. } => {
                format!("{} (after {} attempts)", error, tries)
            }
            RetryError::Internal(details) => details,
        }
    })
}
