//! File subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use edtecg_http::api::{FileRecord, FileUpload, parse_timestamp};

use crate::context::AppContext;
use crate::output;

const ROUTE: &str = "/files";

#[derive(Args, Debug)]
pub struct FilesCommand {
    #[command(subcommand)]
    pub command: FilesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FilesSubcommand {
    /// List uploaded files
    List {
        /// Only files in this language
        #[arg(long)]
        language: Option<String>,

        /// Print full JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Uploader name recorded by the server
        #[arg(long)]
        uploaded_by: String,

        #[arg(long)]
        language: String,
    },

    /// Show file metadata
    Info {
        id: u64,
    },

    /// Download file content
    Download {
        id: u64,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the content of a file
    Update {
        id: u64,

        path: PathBuf,

        #[arg(long, default_value = "system")]
        uploaded_by: String,

        #[arg(long)]
        language: String,
    },

    /// Delete a file
    Delete {
        id: u64,
    },
}

pub async fn handle(ctx: &AppContext, cmd: FilesCommand) -> Result<()> {
    ctx.require_login(ROUTE)?;
    let files = ctx.client.files();

    match cmd.command {
        FilesSubcommand::List { language, json } => {
            let records = files
                .list(language.as_deref())
                .await
                .context("Failed to list files")?;

            if json {
                return output::json_lines(&records, false, "No files found.");
            }
            if records.is_empty() {
                output::note("No files found.");
            }
            for record in &records {
                print_summary(record);
            }
            Ok(())
        }
        FilesSubcommand::Upload {
            paths,
            uploaded_by,
            language,
        } => {
            let uploads = paths
                .iter()
                .map(|p| read_upload(p))
                .collect::<Result<Vec<_>>>()?;

            output::note(&format!("Uploading {} file(s)...", uploads.len()));
            let records = files
                .upload(uploads, &uploaded_by, &language)
                .await
                .context("Failed to upload files")?;

            output::success("Upload complete");
            for record in &records {
                print_summary(record);
            }
            Ok(())
        }
        FilesSubcommand::Info { id } => {
            let record = files.info(id).await.context("Failed to fetch file info")?;
            print_details(&record);
            Ok(())
        }
        FilesSubcommand::Download { id, output: path } => {
            let bytes = files
                .content(id)
                .await
                .context("Failed to download file")?;

            match path {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    output::success(&format!("Saved {} bytes to {}", bytes.len(), path.display()));
                }
                None => {
                    use std::io::Write;
                    std::io::stdout()
                        .write_all(&bytes)
                        .context("Failed to write to stdout")?;
                }
            }
            Ok(())
        }
        FilesSubcommand::Update {
            id,
            path,
            uploaded_by,
            language,
        } => {
            let upload = read_upload(&path)?;
            let record = files
                .update(id, upload, &uploaded_by, &language)
                .await
                .context("Failed to update file")?;

            output::success("File updated");
            print_details(&record);
            Ok(())
        }
        FilesSubcommand::Delete { id } => {
            files.delete(id).await.context("Failed to delete file")?;
            output::success(&format!("File {} deleted", id));
            Ok(())
        }
    }
}

fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;

    let upload = FileUpload::new(file_name, bytes);
    Ok(match content_type(path) {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}

fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

fn uploaded_at(record: &FileRecord) -> String {
    match record.upload_date.as_deref() {
        Some(raw) => parse_timestamp(raw)
            .map(format_date)
            .unwrap_or_else(|| raw.to_string()),
        None => "-".to_string(),
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn print_summary(record: &FileRecord) {
    println!(
        "{:>6}  {}  {}  {}",
        record.id,
        record.file_name,
        record.language.as_deref().unwrap_or("-"),
        uploaded_at(record)
    );
}

fn print_details(record: &FileRecord) {
    output::field("ID", &record.id.to_string());
    output::field("Name", &record.file_name);
    output::field("Type", record.file_type.as_deref().unwrap_or("-"));
    output::field("Size", &format!("{} bytes", record.size));
    output::field("Language", record.language.as_deref().unwrap_or("-"));
    output::field("Uploaded by", record.uploaded_by.as_deref().unwrap_or("-"));
    output::field("Uploaded", &uploaded_at(record));
    if let Some(status) = &record.upload_status {
        output::field("Status", status);
    }
}
