use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use filestore_contract::Transaction;
use filestore_server::{timestamp_now, FileStoreServer, Host, ServerConfig, StateConfig};
use filestore_state::FileWorldState;
use filestore_types::FileMetadata;
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli { command, format, state, .. } = cli;
    if let Command::Serve(args) = command {
        return cmd_serve(args, state).await;
    }
    let world = FileWorldState::open(&state)
        .with_context(|| format!("opening world state {}", state.display()))?;
    let host = Host::new(Arc::new(world));
    let output = execute(&host, command, format).await?;
    println!("{output}");
    Ok(())
}

async fn cmd_serve(args: ServeArgs, state: std::path::PathBuf) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig {
            state: StateConfig::File { path: state },
            ..ServerConfig::default()
        },
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!("FileStore server on {}", config.bind_addr.to_string().bold());
    FileStoreServer::new(config).serve().await?;
    Ok(())
}

/// Run one record command against `host` and render its result.
pub async fn execute(host: &Host, command: Command, format: OutputFormat) -> anyhow::Result<String> {
    match command {
        Command::Serve(_) => anyhow::bail!("serve is not a record command"),
        Command::Store(args) => {
            let now = timestamp_now();
            let meta = record_from(args).with_timestamps(now.clone(), now);
            let id = meta.id.clone();
            host.run(Transaction::StoreFile(meta)).await?;
            Ok(render_ack(format, "Stored", &id))
        }
        Command::Get(args) => {
            let payload = host.run(Transaction::GetFile(args.id)).await?;
            let meta = FileMetadata::from_json(&payload)?;
            Ok(match format {
                OutputFormat::Json => String::from_utf8_lossy(&payload).into_owned(),
                OutputFormat::Text => render_record(&meta),
            })
        }
        Command::List => {
            let payload = host.run(Transaction::GetAllFiles).await?;
            let files: Vec<FileMetadata> = serde_json::from_slice(&payload)?;
            Ok(match format {
                OutputFormat::Json => String::from_utf8_lossy(&payload).into_owned(),
                OutputFormat::Text if files.is_empty() => "No files.".to_string(),
                OutputFormat::Text => files
                    .iter()
                    .map(|f| format!("{}  {}  {} bytes  ({})", f.id.yellow(), f.name, f.size, f.owner.cyan()))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
        }
        Command::Update(args) => {
            let mut meta = record_from(args);
            meta.last_modified = timestamp_now();
            let id = meta.id.clone();
            host.run(Transaction::UpdateFile(meta)).await?;
            Ok(render_ack(format, "Updated", &id))
        }
        Command::Delete(args) => {
            host.run(Transaction::DeleteFile(args.id.clone())).await?;
            Ok(render_ack(format, "Deleted", &args.id))
        }
        Command::Exists(args) => {
            let payload = host.run(Transaction::FileExists(args.id.clone())).await?;
            let exists: bool = serde_json::from_slice(&payload)?;
            Ok(match format {
                OutputFormat::Json => json!({ "id": args.id, "exists": exists }).to_string(),
                OutputFormat::Text if exists => format!("{} {} exists", "✓".green(), args.id.yellow()),
                OutputFormat::Text => format!("{} {} not found", "✗".red(), args.id.yellow()),
            })
        }
        Command::Invoke(args) => {
            let tx = Transaction::parse(&args.function, args.args.as_slice())?;
            let payload = host.run(tx).await?;
            Ok(String::from_utf8_lossy(&payload).into_owned())
        }
    }
}

fn record_from(args: RecordArgs) -> FileMetadata {
    FileMetadata::new(args.id, args.owner)
        .with_name(args.name)
        .with_description(args.description)
        .with_storage_reference(args.cid)
        .with_size(args.size)
        .with_mime_type(args.mime_type)
        .with_encryption_key_id(args.key_id)
}

fn render_ack(format: OutputFormat, action: &str, id: &str) -> String {
    match format {
        OutputFormat::Json => json!({ "success": true, "id": id }).to_string(),
        OutputFormat::Text => format!("{} {} file {}", "✓".green().bold(), action, id.yellow()),
    }
}

fn render_record(meta: &FileMetadata) -> String {
    let mut lines = vec![format!("File {}", meta.id.yellow().bold())];
    let fields = [
        ("Name", meta.name.as_str()),
        ("Description", meta.description.as_str()),
        ("CID", meta.storage_reference.as_str()),
        ("MIME type", meta.mime_type.as_str()),
        ("Key id", meta.encryption_key_id.as_str()),
        ("Owner", meta.owner.as_str()),
        ("Created", meta.created_at.as_str()),
        ("Modified", meta.last_modified.as_str()),
    ];
    lines.push(format!("  Size: {} bytes", meta.size));
    for (label, value) in fields {
        if !value.is_empty() {
            lines.push(format!("  {label}: {value}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use filestore_contract::ContractError;
    use filestore_server::ServerError;

    fn host_at(dir: &tempfile::TempDir) -> Host {
        let world = FileWorldState::open(dir.path().join("state.bin")).unwrap();
        Host::new(Arc::new(world))
    }

    fn store_args(id: &str, owner: &str) -> RecordArgs {
        RecordArgs {
            id: id.into(),
            owner: owner.into(),
            name: "doc.pdf".into(),
            size: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn store_then_get_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_at(&dir);
        execute(&host, Command::Store(store_args("f1", "alice")), OutputFormat::Text)
            .await
            .unwrap();

        let out = execute(&host, Command::Get(IdArgs { id: "f1".into() }), OutputFormat::Json)
            .await
            .unwrap();
        let meta = FileMetadata::from_json(out.as_bytes()).unwrap();
        assert_eq!(meta.name, "doc.pdf");
        assert!(!meta.created_at.is_empty());
    }

    #[tokio::test]
    async fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        execute(&host_at(&dir), Command::Store(store_args("f1", "alice")), OutputFormat::Json)
            .await
            .unwrap();

        let out = execute(&host_at(&dir), Command::Exists(IdArgs { id: "f1".into() }), OutputFormat::Json)
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out, json!({ "id": "f1", "exists": true }));
    }

    #[tokio::test]
    async fn store_without_owner_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&host_at(&dir), Command::Store(store_args("f1", "")), OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServerError>(),
            Some(ServerError::Contract(ContractError::Validation { field: "owner" }))
        ));
    }

    #[tokio::test]
    async fn store_without_id_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_at(&dir);
        let err = execute(&host, Command::Store(store_args("", "alice")), OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServerError>(),
            Some(ServerError::Contract(ContractError::Validation { field: "id" }))
        ));
        let out = execute(&host, Command::List, OutputFormat::Json).await.unwrap();
        assert_eq!(out, "[]");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&host_at(&dir), Command::Update(store_args("ghost", "alice")), OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServerError>(),
            Some(ServerError::Contract(ContractError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_at(&dir);
        let empty = execute(&host, Command::List, OutputFormat::Json).await.unwrap();
        assert_eq!(empty, "[]");

        for id in ["a", "b"] {
            execute(&host, Command::Store(store_args(id, "alice")), OutputFormat::Text)
                .await
                .unwrap();
        }
        execute(&host, Command::Delete(IdArgs { id: "a".into() }), OutputFormat::Text)
            .await
            .unwrap();

        let out = execute(&host, Command::List, OutputFormat::Json).await.unwrap();
        let files: Vec<FileMetadata> = serde_json::from_str(&out).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, "b");
    }

    #[tokio::test]
    async fn invoke_by_function_name() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_at(&dir);
        let record = r#"{"id":"f1","owner":"alice"}"#.to_string();
        execute(
            &host,
            Command::Invoke(InvokeArgs { function: "StoreFile".into(), args: vec![record] }),
            OutputFormat::Text,
        )
        .await
        .unwrap();

        let out = execute(
            &host,
            Command::Invoke(InvokeArgs { function: "FileExists".into(), args: vec!["f1".into()] }),
            OutputFormat::Text,
        )
        .await
        .unwrap();
        assert_eq!(out, "true");
    }

    #[test]
    fn text_record_skips_empty_fields() {
        colored::control::set_override(false);
        let text = render_record(&FileMetadata::new("f1", "alice").with_size(3));
        assert!(text.contains("Owner: alice"));
        assert!(text.contains("Size: 3 bytes"));
        assert!(!text.contains("Name:"));
    }
}
