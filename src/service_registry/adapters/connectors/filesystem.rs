//! File system connector sandboxed to a root directory.

use super::catalog::{self, ToolParam, ToolSpec};
use super::session::SessionSlot;
use crate::service_registry::domain::{
    CredentialSet, ServiceKind, ToolCallError, ToolDefinition,
};
use crate::service_registry::ports::{Connector, ConnectorError, ConnectorResult};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value, json};
use std::io;
use std::sync::Arc;

const PATH: ToolParam = ToolParam::required("path");

const TOOLS: &[ToolSpec] = &[
    ToolSpec::new(
        "list_directory",
        "List entries of a directory below the root",
        &[ToolParam::optional("path")],
    ),
    ToolSpec::new("read_file", "Read a UTF-8 text file below the root", &[PATH]),
    ToolSpec::new("file_info", "Report the type and size of a path below the root", &[PATH]),
];

/// Connector exposing one directory tree.
///
/// Every tool path is resolved through a capability handle, so `..` and
/// absolute paths cannot escape the root.
#[derive(Debug, Default)]
pub struct FileSystemConnector {
    session: SessionSlot<Arc<Dir>>,
}

impl FileSystemConnector {
    /// Creates a disconnected connector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn tool_io_error(path: &str, err: &io::Error) -> ToolCallError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput => {
            ToolCallError::InvalidParams(format!("{path}: {err}"))
        }
        _ => ToolCallError::Internal(format!("{path}: {err}")),
    }
}

fn run_tool(dir: &Dir, name: &str, arguments: &Map<String, Value>) -> Result<Value, ToolCallError> {
    let path = arguments
        .get("path")
        .and_then(Value::as_str)
        .unwrap_or(".");
    match name {
        "list_directory" => {
            let mut entries = Vec::new();
            for entry in dir.read_dir(path).map_err(|err| tool_io_error(path, &err))? {
                let item = entry.map_err(|err| tool_io_error(path, &err))?;
                let file_name = item.file_name().map_err(|err| tool_io_error(path, &err))?;
                let is_dir = item
                    .file_type()
                    .map_err(|err| tool_io_error(path, &err))?
                    .is_dir();
                entries.push((file_name, is_dir));
            }
            entries.sort();
            let listed: Vec<Value> = entries
                .into_iter()
                .map(|(entry_name, is_dir)| {
                    json!({"name": entry_name, "kind": if is_dir { "directory" } else { "file" }})
                })
                .collect();
            Ok(json!({"path": path, "entries": listed}))
        }
        "read_file" => {
            let content = dir
                .read_to_string(path)
                .map_err(|err| tool_io_error(path, &err))?;
            Ok(json!({"path": path, "content": content}))
        }
        "file_info" => {
            let metadata = dir.metadata(path).map_err(|err| tool_io_error(path, &err))?;
            Ok(json!({
                "path": path,
                "kind": if metadata.is_dir() { "directory" } else { "file" },
                "size": metadata.len(),
            }))
        }
        other => Err(ToolCallError::MethodNotFound(other.to_owned())),
    }
}

#[async_trait]
impl Connector for FileSystemConnector {
    fn kind(&self) -> ServiceKind {
        ServiceKind::FileSystem
    }

    async fn connect(&self, credentials: &CredentialSet) -> ConnectorResult<()> {
        self.session.clear();
        let root = credentials
            .secret_for(ServiceKind::FileSystem)
            .map(Utf8PathBuf::from)
            .ok_or_else(|| {
                ConnectorError::invalid_credentials(
                    ServiceKind::FileSystem,
                    "root path is required",
                )
            })?;

        let open_root = root.clone();
        let dir = tokio::task::spawn_blocking(move || {
            Dir::open_ambient_dir(&open_root, ambient_authority())
        })
        .await
        .map_err(ConnectorError::transport)?
        .map_err(|err| {
            ConnectorError::invalid_credentials(
                ServiceKind::FileSystem,
                format!("root path '{root}' is not an accessible directory: {err}"),
            )
        })?;

        self.session.set(Arc::new(dir));
        Ok(())
    }

    async fn disconnect(&self) {
        self.session.clear();
    }

    fn is_connected(&self) -> bool {
        self.session.is_set()
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        catalog::definitions(TOOLS)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolCallError> {
        let spec = catalog::find(TOOLS, name)?;
        let dir = self
            .session
            .get()
            .ok_or(ToolCallError::NotConnected(ServiceKind::FileSystem))?;
        let accepted = spec.accept(arguments)?;
        let tool_name = spec.name;

        tokio::task::spawn_blocking(move || run_tool(&dir, tool_name, &accepted))
            .await
            .map_err(ToolCallError::internal)?
    }
}
