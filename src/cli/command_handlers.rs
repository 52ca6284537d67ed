use crate::api::client::Api;
use crate::api::endpoints;
use crate::api::models::ApiResponse;
use crate::cli::main_types::{
    AccountCommands, MemoryCommands, MemoryFields, MemoryVersionCommands, WorkspaceCommands,
};
use crate::core::services::config_service::ConfigService;
use crate::display::{Breadcrumb, Response};
use crate::error::AppError;
use crate::storage::config::DEFAULT_API_URL;
use crate::storage::environment::ConfigLayer;
use crate::utils::input::resolve_content;
use crate::utils::validation::{parse_tags, require_flag, validate_url};
use log::debug;
use serde_json::{Map, Value, json};
use std::io::Read;

const CLI_NAME: &str = "recuerd0";

/// Success envelope for a listing: pagination from the `Link` header
fn paginated(resp: ApiResponse, summary: String, breadcrumbs: Vec<Breadcrumb>) -> Response {
    let has_next = resp.has_next();
    Response::success(resp.data)
        .pagination(has_next, resp.link_next)
        .summary(summary)
        .breadcrumbs(breadcrumbs)
        .build()
}

fn detail(resp: ApiResponse, summary: &str, breadcrumbs: Vec<Breadcrumb>) -> Response {
    Response::success(resp.data)
        .summary(summary)
        .breadcrumbs(breadcrumbs)
        .build()
}

/// Like [`detail`], plus the `Location` of the created resource
fn created(resp: ApiResponse, summary: &str, breadcrumbs: Vec<Breadcrumb>) -> Response {
    Response::success(resp.data)
        .location(resp.location)
        .summary(summary)
        .breadcrumbs(breadcrumbs)
        .build()
}

pub fn version_response() -> Response {
    Response::success(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "cli": CLI_NAME,
    }))
    .build()
}

#[derive(Default)]
pub struct AccountHandler;

impl AccountHandler {
    pub fn new() -> Self {
        Self
    }

    /// Account commands touch only the local config file. `flags` supplies
    /// `--token` and `--api-url` for `add`.
    pub fn handle(
        &self,
        command: AccountCommands,
        config: &ConfigService,
        flags: &ConfigLayer,
    ) -> crate::Result<Response> {
        match command {
            AccountCommands::Add { name } => {
                let token = require_flag("--token", flags.token.as_deref())?;
                if let Some(url) = &flags.api_url {
                    validate_url(url)?;
                }

                let account = config
                    .add_account(&name, &token, flags.api_url.as_deref())
                    .map_err(|e| AppError::general(format!("adding account: {}", e)))?;
                let api_url = if account.api_url.is_empty() {
                    DEFAULT_API_URL.to_string()
                } else {
                    account.api_url
                };

                Ok(Response::success(json!({"name": name, "api_url": api_url}))
                    .summary(format!("Account \"{}\" added", name))
                    .breadcrumbs(vec![
                        Breadcrumb::new("list", "recuerd0 account list", "List all accounts"),
                        Breadcrumb::new(
                            "select",
                            format!("recuerd0 account select {}", name),
                            "Switch to this account",
                        ),
                    ])
                    .build())
            }
            AccountCommands::List => {
                let global = config
                    .list_accounts()
                    .map_err(|e| AppError::general(format!("listing accounts: {}", e)))?;

                let accounts: Vec<Value> = global
                    .accounts
                    .iter()
                    .map(|(name, account)| {
                        json!({
                            "name": name,
                            "api_url": account.api_url,
                            "current": *name == global.current,
                        })
                    })
                    .collect();
                let summary = format!("{} account(s)", accounts.len());

                Ok(Response::success(Value::Array(accounts))
                    .summary(summary)
                    .breadcrumbs(vec![Breadcrumb::new(
                        "add",
                        "recuerd0 account add <name> --token TOKEN",
                        "Add a new account",
                    )])
                    .build())
            }
            AccountCommands::Select { name } => {
                config
                    .set_current(&name)
                    .map_err(|e| AppError::general(format!("selecting account: {}", e)))?;

                Ok(Response::success(json!({"current": name}))
                    .summary(format!("Switched to account \"{}\"", name))
                    .breadcrumbs(vec![
                        Breadcrumb::new("list", "recuerd0 account list", "List all accounts"),
                        Breadcrumb::new("workspaces", "recuerd0 workspace list", "List workspaces"),
                    ])
                    .build())
            }
            AccountCommands::Remove { name } => {
                config
                    .remove_account(&name)
                    .map_err(|e| AppError::general(format!("removing account: {}", e)))?;

                Ok(Response::success(json!({"removed": name}))
                    .summary(format!("Account \"{}\" removed", name))
                    .breadcrumbs(vec![Breadcrumb::new(
                        "list",
                        "recuerd0 account list",
                        "List remaining accounts",
                    )])
                    .build())
            }
        }
    }
}

#[derive(Default)]
pub struct WorkspaceHandler;

impl WorkspaceHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, command: WorkspaceCommands, api: &dyn Api) -> crate::Result<Response> {
        match command {
            WorkspaceCommands::List { page } => {
                let resp = api.get(&endpoints::workspaces(page)).await?;
                let summary = format!("{} workspace(s)", resp.item_count());

                Ok(paginated(
                    resp,
                    summary,
                    vec![
                        Breadcrumb::new("show", "recuerd0 workspace show <id>", "View workspace details"),
                        Breadcrumb::new(
                            "create",
                            "recuerd0 workspace create --name NAME",
                            "Create a workspace",
                        ),
                    ],
                ))
            }
            WorkspaceCommands::Show { id } => {
                let resp = api.get(&endpoints::workspace(&id)).await?;

                Ok(detail(
                    resp,
                    "Workspace details",
                    vec![
                        Breadcrumb::new(
                            "list-memories",
                            format!("recuerd0 memory list --workspace {}", id),
                            "List memories in workspace",
                        ),
                        Breadcrumb::new(
                            "update",
                            format!("recuerd0 workspace update {} --name NAME", id),
                            "Update workspace",
                        ),
                        Breadcrumb::new(
                            "archive",
                            format!("recuerd0 workspace archive {}", id),
                            "Archive workspace",
                        ),
                    ],
                ))
            }
            WorkspaceCommands::Create { name, description } => {
                let name = require_flag("--name", name.as_deref())?;
                let body = json!({
                    "workspace": {
                        "name": name,
                        "description": description.unwrap_or_default(),
                    }
                });

                let resp = api.post(endpoints::workspaces(None).as_str(), Some(&body)).await?;

                Ok(created(
                    resp,
                    "Workspace created",
                    vec![
                        Breadcrumb::new("show", "recuerd0 workspace show <id>", "View created workspace"),
                        Breadcrumb::new("list", "recuerd0 workspace list", "List all workspaces"),
                    ],
                ))
            }
            WorkspaceCommands::Update {
                id,
                name,
                description,
            } => {
                let mut workspace = Map::new();
                insert_non_empty(&mut workspace, "name", name);
                insert_non_empty(&mut workspace, "description", description);
                if workspace.is_empty() {
                    return Err(AppError::InvalidArguments(
                        "at least one of --name or --description is required".to_string(),
                    ));
                }

                let body = json!({ "workspace": workspace });
                let resp = api.patch(&endpoints::workspace(&id), Some(&body)).await?;

                Ok(detail(
                    resp,
                    "Workspace updated",
                    vec![Breadcrumb::new(
                        "show",
                        format!("recuerd0 workspace show {}", id),
                        "View updated workspace",
                    )],
                ))
            }
            WorkspaceCommands::Archive { id } => {
                let resp = api.patch(&endpoints::workspace_archive(&id), None).await?;

                Ok(detail(
                    resp,
                    "Workspace archived",
                    vec![
                        Breadcrumb::new(
                            "unarchive",
                            format!("recuerd0 workspace unarchive {}", id),
                            "Unarchive workspace",
                        ),
                        Breadcrumb::new("list", "recuerd0 workspace list", "List workspaces"),
                    ],
                ))
            }
            WorkspaceCommands::Unarchive { id } => {
                let resp = api.patch(&endpoints::workspace_unarchive(&id), None).await?;

                Ok(detail(
                    resp,
                    "Workspace unarchived",
                    vec![
                        Breadcrumb::new(
                            "show",
                            format!("recuerd0 workspace show {}", id),
                            "View workspace",
                        ),
                        Breadcrumb::new("list", "recuerd0 workspace list", "List workspaces"),
                    ],
                ))
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryHandler;

impl MemoryHandler {
    pub fn new() -> Self {
        Self
    }

    /// `workspace` is the resolved workspace ID; `stdin` backs `--content -`.
    pub async fn handle(
        &self,
        command: MemoryCommands,
        workspace: &str,
        api: &dyn Api,
        stdin: &mut (dyn Read + Send),
    ) -> crate::Result<Response> {
        let ws = workspace;
        match command {
            MemoryCommands::List { page } => {
                let resp = api.get(&endpoints::memories(ws, page)).await?;
                let summary = format!("{} memory(ies)", resp.item_count());

                Ok(paginated(
                    resp,
                    summary,
                    vec![
                        Breadcrumb::new(
                            "show",
                            format!("recuerd0 memory show --workspace {} <memory_id>", ws),
                            "View memory details",
                        ),
                        Breadcrumb::new(
                            "create",
                            format!(
                                "recuerd0 memory create --workspace {} --title TITLE --content CONTENT",
                                ws
                            ),
                            "Create a memory",
                        ),
                    ],
                ))
            }
            MemoryCommands::Show { id } => {
                let resp = api.get(&endpoints::memory(ws, &id)).await?;

                Ok(detail(
                    resp,
                    "Memory details",
                    vec![
                        Breadcrumb::new(
                            "update",
                            format!("recuerd0 memory update --workspace {} {} --title TITLE", ws, id),
                            "Update memory",
                        ),
                        Breadcrumb::new(
                            "version",
                            format!("recuerd0 memory version create --workspace {} {}", ws, id),
                            "Create a version",
                        ),
                        Breadcrumb::new(
                            "delete",
                            format!("recuerd0 memory delete --workspace {} {}", ws, id),
                            "Delete memory",
                        ),
                    ],
                ))
            }
            MemoryCommands::Create { fields } => {
                let memory = memory_body(fields, stdin)?;
                let body = json!({ "memory": memory });
                let resp = api.post(&endpoints::memories(ws, None), Some(&body)).await?;

                Ok(created(
                    resp,
                    "Memory created",
                    vec![
                        Breadcrumb::new(
                            "show",
                            format!("recuerd0 memory show --workspace {} <memory_id>", ws),
                            "View created memory",
                        ),
                        Breadcrumb::new(
                            "list",
                            format!("recuerd0 memory list --workspace {}", ws),
                            "List all memories",
                        ),
                    ],
                ))
            }
            MemoryCommands::Update { id, fields } => {
                let memory = memory_body(fields, stdin)?;
                if memory.is_empty() {
                    return Err(AppError::InvalidArguments(
                        "at least one field to update is required".to_string(),
                    ));
                }

                let body = json!({ "memory": memory });
                let resp = api.patch(&endpoints::memory(ws, &id), Some(&body)).await?;

                Ok(detail(
                    resp,
                    "Memory updated",
                    vec![Breadcrumb::new(
                        "show",
                        format!("recuerd0 memory show --workspace {} {}", ws, id),
                        "View updated memory",
                    )],
                ))
            }
            MemoryCommands::Delete { id } => {
                api.delete(&endpoints::memory(ws, &id)).await?;

                Ok(Response::success(json!({ "deleted": id }))
                    .summary(format!("Memory {} deleted", id))
                    .breadcrumbs(vec![Breadcrumb::new(
                        "list",
                        format!("recuerd0 memory list --workspace {}", ws),
                        "List remaining memories",
                    )])
                    .build())
            }
            MemoryCommands::Version {
                command: MemoryVersionCommands::Create { id, fields },
            } => {
                let version = memory_body(fields, stdin)?;
                let body = json!({ "version": version });
                let resp = api
                    .post(&endpoints::memory_versions(ws, &id), Some(&body))
                    .await?;

                Ok(created(
                    resp,
                    "Version created",
                    vec![
                        Breadcrumb::new(
                            "show",
                            format!("recuerd0 memory show --workspace {} {}", ws, id),
                            "View memory",
                        ),
                        Breadcrumb::new(
                            "list",
                            format!("recuerd0 memory list --workspace {}", ws),
                            "List memories",
                        ),
                    ],
                ))
            }
        }
    }
}

/// Only the fields that were given with a non-empty value end up in the body.
fn memory_body(fields: MemoryFields, stdin: &mut dyn Read) -> crate::Result<Map<String, Value>> {
    let content = resolve_content(fields.content, stdin)?;

    let mut memory = Map::new();
    insert_non_empty(&mut memory, "title", fields.title);
    insert_non_empty(&mut memory, "content", content);
    insert_non_empty(&mut memory, "source", fields.source);
    if let Some(tags) = fields.tags.filter(|t| !t.is_empty()) {
        memory.insert("tags".to_string(), json!(parse_tags(&tags)));
    }
    Ok(memory)
}

fn insert_non_empty(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(value));
    }
}

#[derive(Default)]
pub struct SearchHandler;

impl SearchHandler {
    pub fn new() -> Self {
        Self
    }

    /// Only an explicit `--workspace` scopes the search; configured
    /// workspaces are ignored.
    pub async fn handle(
        &self,
        query: &str,
        workspace: Option<&str>,
        page: Option<u32>,
        api: &dyn Api,
    ) -> crate::Result<Response> {
        if query.is_empty() {
            return Err(AppError::InvalidArguments(
                "search query is required".to_string(),
            ));
        }

        debug!("Searching for {:?} (workspace: {:?})", query, workspace);
        let resp = api.get(&endpoints::search(query, workspace, page)).await?;
        let summary = format!("{} result(s) for \"{}\"", resp.search_result_count(), query);

        Ok(paginated(
            resp,
            summary,
            vec![Breadcrumb::new(
                "show",
                "recuerd0 memory show --workspace <id> <memory_id>",
                "View memory details",
            )],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        method: &'static str,
        path: String,
        body: Option<Value>,
    }

    /// Records every call and answers with a canned response or status
    #[derive(Default)]
    struct MockApi {
        calls: Mutex<Vec<Call>>,
        response: ApiResponse,
        fail_status: Option<u16>,
    }

    impl MockApi {
        fn returning(data: Value) -> Self {
            Self {
                response: ApiResponse {
                    status: 200,
                    data: Some(data),
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Default::default()
            }
        }

        fn with_link_next(mut self, url: &str) -> Self {
            self.response.link_next = Some(url.to_string());
            self
        }

        fn with_location(mut self, location: &str) -> Self {
            self.response.location = Some(location.to_string());
            self
        }

        fn record(&self, method: &'static str, path: &str, body: Option<&Value>) -> crate::Result<ApiResponse> {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            match self.fail_status {
                Some(status) => Err(AppError::from_http_status(status, "mock failure")),
                None => Ok(self.response.clone()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn only_call(&self) -> Call {
            let calls = self.calls();
            assert_eq!(calls.len(), 1, "expected exactly one call: {:?}", calls);
            calls.into_iter().next().unwrap()
        }
    }

    #[async_trait]
    impl Api for MockApi {
        async fn get(&self, path: &str) -> crate::Result<ApiResponse> {
            self.record("GET", path, None)
        }

        async fn post(&self, path: &str, body: Option<&Value>) -> crate::Result<ApiResponse> {
            self.record("POST", path, body)
        }

        async fn patch(&self, path: &str, body: Option<&Value>) -> crate::Result<ApiResponse> {
            self.record("PATCH", path, body)
        }

        async fn delete(&self, path: &str) -> crate::Result<ApiResponse> {
            self.record("DELETE", path, None)
        }
    }

    fn to_json(response: &Response) -> Value {
        serde_json::to_value(response).unwrap()
    }

    fn no_stdin() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    fn config_service() -> (TempDir, ConfigService) {
        let dir = tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("config.yaml"), ConfigLayer::default(), None);
        (dir, service)
    }

    fn token_flags(token: &str, api_url: Option<&str>) -> ConfigLayer {
        ConfigLayer::new(
            None,
            Some(token.to_string()),
            api_url.map(str::to_string),
            None,
        )
    }

    #[test]
    fn test_version_response() {
        let value = to_json(&version_response());
        assert_eq!(value["data"]["cli"], json!("recuerd0"));
        assert_eq!(value["data"]["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_account_add_and_list() {
        let (_dir, service) = config_service();
        let handler = AccountHandler::new();

        let added = handler
            .handle(
                AccountCommands::Add { name: "work".to_string() },
                &service,
                &token_flags("tok-1", None),
            )
            .unwrap();
        let value = to_json(&added);
        assert_eq!(value["data"], json!({"name": "work", "api_url": DEFAULT_API_URL}));
        assert_eq!(value["summary"], json!("Account \"work\" added"));
        assert_eq!(value["breadcrumbs"][1]["cmd"], json!("recuerd0 account select work"));

        handler
            .handle(
                AccountCommands::Add { name: "alpha".to_string() },
                &service,
                &token_flags("tok-2", Some("http://localhost:3000")),
            )
            .unwrap();

        let listed = handler
            .handle(AccountCommands::List, &service, &ConfigLayer::default())
            .unwrap();
        let value = to_json(&listed);
        assert_eq!(
            value["data"],
            json!([
                {"name": "alpha", "api_url": "http://localhost:3000", "current": false},
                {"name": "work", "api_url": DEFAULT_API_URL, "current": true},
            ])
        );
        assert_eq!(value["summary"], json!("2 account(s)"));
    }

    #[test]
    fn test_account_add_requires_token() {
        let (_dir, service) = config_service();
        let err = AccountHandler::new()
            .handle(
                AccountCommands::Add { name: "work".to_string() },
                &service,
                &ConfigLayer::default(),
            )
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "--token is required");
        assert!(!service.config_path().exists());
    }

    #[test]
    fn test_account_add_rejects_bad_url() {
        let (_dir, service) = config_service();
        let err = AccountHandler::new()
            .handle(
                AccountCommands::Add { name: "work".to_string() },
                &service,
                &token_flags("tok", Some("localhost:3000")),
            )
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_account_select_and_remove() {
        let (_dir, service) = config_service();
        let handler = AccountHandler::new();
        for name in ["a", "b"] {
            handler
                .handle(
                    AccountCommands::Add { name: name.to_string() },
                    &service,
                    &token_flags("tok", None),
                )
                .unwrap();
        }

        let selected = handler
            .handle(AccountCommands::Select { name: "b".to_string() }, &service, &ConfigLayer::default())
            .unwrap();
        assert_eq!(to_json(&selected)["data"], json!({"current": "b"}));
        assert_eq!(service.load_global().unwrap().current, "b");

        let removed = handler
            .handle(AccountCommands::Remove { name: "a".to_string() }, &service, &ConfigLayer::default())
            .unwrap();
        assert_eq!(to_json(&removed)["data"], json!({"removed": "a"}));
        assert!(service.load_global().unwrap().get_account("a").is_none());
    }

    #[test]
    fn test_account_errors_are_general() {
        let (_dir, service) = config_service();
        let err = AccountHandler::new()
            .handle(AccountCommands::Select { name: "ghost".to_string() }, &service, &ConfigLayer::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "selecting account: account \"ghost\" not found");

        let err = AccountHandler::new()
            .handle(AccountCommands::Remove { name: "ghost".to_string() }, &service, &ConfigLayer::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("removing account:"));
    }

    #[tokio::test]
    async fn test_workspace_list_with_pagination() {
        let api = MockApi::returning(json!([{"id": 1}, {"id": 2}]))
            .with_link_next("https://recuerd0.ai/workspaces?page=3");

        let response = WorkspaceHandler::new()
            .handle(WorkspaceCommands::List { page: Some(2) }, &api)
            .await
            .unwrap();

        assert_eq!(
            api.only_call(),
            Call { method: "GET", path: "/workspaces?page=2".to_string(), body: None }
        );
        let value = to_json(&response);
        assert_eq!(value["summary"], json!("2 workspace(s)"));
        assert_eq!(value["pagination"]["has_next"], json!(true));
        assert_eq!(
            value["pagination"]["next_url"],
            json!("https://recuerd0.ai/workspaces?page=3")
        );
        assert_eq!(value["breadcrumbs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_workspace_list_last_page() {
        let api = MockApi::returning(json!([]));
        let response = WorkspaceHandler::new()
            .handle(WorkspaceCommands::List { page: None }, &api)
            .await
            .unwrap();
        let value = to_json(&response);
        assert_eq!(value["pagination"], json!({"has_next": false}));
        assert_eq!(value["summary"], json!("0 workspace(s)"));
    }

    #[tokio::test]
    async fn test_workspace_show_breadcrumbs() {
        let api = MockApi::returning(json!({"id": 5, "name": "notes"}));
        let response = WorkspaceHandler::new()
            .handle(WorkspaceCommands::Show { id: "5".to_string() }, &api)
            .await
            .unwrap();

        assert_eq!(api.only_call().path, "/workspaces/5");
        let value = to_json(&response);
        let actions: Vec<&str> = value["breadcrumbs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["action"].as_str().unwrap())
            .collect();
        assert_eq!(actions, vec!["list-memories", "update", "archive"]);
        assert_eq!(value["summary"], json!("Workspace details"));
    }

    #[tokio::test]
    async fn test_workspace_create() {
        let api = MockApi::returning(json!({"id": 7})).with_location("/workspaces/7");
        let response = WorkspaceHandler::new()
            .handle(
                WorkspaceCommands::Create {
                    name: Some("notes".to_string()),
                    description: None,
                },
                &api,
            )
            .await
            .unwrap();

        let call = api.only_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/workspaces");
        assert_eq!(
            call.body,
            Some(json!({"workspace": {"name": "notes", "description": ""}}))
        );
        assert_eq!(response.location(), Some("/workspaces/7"));
    }

    #[tokio::test]
    async fn test_location_only_on_create() {
        let api = MockApi::returning(json!({"id": 5})).with_location("/workspaces/5");
        let handler = WorkspaceHandler::new();

        let shown = handler
            .handle(WorkspaceCommands::Show { id: "5".to_string() }, &api)
            .await
            .unwrap();
        assert_eq!(shown.location(), None);

        let archived = handler
            .handle(WorkspaceCommands::Archive { id: "5".to_string() }, &api)
            .await
            .unwrap();
        assert_eq!(archived.location(), None);

        let version = MemoryHandler::new()
            .handle(
                MemoryCommands::Version {
                    command: MemoryVersionCommands::Create {
                        id: "10".to_string(),
                        fields: MemoryFields {
                            title: Some("v2".to_string()),
                            ..Default::default()
                        },
                    },
                },
                "5",
                &api,
                &mut no_stdin(),
            )
            .await
            .unwrap();
        assert_eq!(version.location(), Some("/workspaces/5"));
    }

    #[tokio::test]
    async fn test_workspace_create_requires_name() {
        let api = MockApi::default();
        let err = WorkspaceHandler::new()
            .handle(WorkspaceCommands::Create { name: None, description: None }, &api)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "--name is required");
        assert_eq!(err.exit_code(), 2);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_workspace_update() {
        let api = MockApi::returning(json!({"id": 5}));
        WorkspaceHandler::new()
            .handle(
                WorkspaceCommands::Update {
                    id: "5".to_string(),
                    name: None,
                    description: Some("new".to_string()),
                },
                &api,
            )
            .await
            .unwrap();

        let call = api.only_call();
        assert_eq!(call.method, "PATCH");
        assert_eq!(call.body, Some(json!({"workspace": {"description": "new"}})));
    }

    #[tokio::test]
    async fn test_workspace_update_requires_a_field() {
        let api = MockApi::default();
        let err = WorkspaceHandler::new()
            .handle(
                WorkspaceCommands::Update {
                    id: "5".to_string(),
                    name: Some(String::new()),
                    description: None,
                },
                &api,
            )
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_workspace_archive_and_unarchive() {
        let api = MockApi::returning(json!({"id": 5, "archived": true}));
        let handler = WorkspaceHandler::new();
        handler
            .handle(WorkspaceCommands::Archive { id: "5".to_string() }, &api)
            .await
            .unwrap();
        handler
            .handle(WorkspaceCommands::Unarchive { id: "5".to_string() }, &api)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call {
                    method: "PATCH",
                    path: "/api/v1/workspaces/5/archive".to_string(),
                    body: None
                },
                Call {
                    method: "PATCH",
                    path: "/api/v1/workspaces/5/unarchive".to_string(),
                    body: None
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let api = MockApi::failing(404);
        let err = WorkspaceHandler::new()
            .handle(WorkspaceCommands::Show { id: "404".to_string() }, &api)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_memory_list() {
        let api = MockApi::returning(json!([{"id": 1}]));
        let response = MemoryHandler::new()
            .handle(MemoryCommands::List { page: None }, "5", &api, &mut no_stdin())
            .await
            .unwrap();

        assert_eq!(api.only_call().path, "/api/v1/workspaces/5/memories");
        let value = to_json(&response);
        assert_eq!(value["summary"], json!("1 memory(ies)"));
        assert_eq!(
            value["breadcrumbs"][0]["cmd"],
            json!("recuerd0 memory show --workspace 5 <memory_id>")
        );
    }

    #[tokio::test]
    async fn test_memory_create_only_sends_given_fields() {
        let api = MockApi::returning(json!({"id": 10}));
        let fields = MemoryFields {
            title: Some("Notes".to_string()),
            tags: Some("go, cli,".to_string()),
            ..Default::default()
        };
        MemoryHandler::new()
            .handle(MemoryCommands::Create { fields }, "5", &api, &mut no_stdin())
            .await
            .unwrap();

        let call = api.only_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/api/v1/workspaces/5/memories");
        assert_eq!(
            call.body,
            Some(json!({"memory": {"title": "Notes", "tags": ["go", "cli"]}}))
        );
    }

    #[tokio::test]
    async fn test_memory_create_reads_stdin() {
        let api = MockApi::returning(json!({"id": 10}));
        let fields = MemoryFields {
            content: Some("-".to_string()),
            ..Default::default()
        };
        let mut stdin = Cursor::new(b"from stdin".to_vec());
        MemoryHandler::new()
            .handle(MemoryCommands::Create { fields }, "5", &api, &mut stdin)
            .await
            .unwrap();

        assert_eq!(
            api.only_call().body,
            Some(json!({"memory": {"content": "from stdin"}}))
        );
    }

    #[tokio::test]
    async fn test_memory_update_requires_a_field() {
        let api = MockApi::default();
        let err = MemoryHandler::new()
            .handle(
                MemoryCommands::Update {
                    id: "10".to_string(),
                    fields: MemoryFields::default(),
                },
                "5",
                &api,
                &mut no_stdin(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "at least one field to update is required");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_memory_update() {
        let api = MockApi::returning(json!({"id": 10}));
        let fields = MemoryFields {
            source: Some("manual".to_string()),
            ..Default::default()
        };
        MemoryHandler::new()
            .handle(
                MemoryCommands::Update { id: "10".to_string(), fields },
                "5",
                &api,
                &mut no_stdin(),
            )
            .await
            .unwrap();

        let call = api.only_call();
        assert_eq!(call.method, "PATCH");
        assert_eq!(call.path, "/api/v1/workspaces/5/memories/10");
        assert_eq!(call.body, Some(json!({"memory": {"source": "manual"}})));
    }

    #[tokio::test]
    async fn test_memory_delete() {
        let api = MockApi::default();
        let response = MemoryHandler::new()
            .handle(MemoryCommands::Delete { id: "10".to_string() }, "5", &api, &mut no_stdin())
            .await
            .unwrap();

        assert_eq!(api.only_call().method, "DELETE");
        let value = to_json(&response);
        assert_eq!(value["data"], json!({"deleted": "10"}));
        assert_eq!(value["summary"], json!("Memory 10 deleted"));
    }

    #[tokio::test]
    async fn test_memory_version_create() {
        let api = MockApi::returning(json!({"id": 11, "version": 2}));
        let fields = MemoryFields {
            content: Some("v2".to_string()),
            ..Default::default()
        };
        let response = MemoryHandler::new()
            .handle(
                MemoryCommands::Version {
                    command: MemoryVersionCommands::Create { id: "10".to_string(), fields },
                },
                "5",
                &api,
                &mut no_stdin(),
            )
            .await
            .unwrap();

        let call = api.only_call();
        assert_eq!(call.path, "/api/v1/workspaces/5/memories/10/versions");
        assert_eq!(call.body, Some(json!({"version": {"content": "v2"}})));
        assert_eq!(response.summary(), Some("Version created"));
    }

    #[tokio::test]
    async fn test_search_total_results() {
        let api = MockApi::returning(json!({"total_results": 12, "results": [{"id": 1}]}));
        let response = SearchHandler::new()
            .handle("rust patterns", Some("5"), None, &api)
            .await
            .unwrap();

        assert_eq!(api.only_call().path, "/search?q=rust+patterns&workspace_id=5");
        assert_eq!(response.summary(), Some("12 result(s) for \"rust patterns\""));
    }

    #[tokio::test]
    async fn test_search_counts_results_array() {
        let api = MockApi::returning(json!({"results": [{"id": 1}, {"id": 2}]}));
        let response = SearchHandler::new()
            .handle("go", None, Some(2), &api)
            .await
            .unwrap();

        assert_eq!(api.only_call().path, "/search?q=go&page=2");
        assert_eq!(response.summary(), Some("2 result(s) for \"go\""));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let api = MockApi::default();
        let err = SearchHandler::new()
            .handle("", None, None, &api)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(api.calls().is_empty());
    }
}
