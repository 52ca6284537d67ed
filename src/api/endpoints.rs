//! Upstream resource paths
//!
//! The upstream serves workspace CRUD and search at the root and the
//! memory, version and archive routes under `/api/v1`. The prefixes are not
//! interchangeable, so each route is spelled out here once.

use url::form_urlencoded;

const API_V1: &str = "/api/v1";

pub fn workspaces(page: Option<u32>) -> String {
    with_page("/workspaces".to_string(), page)
}

pub fn workspace(id: &str) -> String {
    format!("/workspaces/{}", id)
}

pub fn workspace_archive(id: &str) -> String {
    format!("{}/workspaces/{}/archive", API_V1, id)
}

pub fn workspace_unarchive(id: &str) -> String {
    format!("{}/workspaces/{}/unarchive", API_V1, id)
}

pub fn memories(workspace: &str, page: Option<u32>) -> String {
    with_page(format!("{}/workspaces/{}/memories", API_V1, workspace), page)
}

pub fn memory(workspace: &str, id: &str) -> String {
    format!("{}/workspaces/{}/memories/{}", API_V1, workspace, id)
}

pub fn memory_versions(workspace: &str, id: &str) -> String {
    format!("{}/versions", memory(workspace, id))
}

pub fn search(query: &str, workspace: Option<&str>, page: Option<u32>) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("q", query);
    if let Some(workspace) = workspace {
        params.append_pair("workspace_id", workspace);
    }
    if let Some(page) = page {
        params.append_pair("page", &page.to_string());
    }
    format!("/search?{}", params.finish())
}

fn with_page(path: String, page: Option<u32>) -> String {
    match page {
        Some(page) => format!("{}?page={}", path, page),
        None => path,
    }
}
