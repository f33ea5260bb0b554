//! Application profile models

use serde::Deserialize;

/// Application profile as listed by `getapplist.do`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Application {
    /// Application ID
    #[serde(rename = "@app_id")]
    pub id: String,

    /// Application name
    #[serde(rename = "@app_name")]
    pub name: String,
}

/// `<applist>` response document
#[derive(Debug, Clone, Deserialize)]
pub struct AppList {
    #[serde(rename = "app", default)]
    pub apps: Vec<Application>,
}
