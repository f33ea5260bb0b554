//! Sandbox models

use serde::Deserialize;

/// Sandbox scoped to an application profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sandbox {
    /// Sandbox ID
    #[serde(rename = "@sandbox_id")]
    pub id: String,

    /// Sandbox name
    #[serde(rename = "@sandbox_name")]
    pub name: String,
}

/// `<sandboxlist>` response document
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxList {
    #[serde(rename = "sandbox", default)]
    pub sandboxes: Vec<Sandbox>,
}

/// `<sandboxinfo>` response document returned by `createsandbox.do`
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxInfo {
    pub sandbox: Sandbox,
}
