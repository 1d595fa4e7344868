use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the authenticated-route guard treats admins.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatedPolicy {
    /// Any authenticated session may render any protected route.
    #[default]
    RenderAll,
    /// Admins are relocated to the admin dashboard from every other protected route.
    RelocateAdmins,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct GuardsConfig {
    #[serde(default)]
    pub authenticated_policy: AuthenticatedPolicy,
}
