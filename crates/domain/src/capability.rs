use serde::{Deserialize, Serialize};

/// How a provider expects conversation roles to be laid out.
///
/// Used when shaping an assembled turn list for a specific upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConventions {
    /// The provider accepts a distinct `system` role. When false the system
    /// prompt is folded into the first user turn.
    #[serde(default = "d_true")]
    pub system_role: bool,
    /// The provider rejects two consecutive turns with the same role.
    #[serde(default = "d_true")]
    pub strict_alternation: bool,
}

impl Default for RoleConventions {
    fn default() -> Self {
        Self {
            system_role: true,
            strict_alternation: true,
        }
    }
}

/// LLM model capabilities advertised by a provider adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmCapabilities {
    /// `response_format: json_object` is honoured.
    pub supports_json_mode: bool,
    pub roles: RoleConventions,
}

fn d_true() -> bool {
    true
}
