use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AccountConfig {
    /// Account backends are wired up; off in static-export builds
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Emails allowed to use the admin progress tools
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            admin_emails: vec![],
        }
    }
}

impl AccountConfig {
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}
