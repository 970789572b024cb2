//! Closed enumeration of the external service families DevHub can connect to.

use super::ParseServiceKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration key holding an API key.
pub const API_KEY_FIELD: &str = "apiKey";

/// Service family tag routing a descriptor to its connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// GitHub REST API.
    #[serde(rename = "github")]
    GitHub,
    /// MongoDB deployment.
    #[serde(rename = "mongodb")]
    MongoDb,
    /// Stripe payments API.
    Stripe,
    /// LemonSqueezy storefront API.
    #[serde(rename = "lemonsqueezy")]
    LemonSqueezy,
    /// Generic OAuth helper.
    Auth,
    /// Context 7 documentation search.
    #[serde(rename = "context7")]
    Context7,
    /// Sequential thinking helper.
    SequentialThinking,
    /// Firecrawl web scraping API.
    Firecrawl,
    /// Local file system rooted at a directory.
    #[serde(rename = "filesystem")]
    FileSystem,
    /// Browser diagnostics tools.
    Browser,
    /// Figma design API.
    Figma,
    /// Supabase project API.
    Supabase,
    /// Vercel deployments API.
    Vercel,
    /// Sentry error tracking API.
    Sentry,
    /// Taskmaster project tracking.
    Taskmaster,
    /// Desktop Commander process tools.
    DesktopCommander,
    /// 21st.dev component library.
    #[serde(rename = "dev21", alias = "21st-dev")]
    Dev21,
}

impl ServiceKind {
    /// Every known service kind, in bootstrap order.
    pub const ALL: [Self; 17] = [
        Self::GitHub,
        Self::MongoDb,
        Self::Auth,
        Self::Stripe,
        Self::LemonSqueezy,
        Self::Context7,
        Self::SequentialThinking,
        Self::Firecrawl,
        Self::FileSystem,
        Self::Browser,
        Self::Figma,
        Self::Supabase,
        Self::Vercel,
        Self::Sentry,
        Self::Taskmaster,
        Self::DesktopCommander,
        Self::Dev21,
    ];

    /// Returns the canonical wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::MongoDb => "mongodb",
            Self::Stripe => "stripe",
            Self::LemonSqueezy => "lemonsqueezy",
            Self::Auth => "auth",
            Self::Context7 => "context7",
            Self::SequentialThinking => "sequential-thinking",
            Self::Firecrawl => "firecrawl",
            Self::FileSystem => "filesystem",
            Self::Browser => "browser",
            Self::Figma => "figma",
            Self::Supabase => "supabase",
            Self::Vercel => "vercel",
            Self::Sentry => "sentry",
            Self::Taskmaster => "taskmaster",
            Self::DesktopCommander => "desktop-commander",
            Self::Dev21 => "dev21",
        }
    }

    /// Returns the display name used by the bootstrap catalog.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::MongoDb => "MongoDB",
            Self::Stripe => "Stripe",
            Self::LemonSqueezy => "LemonSqueezy",
            Self::Auth => "Authentication",
            Self::Context7 => "Context 7",
            Self::SequentialThinking => "Sequential Thinking",
            Self::Firecrawl => "Firecrawl",
            Self::FileSystem => "File System",
            Self::Browser => "Browser Tools",
            Self::Figma => "Figma",
            Self::Supabase => "Supabase",
            Self::Vercel => "Vercel",
            Self::Sentry => "Sentry",
            Self::Taskmaster => "Taskmaster",
            Self::DesktopCommander => "Desktop Commander",
            Self::Dev21 => "21st.dev",
        }
    }

    /// Returns the configuration key of the primary credential.
    ///
    /// A connect attempt whose primary credential is blank is treated as a
    /// declined prompt.
    #[must_use]
    pub const fn credential_field(self) -> &'static str {
        match self {
            Self::GitHub => "token",
            Self::MongoDb => "connectionString",
            Self::FileSystem => "rootPath",
            _ => API_KEY_FIELD,
        }
    }

    /// Returns `(config key, environment variable)` pairs consumed by the
    /// standalone MCP server for this kind. The primary credential comes first.
    #[must_use]
    pub const fn environment_bindings(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::GitHub => &[("token", "GITHUB_TOKEN")],
            Self::MongoDb => &[
                ("connectionString", "MONGODB_CONNECTION_STRING"),
                ("database", "MONGODB_DATABASE"),
            ],
            Self::Stripe => &[(API_KEY_FIELD, "STRIPE_API_KEY")],
            Self::LemonSqueezy => &[(API_KEY_FIELD, "LEMONSQUEEZY_API_KEY")],
            Self::Auth => &[(API_KEY_FIELD, "AUTH_API_KEY")],
            Self::Context7 => &[(API_KEY_FIELD, "CONTEXT7_API_KEY")],
            Self::SequentialThinking => &[(API_KEY_FIELD, "SEQUENTIAL_THINKING_API_KEY")],
            Self::Firecrawl => &[(API_KEY_FIELD, "FIRECRAWL_API_KEY")],
            Self::FileSystem => &[("rootPath", "FILESYSTEM_ROOT_PATH")],
            Self::Browser => &[(API_KEY_FIELD, "BROWSER_API_KEY")],
            Self::Figma => &[(API_KEY_FIELD, "FIGMA_API_KEY")],
            Self::Supabase => &[
                (API_KEY_FIELD, "SUPABASE_API_KEY"),
                ("projectUrl", "SUPABASE_PROJECT_URL"),
            ],
            Self::Vercel => &[(API_KEY_FIELD, "VERCEL_API_KEY")],
            Self::Sentry => &[
                (API_KEY_FIELD, "SENTRY_API_KEY"),
                ("organizationSlug", "SENTRY_ORGANIZATION_SLUG"),
            ],
            Self::Taskmaster => &[(API_KEY_FIELD, "TASKMASTER_API_KEY")],
            Self::DesktopCommander => &[(API_KEY_FIELD, "DESKTOP_COMMANDER_API_KEY")],
            Self::Dev21 => &[(API_KEY_FIELD, "DEV21_API_KEY")],
        }
    }

    /// Returns the directory name of the standalone MCP server bundle.
    #[must_use]
    pub const fn server_directory(self) -> &'static str {
        match self {
            Self::Dev21 => "21st-dev",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceKind {
    type Error = ParseServiceKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "21st-dev" {
            return Ok(Self::Dev21);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseServiceKindError(value.to_owned()))
    }
}
