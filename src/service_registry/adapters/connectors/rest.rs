//! Connectors for SaaS APIs that verify credentials with one HTTP call.

use super::catalog::{self, CatalogEntry, ToolParam, ToolSpec};
use super::http::{ApiError, ApiSession, AuthScheme, BodyEncoding, HttpVerb};
use super::session::SessionSlot;
use crate::service_registry::domain::{
    CredentialSet, ServiceDescriptor, ServiceKind, ToolCallError, ToolDefinition,
};
use crate::service_registry::ports::{Connector, ConnectorError, ConnectorResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Descriptor configuration key overriding a connector's API base URL.
pub const API_URL_FIELD: &str = "apiUrl";

/// Tool backed by one HTTP request.
#[derive(Debug, Clone, Copy)]
struct RestTool {
    spec: ToolSpec,
    verb: HttpVerb,
    path: &'static str,
}

impl RestTool {
    const fn get(spec: ToolSpec, path: &'static str) -> Self {
        Self {
            spec,
            verb: HttpVerb::Get,
            path,
        }
    }

    const fn post(spec: ToolSpec, path: &'static str) -> Self {
        Self {
            spec,
            verb: HttpVerb::Post,
            path,
        }
    }
}

impl CatalogEntry for RestTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }
}

/// Local format check applied before the network call.
#[derive(Debug, Clone, Copy)]
enum KeyRule {
    Present,
    Prefix(&'static str),
}

impl KeyRule {
    fn check(self, kind: ServiceKind, key: &str) -> Result<(), String> {
        match self {
            Self::Present => Ok(()),
            Self::Prefix(prefix) if key.starts_with(prefix) => Ok(()),
            Self::Prefix(prefix) => Err(format!(
                "invalid key format: {} secret keys start with {prefix}",
                kind.display_name()
            )),
        }
    }
}

/// Static wiring of one REST-backed service family.
#[derive(Debug)]
struct RestProfile {
    kind: ServiceKind,
    base_url: &'static str,
    check_path: &'static str,
    scheme: AuthScheme,
    encoding: BodyEncoding,
    key_rule: KeyRule,
    tools: &'static [RestTool],
}

const OWNER: ToolParam = ToolParam::required("owner");
const REPO: ToolParam = ToolParam::required("repo");

const GITHUB: RestProfile = RestProfile {
    kind: ServiceKind::GitHub,
    base_url: "https://api.github.com",
    check_path: "user",
    scheme: AuthScheme::Token,
    encoding: BodyEncoding::Json,
    key_rule: KeyRule::Present,
    tools: &[
        RestTool::get(
            ToolSpec::new(
                "list_github_repositories",
                "List repositories of the authenticated user",
                &[
                    ToolParam::optional("sort"),
                    ToolParam::optional("per_page").integer(),
                ],
            ),
            "user/repos",
        ),
        RestTool::get(
            ToolSpec::new("get_repository", "Get details about a repository", &[OWNER, REPO]),
            "repos/{owner}/{repo}",
        ),
        RestTool::get(
            ToolSpec::new(
                "list_pull_requests",
                "List pull requests of a repository",
                &[OWNER, REPO, ToolParam::optional("state")],
            ),
            "repos/{owner}/{repo}/pulls",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_pull_request",
                "Open a pull request",
                &[
                    OWNER,
                    REPO,
                    ToolParam::required("title"),
                    ToolParam::required("head"),
                    ToolParam::required("base"),
                    ToolParam::optional("body"),
                ],
            ),
            "repos/{owner}/{repo}/pulls",
        ),
        RestTool::get(
            ToolSpec::new(
                "list_issues",
                "List issues of a repository",
                &[OWNER, REPO, ToolParam::optional("state")],
            ),
            "repos/{owner}/{repo}/issues",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_issue",
                "Open an issue",
                &[
                    OWNER,
                    REPO,
                    ToolParam::required("title"),
                    ToolParam::optional("body"),
                ],
            ),
            "repos/{owner}/{repo}/issues",
        ),
    ],
};

const STRIPE: RestProfile = RestProfile {
    kind: ServiceKind::Stripe,
    base_url: "https://api.stripe.com/v1",
    check_path: "account",
    scheme: AuthScheme::BasicKey,
    encoding: BodyEncoding::Form,
    key_rule: KeyRule::Prefix("sk_"),
    tools: &[
        RestTool::get(
            ToolSpec::new(
                "list_customers",
                "List customers",
                &[
                    ToolParam::optional("limit").integer(),
                    ToolParam::optional("email"),
                ],
            ),
            "customers",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_customer",
                "Create a customer",
                &[
                    ToolParam::optional("email"),
                    ToolParam::optional("name"),
                    ToolParam::optional("description"),
                ],
            ),
            "customers",
        ),
        RestTool::get(
            ToolSpec::new(
                "get_customer",
                "Retrieve a customer",
                &[ToolParam::required("customer_id")],
            ),
            "customers/{customer_id}",
        ),
        RestTool::get(
            ToolSpec::new(
                "list_charges",
                "List charges",
                &[
                    ToolParam::optional("limit").integer(),
                    ToolParam::optional("customer"),
                ],
            ),
            "charges",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_charge",
                "Create a charge",
                &[
                    ToolParam::required("amount").integer(),
                    ToolParam::required("currency"),
                    ToolParam::optional("customer"),
                    ToolParam::optional("source"),
                    ToolParam::optional("description"),
                ],
            ),
            "charges",
        ),
        RestTool::get(
            ToolSpec::new(
                "list_products",
                "List products",
                &[
                    ToolParam::optional("limit").integer(),
                    ToolParam::optional("active"),
                ],
            ),
            "products",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_product",
                "Create a product",
                &[
                    ToolParam::required("name"),
                    ToolParam::optional("description"),
                ],
            ),
            "products",
        ),
    ],
};

const LEMONSQUEEZY: RestProfile = RestProfile {
    kind: ServiceKind::LemonSqueezy,
    base_url: "https://api.lemonsqueezy.com/v1",
    check_path: "users/me",
    scheme: AuthScheme::Bearer,
    encoding: BodyEncoding::Json,
    key_rule: KeyRule::Present,
    tools: &[
        RestTool::get(ToolSpec::new("list_products", "List products", &[]), "products"),
        RestTool::get(
            ToolSpec::new(
                "get_product",
                "Retrieve a product",
                &[ToolParam::required("product_id")],
            ),
            "products/{product_id}",
        ),
        RestTool::get(ToolSpec::new("list_orders", "List orders", &[]), "orders"),
        RestTool::get(
            ToolSpec::new(
                "get_order",
                "Retrieve an order",
                &[ToolParam::required("order_id")],
            ),
            "orders/{order_id}",
        ),
        RestTool::get(ToolSpec::new("list_customers", "List customers", &[]), "customers"),
        RestTool::get(
            ToolSpec::new(
                "get_customer",
                "Retrieve a customer",
                &[ToolParam::required("customer_id")],
            ),
            "customers/{customer_id}",
        ),
        RestTool::post(
            ToolSpec::new(
                "create_checkout",
                "Create a checkout",
                &[ToolParam::required("data").object()],
            ),
            "checkouts",
        ),
    ],
};

const CONTEXT7: RestProfile = RestProfile {
    kind: ServiceKind::Context7,
    base_url: "https://api.context7.dev/v1",
    check_path: "health",
    scheme: AuthScheme::Bearer,
    encoding: BodyEncoding::Json,
    key_rule: KeyRule::Present,
    tools: &[
        RestTool::get(
            ToolSpec::new(
                "search_documentation",
                "Search library documentation",
                &[ToolParam::required("q")],
            ),
            "search",
        ),
        RestTool::get(
            ToolSpec::new(
                "get_latest_documentation",
                "Fetch the latest documentation for a topic",
                &[ToolParam::required("topic")],
            ),
            "docs/latest/{topic}",
        ),
        RestTool::get(
            ToolSpec::new(
                "get_version_documentation",
                "Fetch documentation for a specific version",
                &[ToolParam::required("topic"), ToolParam::required("version")],
            ),
            "docs/{topic}/{version}",
        ),
    ],
};

const FIRECRAWL: RestProfile = RestProfile {
    kind: ServiceKind::Firecrawl,
    base_url: "https://api.firecrawl.dev/v1",
    check_path: "account",
    scheme: AuthScheme::Bearer,
    encoding: BodyEncoding::Json,
    key_rule: KeyRule::Present,
    tools: &[
        RestTool::post(
            ToolSpec::new(
                "scrape_webpage",
                "Scrape one page",
                &[ToolParam::required("url")],
            ),
            "scrape",
        ),
        RestTool::post(
            ToolSpec::new(
                "extract_structured_data",
                "Extract structured data from a page",
                &[ToolParam::required("url"), ToolParam::required("schema")],
            ),
            "extract",
        ),
        RestTool::post(
            ToolSpec::new(
                "search_web",
                "Search the web",
                &[
                    ToolParam::required("query"),
                    ToolParam::optional("limit").integer(),
                ],
            ),
            "search",
        ),
        RestTool::post(
            ToolSpec::new(
                "crawl_website",
                "Crawl a site from a start URL",
                &[
                    ToolParam::required("url"),
                    ToolParam::optional("maxDepth").integer(),
                ],
            ),
            "crawl",
        ),
    ],
};

/// Connector for a REST API verified by one authenticated `GET`.
#[derive(Debug)]
pub struct RestConnector {
    profile: &'static RestProfile,
    base_url: String,
    timeout: Duration,
    session: SessionSlot<ApiSession>,
}

impl RestConnector {
    /// Returns whether `kind` is served by this connector.
    #[must_use]
    pub const fn supports(kind: ServiceKind) -> bool {
        Self::profile_for(kind).is_some()
    }

    /// Builds a connector for `descriptor`, honouring an `apiUrl` override.
    /// Returns `None` for kinds without a REST profile.
    #[must_use]
    pub fn for_descriptor(descriptor: &ServiceDescriptor, timeout: Duration) -> Option<Self> {
        let profile = Self::profile_for(descriptor.kind())?;
        let base_url = descriptor
            .config()
            .get_str(API_URL_FIELD)
            .unwrap_or(profile.base_url)
            .to_owned();
        Some(Self {
            profile,
            base_url,
            timeout,
            session: SessionSlot::default(),
        })
    }

    const fn profile_for(kind: ServiceKind) -> Option<&'static RestProfile> {
        match kind {
            ServiceKind::GitHub => Some(&GITHUB),
            ServiceKind::Stripe => Some(&STRIPE),
            ServiceKind::LemonSqueezy => Some(&LEMONSQUEEZY),
            ServiceKind::Context7 => Some(&CONTEXT7),
            ServiceKind::Firecrawl => Some(&FIRECRAWL),
            _ => None,
        }
    }

    fn map_check_error(&self, err: ApiError) -> ConnectorError {
        match err {
            ApiError::Status { status, message } => {
                ConnectorError::check_failed(self.profile.kind, format!("HTTP {status}: {message}"))
            }
            ApiError::InvalidBaseUrl(url) => ConnectorError::invalid_credentials(
                self.profile.kind,
                format!("invalid API URL '{url}'"),
            ),
            other => ConnectorError::transport(other),
        }
    }
}

#[async_trait]
impl Connector for RestConnector {
    fn kind(&self) -> ServiceKind {
        self.profile.kind
    }

    async fn connect(&self, credentials: &CredentialSet) -> ConnectorResult<()> {
        self.session.clear();
        let kind = self.profile.kind;
        let secret = credentials.secret_for(kind).ok_or_else(|| {
            ConnectorError::invalid_credentials(
                kind,
                format!("{} is required", kind.credential_field()),
            )
        })?;
        self.profile
            .key_rule
            .check(kind, secret)
            .map_err(|reason| ConnectorError::invalid_credentials(kind, reason))?;

        let session = ApiSession::new(
            &self.base_url,
            self.profile.scheme,
            secret,
            self.profile.encoding,
            self.timeout,
        )
        .map_err(|err| self.map_check_error(err))?;
        session
            .verify(self.profile.check_path)
            .await
            .map_err(|err| self.map_check_error(err))?;

        debug!(kind = %kind, base_url = %self.base_url, "credential check passed");
        self.session.set(session);
        Ok(())
    }

    async fn disconnect(&self) {
        self.session.clear();
    }

    fn is_connected(&self) -> bool {
        self.session.is_set()
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        catalog::definitions(self.profile.tools)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolCallError> {
        let tool = catalog::find(self.profile.tools, name)?;
        let session = self
            .session
            .get()
            .ok_or(ToolCallError::NotConnected(self.profile.kind))?;
        let mut params = tool.spec.accept(arguments)?;
        let url = session
            .endpoint(tool.path, &mut params)
            .map_err(|err| ToolCallError::InvalidParams(err.to_string()))?;
        session
            .send(tool.verb, url, &params)
            .await
            .map_err(ToolCallError::internal)
    }
}
