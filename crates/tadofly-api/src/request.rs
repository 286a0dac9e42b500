// Request model and URL construction.
//
// An `ApiRequest` describes one logical API call independent of transport:
// which base endpoint, which resource domain, the logical action, and an
// optional payload. `build_url` is a pure function from a descriptor plus
// session identifiers to a fully qualified URL, so it is unit-testable
// without any network machinery.

use reqwest::Method;
use url::Url;
use url::form_urlencoded;

use crate::error::Error;

// ── Base endpoints ───────────────────────────────────────────────────

/// The fixed set of backend base endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Primary API (`my.tado.com/api/v2/`), pre-LINE_X homes.
    #[default]
    MyApi,
    /// New-generation API (`hops.tado.com/`), LINE_X homes.
    HopsApi,
    /// Mobile legacy API (`my.tado.com/mobile/1.9/`).
    Mobile,
    /// Energy insights API.
    Eiq,
    /// Tariff experience API.
    Tariff,
    /// Generic v2 API.
    Genie,
    /// Minder API.
    Minder,
}

/// Resolved base URLs for every endpoint, plus the OAuth2 authority.
///
/// Defaults to production. Overridable so tests (wiremock) and
/// self-hosted proxies can point the whole core somewhere else — every
/// base must end with a trailing slash because URLs are built by
/// concatenation, exactly like the backend expects.
#[derive(Debug, Clone)]
pub struct EndpointUrls {
    pub my_api: String,
    pub hops_api: String,
    pub mobile: String,
    pub eiq: String,
    pub tariff: String,
    pub genie: String,
    pub minder: String,
    /// OAuth2 base; `token` and `device_authorize` are joined onto it.
    pub auth: String,
}

impl Default for EndpointUrls {
    fn default() -> Self {
        Self {
            my_api: "https://my.tado.com/api/v2/".into(),
            hops_api: "https://hops.tado.com/".into(),
            mobile: "https://my.tado.com/mobile/1.9/".into(),
            eiq: "https://energy-insights.tado.com/api/".into(),
            tariff: "https://tariff-experience.tado.com/api/".into(),
            genie: "https://genie.tado.com/api/v2/".into(),
            minder: "https://minder.tado.com/v1/".into(),
            auth: "https://login.tado.com/oauth2/".into(),
        }
    }
}

impl EndpointUrls {
    /// The base URL for a given endpoint.
    pub fn base(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::MyApi => &self.my_api,
            Endpoint::HopsApi => &self.hops_api,
            Endpoint::Mobile => &self.mobile,
            Endpoint::Eiq => &self.eiq,
            Endpoint::Tariff => &self.tariff,
            Endpoint::Genie => &self.genie,
            Endpoint::Minder => &self.minder,
        }
    }

    /// The OAuth2 token endpoint (both grant types).
    pub fn token_url(&self) -> String {
        format!("{}token", self.auth)
    }

    /// The OAuth2 device-authorization endpoint.
    pub fn device_authorize_url(&self) -> String {
        format!("{}device_authorize", self.auth)
    }
}

// ── Request descriptor ───────────────────────────────────────────────

/// API resource domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    /// Home-scoped resources (`homes/{home_id}/...`).
    #[default]
    Home,
    /// Device-scoped resources (`devices/{device_id}/...`).
    Devices,
    /// The authenticated user (`me`).
    Me,
    /// Bridge-scoped home resources (`homeByBridge/{bridge_id}/...`).
    HomeByBridge,
}

impl Domain {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Home => "homes",
            Self::Devices => "devices",
            Self::Me => "me",
            Self::HomeByBridge => "homeByBridge",
        }
    }
}

/// Logical request action, translated to a transport verb per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Get,
    Set,
    Reset,
    Change,
}

/// Payload encoding mode.
///
/// `Plain` sends `Content-Type: text/plain;charset=UTF-8` while the body
/// is still JSON-encoded bytes — a backend quirk some endpoints depend
/// on (schedule timetables, open-window activation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Object,
    Plain,
}

/// Backend dialect: which generation of the API a request addresses.
///
/// The two dialects share transport mechanics but translate the logical
/// `Change` action differently, so the tag rides along on each request
/// descriptor rather than living in a subclass override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generation {
    /// Pre-LINE_X homes (`my.tado.com`).
    #[default]
    PreLineX,
    /// LINE_X homes (`hops.tado.com`).
    LineX,
}

/// Descriptor for one logical API call.
///
/// Created fresh per call, consumed once by the dispatcher, never
/// mutated after being handed over.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub command: Option<String>,
    pub action: Action,
    pub payload: Option<serde_json::Value>,
    pub domain: Domain,
    pub device: Option<String>,
    pub mode: Mode,
    pub params: Option<Vec<(String, String)>>,
    pub generation: Generation,
}

impl ApiRequest {
    /// A default descriptor against the primary API (pre-LINE_X dialect).
    pub fn new() -> Self {
        Self::default()
    }

    /// A default descriptor against the new-generation API: same model,
    /// but `hops.tado.com` as base and LINE_X verb translation.
    pub fn line_x() -> Self {
        Self {
            endpoint: Endpoint::HopsApi,
            generation: Generation::LineX,
            ..Self::default()
        }
    }
}

// ── Verb translation ─────────────────────────────────────────────────

/// Map a logical action to the transport verb for the given dialect.
///
/// Identical across dialects except that LINE_X translates `Change` to
/// PATCH where the pre-LINE_X API uses PUT.
pub fn http_method(action: Action, generation: Generation) -> Method {
    match (action, generation) {
        (Action::Get, _) => Method::GET,
        (Action::Set, _) => Method::POST,
        (Action::Reset, _) => Method::DELETE,
        (Action::Change, Generation::PreLineX) => Method::PUT,
        (Action::Change, Generation::LineX) => Method::PATCH,
    }
}

// ── URL builder ──────────────────────────────────────────────────────

/// Build the fully qualified URL for a descriptor.
///
/// Pure function of the descriptor and the session's home id:
/// - mobile endpoint: `{base}{command}`
/// - device-scoped domains: `{base}{domain}/{device_id}/{command}`
/// - `me`: `{base}me` (command ignored)
/// - otherwise: `{base}{domain}/{home_id}/{command}`
///
/// Query parameters, when present, are urlencoded and appended.
pub fn build_url(
    request: &ApiRequest,
    home_id: Option<i64>,
    urls: &EndpointUrls,
) -> Result<Url, Error> {
    let base = urls.base(request.endpoint);
    let command = request.command.as_deref().unwrap_or("");

    let mut url = if request.endpoint == Endpoint::Mobile {
        format!("{base}{command}")
    } else {
        match request.domain {
            Domain::Devices | Domain::HomeByBridge => {
                let device = request.device.as_deref().ok_or_else(|| Error::InvalidRequest {
                    reason: format!(
                        "domain {:?} requires a device id",
                        request.domain
                    ),
                })?;
                format!("{base}{}/{device}/{command}", request.domain.segment())
            }
            Domain::Me => format!("{base}{}", request.domain.segment()),
            Domain::Home => {
                let home_id = home_id.ok_or_else(|| Error::InvalidRequest {
                    reason: "home id is not resolved yet".into(),
                })?;
                format!("{base}{}/{home_id}/{command}", request.domain.segment())
            }
        }
    };

    if let Some(params) = &request.params {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        url.push('?');
        url.push_str(&query);
    }

    Ok(Url::parse(&url)?)
}

/// Encoded request body plus the content type the mode dictates.
pub(crate) struct EncodedPayload {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

/// JSON-encode the payload, if any.
///
/// `Plain` mode changes only the advertised content type; the bytes are
/// JSON either way. The dispatcher additionally sends a `Mime-Type:
/// application/json;charset=UTF-8` header whenever a body is present —
/// it duplicates information, but the backend depends on it.
pub(crate) fn encode_payload(request: &ApiRequest) -> Result<Option<EncodedPayload>, Error> {
    let Some(payload) = &request.payload else {
        return Ok(None);
    };

    let body = serde_json::to_vec(payload).map_err(|e| Error::InvalidRequest {
        reason: format!("unserializable payload: {e}"),
    })?;

    let content_type = match request.mode {
        Mode::Plain => "text/plain;charset=UTF-8",
        Mode::Object => "application/json;charset=UTF-8",
    };

    Ok(Some(EncodedPayload { body, content_type }))
}

pub(crate) const MIME_TYPE_HEADER: &str = "Mime-Type";
pub(crate) const MIME_TYPE_JSON: &str = "application/json;charset=UTF-8";
