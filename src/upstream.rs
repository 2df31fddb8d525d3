//! Platform API client: app credentials → access token → `jsapi_ticket`.
//!
//! Each call is a single GET with no retry. The client is stateless; caching lives in
//! [`crate::store`] and the decision to fetch lives in [`crate::sdk`].

// self
use crate::{
	_prelude::*,
	auth::{AppCredentials, TicketRecord, TokenSecret},
	error::{ConfigError, UpstreamError},
	http::{HttpResponse, UpstreamHttpClient},
	obs::{FlowKind, FlowSpan},
};

const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/token";
const DEFAULT_TICKET_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/ticket/getticket";

/// Identifies which of the two platform calls an outcome belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpstreamCall {
	/// `cgi-bin/token`.
	AccessToken,
	/// `cgi-bin/ticket/getticket`.
	Ticket,
}
impl UpstreamCall {
	/// Returns a stable label suitable for errors, spans, and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			UpstreamCall::AccessToken => "access_token",
			UpstreamCall::Ticket => "jsapi_ticket",
		}
	}

	const fn flow(self) -> FlowKind {
		match self {
			UpstreamCall::AccessToken => FlowKind::AccessToken,
			UpstreamCall::Ticket => FlowKind::Ticket,
		}
	}
}
impl Display for UpstreamCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token and ticket endpoint URLs (query strings are appended per call).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamEndpoints {
	/// Access-token endpoint.
	pub token: Url,
	/// Ticket endpoint.
	pub ticket: Url,
}
impl UpstreamEndpoints {
	/// Validates custom endpoints: HTTPS, or plain HTTP against a loopback host.
	pub fn new(token: Url, ticket: Url) -> Result<Self, ConfigError> {
		validate_endpoint("token", &token)?;
		validate_endpoint("ticket", &ticket)?;

		Ok(Self { token, ticket })
	}
}
impl Default for UpstreamEndpoints {
	fn default() -> Self {
		Self {
			token: Url::parse(DEFAULT_TOKEN_ENDPOINT).expect("Default token endpoint is a valid URL."),
			ticket: Url::parse(DEFAULT_TICKET_ENDPOINT)
				.expect("Default ticket endpoint is a valid URL."),
		}
	}
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
	access_token: Option<String>,
	errcode: Option<i64>,
	errmsg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TicketResponse {
	ticket: Option<String>,
	errcode: Option<i64>,
	errmsg: Option<String>,
}

/// Stateless request/response translator for the two platform calls.
pub struct UpstreamClient<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	http_client: Arc<C>,
	endpoints: UpstreamEndpoints,
}
impl<C> UpstreamClient<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Creates a client over the provided transport and endpoints.
	pub fn new(http_client: impl Into<Arc<C>>, endpoints: UpstreamEndpoints) -> Self {
		Self { http_client: http_client.into(), endpoints }
	}

	/// Returns the endpoints this client calls.
	pub fn endpoints(&self) -> &UpstreamEndpoints {
		&self.endpoints
	}

	/// Exchanges the app credentials for an access token.
	///
	/// Any `errcode` in the body counts as a rejection, whatever its value.
	pub async fn fetch_access_token(
		&self,
		credentials: &AppCredentials,
	) -> Result<TokenSecret, UpstreamError> {
		const CALL: UpstreamCall = UpstreamCall::AccessToken;

		let mut url = self.endpoints.token.clone();

		url.query_pairs_mut()
			.append_pair("grant_type", "client_credential")
			.append_pair("appid", &credentials.app_id)
			.append_pair("secret", credentials.app_secret().expose());

		let response = self.call(CALL, &url).await?;
		let body: AccessTokenResponse = parse_body(CALL, &response)?;

		if let Some(errcode) = body.errcode {
			return Err(UpstreamError::Rejected {
				call: CALL,
				errcode,
				errmsg: body.errmsg.unwrap_or_default(),
			});
		}

		body.access_token
			.filter(|token| !token.is_empty())
			.map(TokenSecret::new)
			.ok_or(UpstreamError::MissingField { call: CALL, field: "access_token" })
	}

	/// Exchanges an access token for a `jsapi_ticket`.
	///
	/// The ticket endpoint reports success with `errcode: 0`, so only non-zero codes fail.
	pub async fn fetch_ticket(
		&self,
		access_token: &TokenSecret,
	) -> Result<TokenSecret, UpstreamError> {
		const CALL: UpstreamCall = UpstreamCall::Ticket;

		let mut url = self.endpoints.ticket.clone();

		url.query_pairs_mut()
			.append_pair("access_token", access_token.expose())
			.append_pair("type", "jsapi");

		let response = self.call(CALL, &url).await?;
		let body: TicketResponse = parse_body(CALL, &response)?;

		if let Some(errcode) = body.errcode.filter(|code| *code != 0) {
			return Err(UpstreamError::Rejected {
				call: CALL,
				errcode,
				errmsg: body.errmsg.unwrap_or_default(),
			});
		}

		body.ticket
			.filter(|ticket| !ticket.is_empty())
			.map(TokenSecret::new)
			.ok_or(UpstreamError::MissingField { call: CALL, field: "ticket" })
	}

	/// Runs both calls in order and stamps the resulting record with `now`.
	pub async fn fetch_record(
		&self,
		credentials: &AppCredentials,
		now: i64,
	) -> Result<TicketRecord, UpstreamError> {
		let access_token = self.fetch_access_token(credentials).await?;
		let ticket = self.fetch_ticket(&access_token).await?;

		Ok(TicketRecord { access_token, ticket, obtained_at: now })
	}

	async fn call(&self, call: UpstreamCall, url: &Url) -> Result<HttpResponse, UpstreamError> {
		let span = FlowSpan::new(call.flow(), "upstream_get");
		let response = span
			.instrument(<C as UpstreamHttpClient>::get(self.http_client.as_ref(), url))
			.await
			.map_err(|source| UpstreamError::Transport { call, source })?;

		if !response.is_success() {
			return Err(UpstreamError::Status { call, status: response.status });
		}

		Ok(response)
	}
}
impl<C> Clone for UpstreamClient<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), endpoints: self.endpoints.clone() }
	}
}
impl<C> Debug for UpstreamClient<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UpstreamClient").field("endpoints", &self.endpoints).finish()
	}
}

fn parse_body<T>(call: UpstreamCall, response: &HttpResponse) -> Result<T, UpstreamError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| UpstreamError::Parse { call, source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}
