//! `config()` orchestration: cache lookup, upstream fallback, and signing.
//!
//! A fresh cached record is reused together with the timestamp it was fetched at, so the
//! signed timestamp always matches the ticket's issuance. Otherwise both upstream calls run
//! and the new record replaces the cached one before the config is signed. Failures abort
//! the call before anything is written.

// self
use crate::{
	_prelude::*,
	auth::{TicketRecord, TicketStatus, TokenSecret, unix_now},
	http::UpstreamHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	sdk::{JsSdk, JsSdkConfig},
	signature::SigningContext,
};

impl<C> JsSdk<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Produces a signed `wx.config` payload for this instance's page URL.
	pub async fn config(&self) -> Result<JsSdkConfig> {
		const KIND: FlowKind = FlowKind::Config;

		let span = FlowSpan::new(KIND, "config");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(self.effective_ticket(unix_now()))
			.await
			.map(|(ticket, timestamp)| self.sign(&ticket, timestamp));

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => {
				self.metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn effective_ticket(&self, now: i64) -> Result<(TokenSecret, i64)> {
		let Some(store) = self.store.as_ref() else {
			let record = self.fetch_record(now).await?;

			return Ok((record.ticket, record.obtained_at));
		};

		let cached = store.read(&self.store_key).await?;
		let status = TicketRecord::status_at(cached.as_ref(), now);

		#[cfg(feature = "tracing")]
		tracing::debug!(?status, "Looked up the cached ticket.");

		if let (TicketStatus::Fresh, Some(cached)) = (status, cached) {
			self.metrics.record_cache_hit();
			obs::record_flow_outcome(FlowKind::Config, FlowOutcome::CacheHit);

			return Ok((cached.ticket, cached.obtained_at));
		}

		let record = self.fetch_record(now).await?;

		store.write(&self.store_key, &record).await?;

		Ok((record.ticket, record.obtained_at))
	}

	async fn fetch_record(&self, now: i64) -> Result<TicketRecord> {
		self.metrics.record_upstream_fetch();

		Ok(self.upstream.fetch_record(&self.credentials, now).await?)
	}

	fn sign(&self, ticket: &TokenSecret, timestamp: i64) -> JsSdkConfig {
		let signature =
			SigningContext::new(&self.url, ticket.expose(), timestamp, &self.nonce).sign();

		JsSdkConfig {
			debug: self.debug,
			app_id: self.credentials.app_id.to_string(),
			timestamp,
			nonce_str: self.nonce.clone(),
			signature,
		}
	}
}
