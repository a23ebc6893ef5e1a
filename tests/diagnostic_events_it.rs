#![cfg(feature = "tracing")]

mod common;

// std
use std::{
	collections::BTreeMap,
	fmt::Debug,
	sync::{Arc, Mutex},
};
// crates.io
use httpmock::prelude::*;
use tracing::{
	Event, Subscriber,
	field::{Field, Visit},
};
use tracing_subscriber::{
	Layer,
	layer::{Context, SubscriberExt},
	registry::Registry,
	util::SubscriberInitExt,
};
// self
use common::*;

const DIAGNOSTIC_TARGET: &str = "oidc_client_factory::client";

#[derive(Debug)]
struct RecordedEvent {
	target: String,
	fields: BTreeMap<String, String>,
}

#[derive(Clone, Default)]
struct RecordingLayer {
	events: Arc<Mutex<Vec<RecordedEvent>>>,
}
impl RecordingLayer {
	fn diagnostics(&self) -> Vec<BTreeMap<String, String>> {
		self.events
			.lock()
			.expect("Event log lock should not be poisoned.")
			.iter()
			.filter(|event| event.target == DIAGNOSTIC_TARGET)
			.map(|event| event.fields.clone())
			.collect()
	}
}
impl<S> Layer<S> for RecordingLayer
where
	S: Subscriber,
{
	fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
		let mut visitor = FieldRecorder::default();

		event.record(&mut visitor);
		self.events.lock().expect("Event log lock should not be poisoned.").push(RecordedEvent {
			target: event.metadata().target().to_owned(),
			fields: visitor.0,
		});
	}
}

#[derive(Default)]
struct FieldRecorder(BTreeMap<String, String>);
impl Visit for FieldRecorder {
	fn record_str(&mut self, field: &Field, value: &str) {
		self.0.insert(field.name().to_owned(), value.to_owned());
	}

	fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
		self.0.insert(field.name().to_owned(), format!("{value:?}"));
	}
}

#[tokio::test]
async fn each_soft_finding_is_logged_with_its_values() -> color_eyre::Result<()> {
	let layer = RecordingLayer::default();
	let _guard = Registry::default().with(layer.clone()).set_default();
	let server = MockServer::start_async().await;
	let issuer = server.url("/");
	let _mock = mock_discovery(
		&server,
		discovery_document(
			&issuer,
			serde_json::json!({
				"id_token_signing_alg_values_supported": ["HS256"],
				"response_types_supported": ["token"],
				"response_modes_supported": ["query"],
			}),
		),
	)
	.await;
	let handle = factory(config_builder(&server).idp_logout(true)).get_client().await?;
	let events = layer.diagnostics();

	assert_eq!(events.len(), handle.diagnostics().len());
	assert_eq!(
		events.iter().map(|fields| fields["kind"].as_str()).collect::<Vec<_>>(),
		[
			"unsupported_signing_alg",
			"unsupported_response_type",
			"unsupported_response_mode",
			"logout_unsupported",
		],
	);
	assert_eq!(events[0]["configured"], "RS256");
	assert_eq!(events[0]["supported"], "[\"HS256\"]");
	assert_eq!(events[1]["configured"], "id_token");
	assert_eq!(events[1]["supported"], "[\"token\"]");
	assert_eq!(events[2]["configured"], "form_post");
	assert_eq!(events[3]["issuer"], issuer);
	assert!(events.iter().all(|fields| fields.contains_key("message")));

	Ok(())
}

#[tokio::test]
async fn matching_capabilities_log_nothing() -> color_eyre::Result<()> {
	let layer = RecordingLayer::default();
	let _guard = Registry::default().with(layer.clone()).set_default();
	let server = MockServer::start_async().await;
	let issuer = server.url("/");
	let _mock = mock_discovery(&server, discovery_document(&issuer, serde_json::json!({}))).await;

	factory(config_builder(&server)).get_client().await?;

	assert!(layer.diagnostics().is_empty());

	Ok(())
}
