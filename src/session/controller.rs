// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::enrich::{Enricher, EnrichmentUpdate, InstanceDataKind, InstanceView, RuntimeClient};
use crate::eval::{DotPathEvaluator, ExpressionEvaluator};
use crate::format::{codec_for, CodecError};
use crate::model::{
    AttributeError, Descriptor, ElementId, ElementKind, FlowDocument, FlowElement,
    InstanceRecord, InteractionMode,
};
use crate::protocol::{
    ActionForward, AttrTarget, ConfirmReply, DialogBridge, HostMessage, PanelConfig, PanelMessage,
    RequestDescription, StepPatch, UpdatePayload,
};
use crate::store::{ConfiguratorGeometry, PersistedState, SelectedState, StateStore};
use crate::surface::{ConfiguratorView, PanelSurface};
use crate::template::{resolve_template, ConditionRegistry, ResolveContext, TemplateSet};

/// Scalar step patches without an explicit target land here.
const DEFAULT_STEP_ATTRIBUTE: &str = "tsFile";

/// Element id of the flow-level pseudo element shown in the configurator
/// when instances arrive without a step selection.
const FLOW_ROOT_ELEMENT_ID: &str = "flow";

/// Events the drawing surface feeds back into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Selected { element_id: Option<ElementId> },
    ElementAdded { element: FlowElement },
    /// Double-click / drill into a step.
    Drill { element_id: ElementId },
    /// The drawing tool mutated the document.
    DocumentEdited,
    /// The configurator splitter moved.
    ConfiguratorMoved { position: u32 },
    ConfiguratorClosed,
    ModeToggled { mode: InteractionMode },
    /// Pending input text typed into the configurator.
    InputEdited { input: String },
}

/// One live editing session.
#[derive(Debug)]
pub struct Session {
    base: String,
    file: String,
    readonly: bool,
    mode: InteractionMode,
    config: PanelConfig,
    document: FlowDocument,
    selected: Option<ElementId>,
    instances: Vec<InstanceRecord>,
    views: Vec<InstanceView>,
    input: Option<String>,
    teams: Vec<String>,
    custom_descriptors: Vec<Descriptor>,
    enricher: Enricher,
    configurator_open: bool,
    configurator_position: Option<u32>,
}

impl Session {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn document(&self) -> &FlowDocument {
        &self.document
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn views(&self) -> &[InstanceView] {
        &self.views
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn custom_descriptors(&self) -> &[Descriptor] {
        &self.custom_descriptors
    }

    pub fn configurator_open(&self) -> bool {
        self.configurator_open
    }

    pub fn configurator_position(&self) -> Option<u32> {
        self.configurator_position
    }

    /// The effective diagram read-only flag, derived fresh on every use.
    pub fn effective_readonly(&self) -> bool {
        self.mode == InteractionMode::Runtime || self.readonly
    }
}

/// Receiving ends of the panel's outgoing channels.
#[derive(Debug)]
pub struct PanelChannels {
    /// Messages for the host.
    pub outbound: UnboundedReceiver<PanelMessage>,
    /// Completed enrichment fetches; feed back via
    /// [`FlowPanel::handle_enrichment`].
    pub updates: UnboundedReceiver<EnrichmentUpdate>,
}

/// The owning handle for panel state and the (at most one) live session.
pub struct FlowPanel {
    surface: Box<dyn PanelSurface>,
    store: StateStore,
    outbound: UnboundedSender<PanelMessage>,
    updates_tx: UnboundedSender<EnrichmentUpdate>,
    templates: TemplateSet,
    conditions: ConditionRegistry,
    evaluator: Box<dyn ExpressionEvaluator>,
    generation: Arc<AtomicU64>,
    dialog: DialogBridge,
    session: Option<Session>,
}

impl FlowPanel {
    pub fn new(surface: Box<dyn PanelSurface>, store: StateStore) -> (Self, PanelChannels) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let panel = Self {
            surface,
            store,
            outbound: outbound_tx,
            updates_tx,
            templates: TemplateSet::builtin(),
            conditions: ConditionRegistry::default(),
            evaluator: Box::new(DotPathEvaluator),
            generation: Arc::new(AtomicU64::new(0)),
            dialog: DialogBridge::new(),
            session: None,
        };
        (
            panel,
            PanelChannels {
                outbound: outbound_rx,
                updates: updates_rx,
            },
        )
    }

    pub fn set_templates(&mut self, templates: TemplateSet) {
        self.templates = templates;
    }

    pub fn set_conditions(&mut self, conditions: ConditionRegistry) {
        self.conditions = conditions;
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn ExpressionEvaluator>) {
        self.evaluator = evaluator;
    }

    /// The evaluator surfaces use to resolve dynamic widget defaults.
    pub fn evaluator(&self) -> &dyn ExpressionEvaluator {
        self.evaluator.as_ref()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replaces any live session; always close-then-open.
    ///
    /// The new document is parsed before the old session is torn down, so a
    /// rejected document leaves the previous diagram intact. Empty text
    /// yields the built-in starter document, which is pushed back to the
    /// host via a `change` message.
    pub fn open_session(
        &mut self,
        base: impl Into<String>,
        config: PanelConfig,
        text: &str,
        file: impl Into<String>,
        readonly: bool,
    ) -> Result<(), CodecError> {
        let codec = codec_for(config.dialect);
        let mut document = if text.trim().is_empty() {
            FlowDocument::starter()
        } else {
            codec.parse(text)?
        };

        self.close_session();

        let client = config
            .runtime_url
            .as_ref()
            .map(|url| RuntimeClient::new(url.clone(), config.token.clone()));
        let enricher = Enricher::new(
            client,
            config.dialect,
            self.updates_tx.clone(),
            self.generation.clone(),
        );

        let newly_created = document.newly_created();
        document.clear_newly_created();

        self.session = Some(Session {
            base: base.into(),
            file: file.into(),
            readonly,
            mode: InteractionMode::default(),
            config,
            document,
            selected: None,
            instances: Vec::new(),
            views: Vec::new(),
            input: None,
            teams: Vec::new(),
            custom_descriptors: Vec::new(),
            enricher,
            configurator_open: false,
            configurator_position: None,
        });

        if let Some(session) = self.session.as_ref() {
            self.surface.render_document(&session.document);
            self.surface.set_interaction_mode(session.mode);
            self.store.save(&PersistedState {
                base: Some(session.base.clone()),
                file: Some(session.file.clone()),
                readonly: Some(session.readonly),
                mode: Some(session.mode),
                config: Some(session.config.clone()),
                ..PersistedState::default()
            });
        }
        self.apply_readonly();

        if let Err(err) = self.update_document(newly_created) {
            tracing::warn!(error = %err, "initial document serialization failed");
        }
        Ok(())
    }

    /// Closes the live session: bumps the enrichment generation so in-flight
    /// fetches resolve stale, and drops pending dialog resolvers.
    pub fn close_session(&mut self) {
        if self.session.take().is_some() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.dialog.clear();
            self.surface.close_configurator();
        }
    }

    /// Inbound host message dispatch.
    pub fn handle_message(&mut self, message: HostMessage) {
        match message {
            HostMessage::Update(payload) => self.handle_update(payload),
            HostMessage::Instance(payload) => self.handle_instances(payload.instances),
            HostMessage::Custom(payload) => self.set_custom_descriptors(payload.descriptors),
            HostMessage::Step(payload) => {
                if let Err(err) =
                    self.update_step(&payload.id, &payload.patch, payload.attr.as_ref())
                {
                    tracing::warn!(step = %payload.id, error = %err, "step update rejected");
                }
            }
            HostMessage::Action(forward) => self.surface.forward_action(&forward),
            HostMessage::Mode(payload) => self.switch_mode(payload.mode),
            HostMessage::ThemeChange => self.handle_theme_change(),
            HostMessage::Confirm(reply) => self.handle_confirm_reply(reply),
            HostMessage::OpenConfigurator => self.open_configurator(),
        }
    }

    /// UI events from the drawing surface.
    pub fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Selected { element_id } => self.select_element(element_id),
            UiEvent::ElementAdded { element } => {
                {
                    let Some(session) = self.session.as_mut() else {
                        return;
                    };
                    match element.kind() {
                        ElementKind::Link => session.document.add_link(element),
                        _ => session.document.add_step(element),
                    }
                }
                self.render_document();
                if let Err(err) = self.update_document(true) {
                    tracing::warn!(error = %err, "document refresh failed");
                }
            }
            UiEvent::Drill { element_id } => self.drill(&element_id),
            UiEvent::DocumentEdited => {
                if let Err(err) = self.update_document(true) {
                    tracing::warn!(error = %err, "document refresh failed");
                }
            }
            UiEvent::ConfiguratorMoved { position } => {
                if let Some(session) = self.session.as_mut() {
                    session.configurator_position = Some(position);
                }
                self.persist_configurator();
            }
            UiEvent::ConfiguratorClosed => self.close_configurator(),
            UiEvent::ModeToggled { mode } => self.switch_mode(mode),
            UiEvent::InputEdited { input } => {
                if let Some(session) = self.session.as_mut() {
                    session.input = Some(input.clone());
                }
                self.store.save(&PersistedState {
                    input: Some(input),
                    ..PersistedState::default()
                });
            }
        }
    }

    /// Idempotent mode switch; re-derives the diagram read-only flag and
    /// propagates the mode to the drawing-tool UI.
    pub fn switch_mode(&mut self, mode: InteractionMode) {
        self.enter_mode(mode, true);
    }

    fn enter_mode(&mut self, mode: InteractionMode, may_request_instances: bool) {
        let mut close_configurator = false;
        let mut request_instances = false;
        {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            session.mode = mode;
            match mode {
                InteractionMode::Connect => {
                    session.instances.clear();
                    session.views.clear();
                    close_configurator = true;
                }
                InteractionMode::Runtime => {
                    request_instances = may_request_instances && session.instances.is_empty();
                }
                InteractionMode::Select => {}
            }
        }

        if close_configurator {
            self.close_configurator();
        }
        if request_instances {
            self.request_instances();
        }
        self.apply_readonly();
        self.surface.set_interaction_mode(mode);
        self.store.save(&PersistedState {
            mode: Some(mode),
            ..PersistedState::default()
        });
    }

    /// Serializes the document; refreshes persisted state always, notifies
    /// the host only when `post`.
    pub fn update_document(&mut self, post: bool) -> Result<(), CodecError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let codec = codec_for(session.config.dialect);
        let text = codec.serialize(&session.document)?;
        self.store.save(&PersistedState {
            text: Some(text.clone()),
            ..PersistedState::default()
        });
        if post {
            self.send(PanelMessage::Change { text });
        }
        Ok(())
    }

    /// Mutates a step's attributes from a host `step` message.
    ///
    /// An unknown step id is a silent no-op. Only table-attribute decoding
    /// can fail, and it fails before anything mutates.
    pub fn update_step(
        &mut self,
        step_id: &str,
        patch: &StepPatch,
        attr: Option<&AttrTarget>,
    ) -> Result<(), AttributeError> {
        {
            let Some(session) = self.session.as_mut() else {
                return Ok(());
            };
            let Some(step) = session.document.find_step_mut(step_id) else {
                tracing::debug!(step = step_id, "step update for unknown step ignored");
                return Ok(());
            };

            match patch {
                StepPatch::Request(request) => apply_request_description(step, request),
                StepPatch::Value(value) => match attr {
                    Some(attr) => match attr.row {
                        Some(row) => {
                            step.set_table_cell(&attr.name, row, attr.col.unwrap_or(0), value.clone())?;
                        }
                        None => step.set_attribute(attr.name.clone(), value.clone()),
                    },
                    None => step.set_attribute(DEFAULT_STEP_ATTRIBUTE, value.clone()),
                },
            }
        }

        self.render_document();
        if let Err(err) = self.update_document(false) {
            tracing::warn!(error = %err, "document refresh failed");
        }
        Ok(())
    }

    /// Linear step lookup in the live session's document.
    pub fn find_step(&self, id: &str) -> Option<&FlowElement> {
        self.session.as_ref().and_then(|session| session.document.find_step(id))
    }

    /// Selection change: invalidates in-flight enrichment, then resolves the
    /// template and (re)opens or closes the configurator.
    pub fn select_element(&mut self, element_id: Option<ElementId>) {
        if self.session.is_none() {
            return;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = self.session.as_mut() {
            session.selected = element_id.clone();
        }
        self.surface.set_selection(element_id.as_ref());
        self.send(PanelMessage::Select {
            element: element_id.as_ref().map(|id| id.as_str().to_owned()),
        });

        if element_id.is_some() {
            self.open_configurator();
        } else {
            self.close_configurator();
        }
        self.persist_selection();
    }

    /// Pushes edited instance input/output back to the runtime service;
    /// fire-and-forget, a no-op without a configured runtime URL.
    pub fn submit_instance_data(
        &self,
        index: usize,
        kind: InstanceDataKind,
        value: serde_json::Value,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(record) = session.instances.get(index) else {
            return;
        };
        session.enricher.spawn_data_write(record, kind, value);
    }

    /// Registers a confirmation and asks the host to show it. The returned
    /// receiver resolves exactly once, with the matching reply.
    pub fn confirm(&mut self, message: impl Into<String>) -> oneshot::Receiver<bool> {
        let (id, receiver) = self.dialog.request();
        self.send(PanelMessage::Confirm {
            id,
            message: message.into(),
        });
        receiver
    }

    /// Applies a completed enrichment fetch, unless it is stale.
    pub fn handle_enrichment(&mut self, update: EnrichmentUpdate) {
        if update.generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!("stale enrichment result discarded");
            return;
        }
        let applied = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let still_current = match session.selected.as_ref() {
                Some(selected) => selected == &update.element_id,
                None => {
                    update.element_id.as_str() == FLOW_ROOT_ELEMENT_ID
                        && !session.instances.is_empty()
                }
            };
            if !still_current {
                tracing::debug!(element = %update.element_id, "enrichment for a stale element discarded");
                false
            } else if let Some(view) = session.views.get_mut(update.index) {
                view.apply(update.patch);
                true
            } else {
                false
            }
        };
        if applied {
            // Second render with the merged data.
            self.render_configurator();
        }
    }

    /// Rebuilds a session from the persisted snapshot.
    ///
    /// With `live_reload` and a restored `runtime` mode, a fresh instance
    /// payload is re-requested from the host; otherwise the restore is
    /// purely local.
    pub fn restore(&mut self, live_reload: bool) -> bool {
        let snapshot = self.store.snapshot();
        let Some(text) = snapshot.text.clone() else {
            return false;
        };
        let base = snapshot.base.clone().unwrap_or_default();
        let file = snapshot.file.clone().unwrap_or_default();
        let readonly = snapshot.readonly.unwrap_or(false);
        let config = snapshot.config.clone().unwrap_or_default();

        if let Err(err) = self.open_session(base, config, &text, file, readonly) {
            tracing::error!(error = %err, "session restore failed");
            return false;
        }

        let mode = snapshot.mode.unwrap_or_default();
        let selected = snapshot.selected.unwrap_or_default();
        let selected_id = selected.id.and_then(|id| ElementId::new(id).ok());
        let instances = selected.instances;

        if let Some(session) = self.session.as_mut() {
            session.selected = selected_id.clone();
            session.instances = instances.clone();
            session.teams = snapshot.teams.clone().unwrap_or_default();
            session.input = snapshot.input.clone();
            session.configurator_position = snapshot.configurator.and_then(|c| c.position);
        }
        if let Some(descriptors) = snapshot.custom_descriptors.clone() {
            self.set_custom_descriptors(descriptors);
        }

        self.enter_mode(mode, false);
        self.surface.set_selection(selected_id.as_ref());

        // A runtime view without instances would be stale and instance-less;
        // leave the configurator closed in that case.
        let was_open = snapshot.configurator.map(|c| c.open).unwrap_or(false);
        let reopen = was_open
            && match mode {
                InteractionMode::Runtime => !instances.is_empty(),
                _ => selected_id.is_some() || !instances.is_empty(),
            };
        if reopen {
            self.open_configurator();
        }

        if mode == InteractionMode::Runtime && live_reload {
            self.request_instances();
        }
        true
    }

    /// Replaces the custom toolbox descriptors wholesale.
    pub fn set_custom_descriptors(&mut self, descriptors: Vec<Descriptor>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.custom_descriptors = descriptors.clone();
        self.surface.replace_descriptors(&descriptors);
        self.store.save(&PersistedState {
            custom_descriptors: Some(descriptors),
            ..PersistedState::default()
        });
    }

    pub fn set_teams(&mut self, teams: Vec<String>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.teams = teams.clone();
        self.store.save(&PersistedState {
            teams: Some(teams),
            ..PersistedState::default()
        });
    }

    fn handle_update(&mut self, payload: UpdatePayload) {
        let snapshot = self.store.snapshot();
        let current = self.session.as_ref();

        let base = payload
            .base
            .or_else(|| current.map(|session| session.base.clone()))
            .or(snapshot.base)
            .unwrap_or_default();
        let file = payload
            .file
            .or_else(|| current.map(|session| session.file.clone()))
            .or(snapshot.file)
            .unwrap_or_default();
        let readonly = payload
            .readonly
            .or_else(|| current.map(|session| session.readonly))
            .or(snapshot.readonly)
            .unwrap_or(false);
        let config = payload
            .config
            .or_else(|| current.map(|session| session.config.clone()))
            .or(snapshot.config)
            .unwrap_or_default();
        let text = payload.text.or(snapshot.text).unwrap_or_default();

        if let Err(err) = self.open_session(base, config, &text, file, readonly) {
            tracing::error!(error = %err, "session update rejected");
            self.send(PanelMessage::Alert {
                message: format!("Cannot load flow document: {err}"),
            });
            return;
        }

        if let Some(descriptors) = payload.custom.or(snapshot.custom_descriptors) {
            self.set_custom_descriptors(descriptors);
        }
        if let Some(teams) = payload.teams.or(snapshot.teams) {
            self.set_teams(teams);
        }
    }

    fn handle_instances(&mut self, instances: Vec<InstanceRecord>) {
        {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            session.instances = instances;
            session.views.clear();
        }
        self.enter_mode(InteractionMode::Runtime, false);
        self.open_configurator();
        self.persist_selection();
    }

    fn handle_theme_change(&mut self) {
        let snapshot = self.store.snapshot();
        if let (Some(session), Some(configurator)) = (self.session.as_mut(), snapshot.configurator)
        {
            if configurator.position.is_some() {
                session.configurator_position = configurator.position;
            }
        }
        self.surface.refresh_theme();
        self.render_document();
        if self.session.as_ref().is_some_and(Session::configurator_open) {
            self.render_configurator();
        }
    }

    fn handle_confirm_reply(&mut self, reply: ConfirmReply) {
        if !self.dialog.resolve(reply.id, reply.result) {
            tracing::debug!("confirmation reply without a pending request ignored");
        }
    }

    fn drill(&mut self, element_id: &ElementId) {
        let message = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            let Some(step) = session.document.find_step(element_id.as_str()) else {
                return;
            };
            if let Some(file) = step.attribute("tsFile") {
                PanelMessage::Open {
                    file: file.to_owned(),
                }
            } else if let Some(subflow) = step.attribute("subflow") {
                match step.attribute("subflowFile") {
                    Some(file) => PanelMessage::Open {
                        file: file.to_owned(),
                    },
                    None => PanelMessage::New {
                        name: Some(subflow.to_owned()),
                    },
                }
            } else {
                PanelMessage::Edit {
                    element: element_id.as_str().to_owned(),
                }
            }
        };
        self.send(message);
    }

    /// Prepares instance views, kicks off enrichment and renders the
    /// configurator; a no-op without a selection or instances.
    fn open_configurator(&mut self) {
        {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(element) = configurator_element(session) else {
                return;
            };
            session.views = session.enricher.prepare(&session.instances);
            let element_id = element.element_id().clone();
            session.enricher.spawn_fetches(&element_id, &session.instances);
        }
        self.render_configurator();
    }

    /// Renders the configurator from current views; template resolution runs
    /// fresh on every render.
    fn render_configurator(&mut self) {
        let view = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(element) = configurator_element(session) else {
                return;
            };
            let ctx = ResolveContext {
                document: &session.document,
                mode: session.mode,
                teams: &session.teams,
            };
            let template = resolve_template(&self.templates, &self.conditions, &ctx, &element);
            session.configurator_open = true;
            ConfiguratorView {
                element_id: Some(element.element_id().clone()),
                template,
                instances: session.views.clone(),
                position: session.configurator_position,
            }
        };
        let position = view.position;
        self.surface.show_configurator(&view);
        self.send(PanelMessage::Configurator {
            open: true,
            position,
        });
        self.persist_configurator();
    }

    fn close_configurator(&mut self) {
        let position = match self.session.as_mut() {
            Some(session) => {
                session.configurator_open = false;
                session.configurator_position
            }
            None => None,
        };
        self.surface.close_configurator();
        self.send(PanelMessage::Configurator {
            open: false,
            position,
        });
        self.persist_configurator();
    }

    fn request_instances(&mut self) {
        let action = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            ActionForward::new("instance", session.file.clone())
        };
        self.send(PanelMessage::Action(action));
    }

    fn apply_readonly(&mut self) {
        let Some(readonly) = self.session.as_ref().map(Session::effective_readonly) else {
            return;
        };
        self.surface.set_readonly(readonly);
    }

    fn render_document(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.surface.render_document(&session.document);
    }

    fn persist_selection(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.store.save(&PersistedState {
            selected: Some(SelectedState {
                id: session.selected.as_ref().map(|id| id.as_str().to_owned()),
                instances: session.instances.clone(),
            }),
            ..PersistedState::default()
        });
    }

    fn persist_configurator(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.store.save(&PersistedState {
            configurator: Some(ConfiguratorGeometry {
                open: session.configurator_open,
                position: session.configurator_position,
            }),
            ..PersistedState::default()
        });
    }

    fn send(&self, message: PanelMessage) {
        if self.outbound.send(message).is_err() {
            tracing::debug!("outbound channel closed");
        }
    }
}

fn apply_request_description(step: &mut FlowElement, request: &RequestDescription) {
    if let Some(name) = &request.name {
        step.set_attribute("name", name.clone());
    }
    if let Some(method) = &request.method {
        step.set_attribute("method", method.clone());
    }
    if let Some(headers) = &request.headers {
        step.set_attribute("headers", headers.to_string());
    }
    if let Some(body) = &request.body {
        step.set_attribute("body", body.to_string());
    }
}

/// The element the configurator shows: the selected element, or a flow-level
/// pseudo element when instances arrived without a step selection.
fn configurator_element(session: &Session) -> Option<FlowElement> {
    let mut element = match session.selected.as_ref() {
        Some(id) => session.document.find_element(id.as_str())?.clone(),
        None if !session.instances.is_empty() => flow_root_element(session),
        None => return None,
    };
    element.set_instances(session.instances.clone());
    Some(element)
}

fn flow_root_element(session: &Session) -> FlowElement {
    let element_id = ElementId::new(FLOW_ROOT_ELEMENT_ID).expect("static flow element id");
    let mut element = FlowElement::new(element_id, ElementKind::Flow);
    for (name, value) in session.document.attributes() {
        element.set_attribute(name.clone(), value.clone());
    }
    element
}
