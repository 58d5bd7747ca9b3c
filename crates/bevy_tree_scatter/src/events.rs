use std::sync::Arc;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use tree_scatter::prelude::{EventSink, ScatterEvent, ScatterEventKind};

/// Bevy message containing the originating request entity and the underlying [`ScatterEvent`].
#[derive(Message, Debug, Clone)]
pub struct TreeScatterMessage {
    pub request_entity: Entity,
    pub event: ScatterEvent,
}

/// Which event kinds async jobs forward to the main thread.
///
/// The default drops [`ScatterEventKind::CandidateEvaluated`], which fires once per
/// drawn candidate.
#[derive(Resource, Clone, Debug)]
pub struct TreeScatterBusConfig {
    pub kinds: Arc<[ScatterEventKind]>,
}

impl TreeScatterBusConfig {
    pub fn only(kinds: &[ScatterEventKind]) -> Self {
        Self {
            kinds: kinds.into(),
        }
    }
}

impl Default for TreeScatterBusConfig {
    fn default() -> Self {
        Self::only(&[
            ScatterEventKind::RunStarted,
            ScatterEventKind::PlacementMade,
            ScatterEventKind::BudgetExhausted,
            ScatterEventKind::Warning,
            ScatterEventKind::RunFinished,
        ])
    }
}

/// Global bus for streaming scatter events from async tasks to the main thread.
#[derive(Resource)]
pub struct TreeScatterBus {
    tx: Sender<TreeScatterMessage>,
    rx: Receiver<TreeScatterMessage>,
}

impl TreeScatterBus {
    pub fn sender(&self) -> &Sender<TreeScatterMessage> {
        &self.tx
    }

    pub fn receiver(&self) -> &Receiver<TreeScatterMessage> {
        &self.rx
    }
}

impl Default for TreeScatterBus {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

/// Event sink that forwards events to the bus, tagging each with the request entity.
pub struct ChannelSink {
    pub request: Entity,
    pub tx: Sender<TreeScatterMessage>,
    pub kinds: Arc<[ScatterEventKind]>,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        if !self.wants(event.kind()) {
            return;
        }
        let _ = self.tx.send(TreeScatterMessage {
            request_entity: self.request,
            event,
        });
    }

    #[inline]
    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.kinds.contains(&kind)
    }
}
