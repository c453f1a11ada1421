//! Command handlers for the portal engine.
//!
//! Each handler is invoked by an adapter once per incoming host event or
//! command. Shared state (`TravelerStore`, RNG) sits behind `Mutex`es that
//! are locked only around synchronous domain calls, never across an await.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, instrument, warn};
use traveler_core::camera::CameraDirector;
use traveler_core::clock::Clock;
use traveler_core::command::Command;
use traveler_core::error::TravelerError;
use traveler_core::host::SceneHost;
use traveler_core::notification::{Notification, NotificationMetadata, Notifier, PortalOutcome};
use traveler_core::rng::DeterministicRng;
use traveler_core::scene::{Entity, EntityKind, Marker};
use uuid::Uuid;

use crate::application::relocation::{self, Relocation};
use crate::config::TravelerConfig;
use crate::domain::commands::{AdvanceCameraFollows, PositionChanged, SetNotifications};
use crate::domain::descriptor::{self, PortalDescriptor};
use crate::domain::follow::{FollowRequest, FollowStep};
use crate::domain::graph::{GroupGraph, PortalNode};
use crate::domain::outcome::{IgnoreReason, TriggerOutcome};
use crate::domain::resolver::{self, Resolution};
use crate::domain::store::TravelerStore;
use crate::domain::zone;

fn lock<'a, T: ?Sized>(
    mutex: &'a Mutex<T>,
    what: &str,
) -> Result<MutexGuard<'a, T>, TravelerError> {
    mutex
        .lock()
        .map_err(|e| TravelerError::StatePoisoned(format!("{what} mutex poisoned: {e}")))
}

/// Sends notifications about one trigger, honouring the notification flag.
struct Announcer<'a> {
    store: &'a Mutex<TravelerStore>,
    notifier: &'a dyn Notifier,
    clock: &'a dyn Clock,
    correlation_id: Uuid,
    descriptor: &'a PortalDescriptor,
}

impl Announcer<'_> {
    async fn announce(&self, entity_name: &str, outcome: PortalOutcome) -> Result<(), TravelerError> {
        let enabled = lock(self.store, "store")?.ensure().notifications_enabled;
        if !enabled {
            return Ok(());
        }
        self.notifier
            .notify(Notification {
                metadata: NotificationMetadata {
                    notification_id: Uuid::new_v4(),
                    correlation_id: self.correlation_id,
                    occurred_at: self.clock.now(),
                },
                entity_name: entity_name.to_owned(),
                group: self.descriptor.group_name.clone(),
                node_id: self.descriptor.node_id,
                mode: self.descriptor.mode.as_str().to_owned(),
                outcome,
            })
            .await;
        Ok(())
    }
}

/// Handles a host position-change event for one entity: the trigger
/// detector entry point.
///
/// Guards run in order (token kind, reserved name, cooldown) before any
/// marker is looked at. The first portal in the entity's context whose zone
/// contains the entity is resolved against its group; at most one portal is
/// handled per event.
///
/// # Errors
///
/// Returns `TravelerError::EntityNotFound` if the entity is gone,
/// `TravelerError::StatePoisoned` if shared state cannot be locked, or the
/// host's error if a marker query or in-place move fails. Circle-entries
/// without an exit and refused clones are reported through the returned
/// outcome instead.
#[allow(clippy::too_many_arguments)]
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        entity_id = %command.entity_id
    )
)]
pub async fn handle_position_changed(
    command: &PositionChanged,
    config: &TravelerConfig,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &Mutex<TravelerStore>,
    host: &dyn SceneHost,
    notifier: &dyn Notifier,
) -> Result<TriggerOutcome, TravelerError> {
    let entity = host
        .entity(&command.entity_id)
        .await?
        .ok_or_else(|| TravelerError::EntityNotFound(command.entity_id.clone()))?;

    if let Some(reason) = guard_reason(&entity, config, clock, store)? {
        debug!(?reason, "position change ignored");
        return Ok(TriggerOutcome::Ignored { reason });
    }

    let portals: Vec<Marker> = host
        .markers()
        .await?
        .into_iter()
        .filter(|marker| descriptor::parse(&marker.name, &config.portal_keyword).is_portal)
        .collect();

    let Some(portal) = portals.iter().find(|marker| {
        marker.context_id == entity.context_id && zone::contains(marker, entity.position)
    }) else {
        return Ok(TriggerOutcome::NoPortal);
    };

    let descriptor = descriptor::parse(&portal.name, &config.portal_keyword);
    let graph = GroupGraph::build(&portals, &descriptor.group_name, &config.portal_keyword);
    let current = graph.position_of(&portal.id);

    let resolution = {
        let mut rng_guard = lock(rng, "RNG")?;
        resolver::resolve(
            graph.nodes(),
            current,
            descriptor.mode,
            descriptor.node_id,
            &mut *rng_guard,
        )
    };

    let announcer = Announcer {
        store,
        notifier,
        clock,
        correlation_id: command.correlation_id,
        descriptor: &descriptor,
    };

    let destination = match resolution {
        Resolution::Destination(node) => node,
        Resolution::Stay(reason) => {
            debug!(
                group = %descriptor.group_name,
                node_id = descriptor.node_id,
                ?reason,
                "portal resolved to no movement"
            );
            return Ok(TriggerOutcome::Stayed {
                group: descriptor.group_name.clone(),
                node_id: descriptor.node_id,
                reason,
            });
        }
        Resolution::NoExit => {
            warn!(
                group = %descriptor.group_name,
                node_id = descriptor.node_id,
                "circle entry has nowhere to go"
            );
            announcer
                .announce(&entity.name, PortalOutcome::NoCircleExit)
                .await?;
            return Ok(TriggerOutcome::NoCircleExit {
                group: descriptor.group_name.clone(),
                node_id: descriptor.node_id,
            });
        }
    };

    lock(store, "store")?.ensure().cooldowns.arm(
        &entity.id,
        &entity.name,
        clock.now(),
        config.cooldown(),
    );

    match relocation::relocate(&entity, destination, config, host).await {
        Ok(Relocation::Moved { position }) => {
            info!(
                group = %descriptor.group_name,
                from_node = descriptor.node_id,
                to_node = destination.node_id,
                "entity moved within context"
            );
            announce_travel(&announcer, &entity.name, destination).await?;
            Ok(TriggerOutcome::Moved {
                group: descriptor.group_name.clone(),
                from_node: descriptor.node_id,
                to_node: destination.node_id,
                position,
            })
        }
        Ok(Relocation::Cloned { entity: clone }) => {
            complete_teleport(
                &entity,
                &clone,
                destination,
                &announcer,
                config,
                clock,
                store,
                host,
            )
            .await
        }
        Err(TravelerError::CreateFailed { reason, .. }) => {
            warn!(
                group = %descriptor.group_name,
                node_id = descriptor.node_id,
                %reason,
                "clone refused; entity stays"
            );
            announcer
                .announce(
                    &entity.name,
                    PortalOutcome::CreateFailed {
                        reason: reason.clone(),
                    },
                )
                .await?;
            Ok(TriggerOutcome::CreateFailed {
                group: descriptor.group_name.clone(),
                node_id: descriptor.node_id,
                reason,
            })
        }
        Err(err) => Err(err),
    }
}

fn guard_reason(
    entity: &Entity,
    config: &TravelerConfig,
    clock: &dyn Clock,
    store: &Mutex<TravelerStore>,
) -> Result<Option<IgnoreReason>, TravelerError> {
    if entity.kind != EntityKind::Token {
        return Ok(Some(IgnoreReason::NotToken));
    }
    if config.is_reserved_name(&entity.name) {
        return Ok(Some(IgnoreReason::PortalMarker));
    }

    let now = clock.now();
    let mut guard = lock(store, "store")?;
    let cooldowns = &mut guard.ensure().cooldowns;
    cooldowns.purge_expired(now);
    Ok(cooldowns
        .is_cooling_down(&entity.id, &entity.name, now)
        .then_some(IgnoreReason::CoolingDown))
}

async fn announce_travel(
    announcer: &Announcer<'_>,
    entity_name: &str,
    destination: &PortalNode,
) -> Result<(), TravelerError> {
    announcer.announce(entity_name, PortalOutcome::Entered).await?;
    announcer
        .announce(
            entity_name,
            PortalOutcome::Exited {
                node_id: destination.node_id,
            },
        )
        .await
}

/// Post-clone bookkeeping: the clone inherits the cooldown, gets announced,
/// and its controllers' cameras are queued to follow it.
#[allow(clippy::too_many_arguments)]
async fn complete_teleport(
    source: &Entity,
    clone: &Entity,
    destination: &PortalNode,
    announcer: &Announcer<'_>,
    config: &TravelerConfig,
    clock: &dyn Clock,
    store: &Mutex<TravelerStore>,
    host: &dyn SceneHost,
) -> Result<TriggerOutcome, TravelerError> {
    lock(store, "store")?.ensure().cooldowns.arm(
        &clone.id,
        &clone.name,
        clock.now(),
        config.cooldown(),
    );

    info!(
        source_id = %source.id,
        clone_id = %clone.id,
        context_id = %clone.context_id,
        to_node = destination.node_id,
        "entity teleported to another context"
    );

    let context_name = host
        .context_name(&clone.context_id)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "destination context name unavailable");
            None
        });
    announce_travel(announcer, &clone.name, destination).await?;
    announcer
        .announce(
            &clone.name,
            PortalOutcome::Teleported {
                context_id: clone.context_id.clone(),
                context_name,
            },
        )
        .await?;

    let viewers = host.controllers(&clone.id).await.unwrap_or_else(|err| {
        warn!(error = %err, "controllers unavailable; camera will not follow");
        Vec::new()
    });
    let follow_scheduled = !viewers.is_empty();
    if follow_scheduled {
        let sequence_id = lock(store, "store")?.ensure().follows.schedule(
            FollowRequest {
                entity_id: clone.id.clone(),
                context_id: clone.context_id.clone(),
                position: clone.position,
                viewers,
            },
            clock.now(),
        );
        debug!(%sequence_id, "camera follow scheduled");
    }

    Ok(TriggerOutcome::Teleported {
        group: announcer.descriptor.group_name.clone(),
        from_node: announcer.descriptor.node_id,
        to_node: destination.node_id,
        entity_id: clone.id.clone(),
        context_id: clone.context_id.clone(),
        position: clone.position,
        follow_scheduled,
    })
}

/// Handles the notification toggle. Relocation is unaffected by the flag.
///
/// # Errors
///
/// Returns `TravelerError::StatePoisoned` if the store cannot be locked.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        enabled = command.enabled
    )
)]
pub fn handle_set_notifications(
    command: &SetNotifications,
    store: &Mutex<TravelerStore>,
) -> Result<bool, TravelerError> {
    lock(store, "store")?.ensure().notifications_enabled = command.enabled;
    info!("travel notifications {}", if command.enabled { "enabled" } else { "disabled" });
    Ok(command.enabled)
}

/// Handles a camera tick: performs every camera-follow step that is due.
/// Camera failures are logged and do not stop the remaining steps.
///
/// Returns the number of steps taken, including completions.
///
/// # Errors
///
/// Returns `TravelerError::StatePoisoned` if the store cannot be locked.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id)
)]
pub async fn handle_advance_camera_follows(
    command: &AdvanceCameraFollows,
    config: &TravelerConfig,
    clock: &dyn Clock,
    store: &Mutex<TravelerStore>,
    camera: &dyn CameraDirector,
) -> Result<usize, TravelerError> {
    let steps = lock(store, "store")?
        .ensure()
        .follows
        .take_due(clock.now(), config.follow_delay());

    for step in &steps {
        let result = match step {
            FollowStep::Associate {
                context_id,
                viewers,
                ..
            } => camera.associate_viewers(context_id, viewers).await,
            FollowStep::Focus {
                context_id,
                position,
                viewers,
                ..
            } => camera.focus(context_id, *position, viewers).await,
            FollowStep::Complete {
                sequence_id,
                entity_id,
            } => {
                debug!(%sequence_id, %entity_id, "camera follow complete");
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!(error = %err, ?step, "camera follow step failed");
        }
    }

    Ok(steps.len())
}
