//! Then steps for service lifecycle scenarios.

use super::world::{LifecycleWorld, service_id};
use devhub::service_registry::{
    domain::{LifecycleEvent, ServiceDescriptor},
    services::{ConnectOutcome, DisconnectOutcome},
};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

fn descriptor(world: &LifecycleWorld, id: &str) -> Result<ServiceDescriptor, eyre::Report> {
    world
        .registry
        .service(&service_id(id)?)
        .ok_or_else(|| eyre!("service {id} should be registered"))
}

#[then(r#"the status of "{id}" is "{status}""#)]
fn status_is(world: &LifecycleWorld, id: String, status: String) -> Result<(), eyre::Report> {
    let actual = world.registry.status(&service_id(&id)?);
    if actual.as_str() != status {
        return Err(eyre!("expected status '{status}', got '{actual}'"));
    }
    Ok(())
}

#[then(r#"service "{id}" records a last connected time"#)]
fn records_last_connected(world: &LifecycleWorld, id: String) -> Result<(), eyre::Report> {
    if descriptor(world, &id)?.last_connected_at().is_none() {
        return Err(eyre!("expected a last connected time"));
    }
    Ok(())
}

#[then(r#"service "{id}" has no last error"#)]
fn has_no_last_error(world: &LifecycleWorld, id: String) -> Result<(), eyre::Report> {
    if let Some(error) = descriptor(world, &id)?.last_error() {
        return Err(eyre!("expected no last error, got '{error}'"));
    }
    Ok(())
}

#[then(r#"the last error of "{id}" mentions "{fragment}""#)]
fn last_error_mentions(
    world: &LifecycleWorld,
    id: String,
    fragment: String,
) -> Result<(), eyre::Report> {
    let found = descriptor(world, &id)?;
    let error = found
        .last_error()
        .ok_or_else(|| eyre!("expected a last error"))?;
    if !error.contains(&fragment) {
        return Err(eyre!("expected '{error}' to mention '{fragment}'"));
    }
    Ok(())
}

#[then(r"there are {count:usize} live connections")]
fn live_connections(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.registry.live_connection_count();
    if actual != count {
        return Err(eyre!("expected {count} live connections, got {actual}"));
    }
    Ok(())
}

#[then(r#"the status events for "{id}" are "{statuses}""#)]
fn status_events(
    world: &mut LifecycleWorld,
    id: String,
    statuses: String,
) -> Result<(), eyre::Report> {
    let wanted = service_id(&id)?;
    let observed: Vec<&'static str> = world
        .drain_events()?
        .into_iter()
        .filter_map(|event| match event {
            LifecycleEvent::StatusChanged { service_id, status } if service_id == wanted => {
                Some(status.as_str())
            }
            _ => None,
        })
        .collect();
    let expected: Vec<&str> = statuses.split(',').map(str::trim).collect();
    if observed != expected {
        return Err(eyre!("expected events {expected:?}, got {observed:?}"));
    }
    Ok(())
}

#[then("no lifecycle events were published")]
fn no_events(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let events = world.drain_events()?;
    if !events.is_empty() {
        return Err(eyre!("expected no events, got {events:?}"));
    }
    Ok(())
}

#[then("nothing was persisted after registration")]
fn nothing_persisted(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let saves = world.store.save_count().wrap_err("save count")?;
    if saves != world.saves_after_registration {
        return Err(eyre!(
            "expected {} saves, got {saves}",
            world.saves_after_registration
        ));
    }
    Ok(())
}

#[then("the connect attempt was declined")]
fn connect_declined(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    if world.last_connect != Some(ConnectOutcome::Declined) {
        return Err(eyre!(
            "expected a declined connect, got {:?}",
            world.last_connect
        ));
    }
    Ok(())
}

#[then("the disconnect reported no change")]
fn disconnect_unchanged(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    if world.last_disconnect != Some(DisconnectOutcome::AlreadyDisconnected) {
        return Err(eyre!(
            "expected an unchanged disconnect, got {:?}",
            world.last_disconnect
        ));
    }
    Ok(())
}
