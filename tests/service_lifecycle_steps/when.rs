//! When steps for service lifecycle scenarios.

use super::world::{LifecycleWorld, run_async, service_id};
use devhub::service_registry::domain::CredentialSet;
use rstest_bdd_macros::when;

#[when(r#"service "{id}" is connected with credential "{secret}""#)]
fn connect_with_credential(
    world: &mut LifecycleWorld,
    id: String,
    secret: String,
) -> Result<(), eyre::Report> {
    let service_id = service_id(&id)?;
    let kind = world
        .registry
        .service(&service_id)
        .ok_or_else(|| eyre::eyre!("service {id} should be registered"))?
        .kind();
    let outcome = run_async(
        world
            .registry
            .connect(&service_id, Some(CredentialSet::primary(kind, secret))),
    );
    world.last_connect = Some(outcome);
    Ok(())
}

#[when(r#"service "{id}" is connected with an empty credential"#)]
fn connect_with_empty_credential(
    world: &mut LifecycleWorld,
    id: String,
) -> Result<(), eyre::Report> {
    let service_id = service_id(&id)?;
    world.last_connect = Some(run_async(world.registry.connect(&service_id, None)));
    Ok(())
}

#[when(r#"service "{id}" is disconnected"#)]
fn disconnect_service(world: &mut LifecycleWorld, id: String) -> Result<(), eyre::Report> {
    let service_id = service_id(&id)?;
    world.last_disconnect = Some(run_async(world.registry.disconnect(&service_id)));
    Ok(())
}
