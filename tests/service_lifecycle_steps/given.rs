//! Given steps for service lifecycle scenarios.

use super::world::{LifecycleWorld, run_async};
use devhub::service_registry::{domain::ServiceKind, services::RegisterServiceRequest};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::given;

#[given(r#"a registered service "{id}" named "{name}" of kind "{kind}""#)]
fn registered_service(
    world: &mut LifecycleWorld,
    id: String,
    name: String,
    kind: String,
) -> Result<(), eyre::Report> {
    let parsed = ServiceKind::try_from(kind.as_str()).map_err(|err| eyre!("{err}"))?;
    run_async(
        world
            .registry
            .register_service(RegisterServiceRequest::new(id, name, parsed)),
    )
    .wrap_err("registration should succeed")?;
    world.saves_after_registration = world.store.save_count().wrap_err("save count")?;
    world.events = Some(world.registry.subscribe());
    Ok(())
}

#[given("the GitHub credential check succeeds")]
fn github_check_succeeds(world: &mut LifecycleWorld) {
    world.github.set_failure(None);
}
